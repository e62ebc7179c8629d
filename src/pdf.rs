//! Manual-to-PDF conversion.
//!
//! Plugin manuals are written as per-language markdown chapters named
//! `00-intro.en.md`, `01-setup.en.md`, ... For each requested language the
//! chapters are concatenated (page-broken between chapters) and rendered
//! to `manual_<lang>.pdf` through pandoc with the xelatex engine. A
//! missing language or a failed conversion is recorded per language and
//! never aborts the remaining ones; only a missing pandoc binary is
//! fatal.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::core::BuilderError;
use crate::utils::fs::{ensure_dir, safe_write};

/// Outcome of one language's conversion.
#[derive(Debug)]
pub struct ManualPdfOutcome {
    /// Language code (e.g. `en`).
    pub language: String,
    /// Markdown chapters found for this language.
    pub files_found: usize,
    /// The produced PDF, when conversion succeeded.
    pub output: Option<PathBuf>,
    /// Failure description, when it did not.
    pub error: Option<String>,
}

impl ManualPdfOutcome {
    fn failed(language: &str, files_found: usize, error: impl Into<String>) -> Self {
        Self {
            language: language.to_string(),
            files_found,
            output: None,
            error: Some(error.into()),
        }
    }
}

/// Convert the markdown manuals in `manual_dir` to one PDF per language.
///
/// # Errors
///
/// Fatal only when pandoc is not installed or the output directory cannot
/// be created; per-language failures land in the returned outcomes.
pub async fn convert_manual_dir(
    manual_dir: &Path,
    languages: &[String],
    output_dir: &Path,
    keep_temp: bool,
) -> Result<Vec<ManualPdfOutcome>> {
    if which::which("pandoc").is_err() {
        return Err(BuilderError::PandocNotFound.into());
    }
    ensure_dir(output_dir)?;

    let mut outcomes = Vec::with_capacity(languages.len());
    for language in languages {
        outcomes.push(convert_language(manual_dir, language, output_dir, keep_temp).await);
    }
    Ok(outcomes)
}

async fn convert_language(
    manual_dir: &Path,
    language: &str,
    output_dir: &Path,
    keep_temp: bool,
) -> ManualPdfOutcome {
    let files = markdown_files(manual_dir, language);
    if files.is_empty() {
        return ManualPdfOutcome::failed(language, 0, "no markdown files found");
    }

    let combined_path = manual_dir.join(format!("combined_{language}.md"));
    let output_pdf = output_dir.join(format!("manual_{language}.pdf"));

    let result = match combine_markdown(&files) {
        Ok(combined) => match safe_write(&combined_path, &combined) {
            Ok(()) => run_pandoc(&combined_path, &output_pdf, language).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if !keep_temp && combined_path.is_file() {
        if let Err(e) = std::fs::remove_file(&combined_path) {
            warn!("could not remove {}: {e}", combined_path.display());
        }
    }

    match result {
        Ok(()) => ManualPdfOutcome {
            language: language.to_string(),
            files_found: files.len(),
            output: Some(output_pdf),
            error: None,
        },
        Err(e) => {
            warn!("PDF conversion for {language} failed: {e:#}");
            ManualPdfOutcome::failed(language, files.len(), format!("{e:#}"))
        }
    }
}

/// The language's markdown chapters (`*.{language}.md`), sorted by file
/// name so numeric chapter prefixes define the order.
pub fn markdown_files(manual_dir: &Path, language: &str) -> Vec<PathBuf> {
    let marker = format!(".{language}.md");
    let mut files: Vec<PathBuf> = std::fs::read_dir(manual_dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(&marker))
        })
        .collect();
    files.sort();
    files
}

/// Concatenate chapters into one document, page-broken between chapters.
pub fn combine_markdown(files: &[PathBuf]) -> Result<String> {
    let mut combined = String::new();
    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            combined.push_str("\n\\newpage\n\n");
        }
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        combined.push_str(&content);
        combined.push_str("\n\n");
    }
    Ok(combined)
}

async fn run_pandoc(input: &Path, output: &Path, language: &str) -> Result<()> {
    let mut command = Command::new("pandoc");
    command
        .arg(input)
        .arg("-o")
        .arg(output)
        .args([
            "--pdf-engine=xelatex",
            "--pdf-engine-opt=-shell-escape",
            "--toc",
            "--toc-depth=3",
            "--variable",
            "papersize=a4",
            "--variable",
            "fontsize=11pt",
            "--variable",
            "geometry:margin=2.5cm",
            "--variable",
            "links-as-notes=true",
            "--variable",
            "mainfont=DejaVu Sans",
            "--variable",
            "monofont=DejaVu Sans Mono",
            "-f",
            "markdown+raw_tex",
        ]);
    match language {
        "de" => {
            command.args(["--variable", "lang=de", "--variable", "babel-lang=german"]);
        }
        "en" => {
            command.args(["--variable", "lang=en", "--variable", "babel-lang=english"]);
        }
        _ => {}
    }

    debug!("running pandoc for {}", output.display());
    let result = command.output().await.context("Failed to run pandoc")?;
    if !result.status.success() {
        anyhow::bail!(
            "pandoc exited with {}: {}",
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        );
    }
    Ok(())
}

/// Print the per-language conversion summary.
pub fn print_summary(outcomes: &[ManualPdfOutcome]) {
    for outcome in outcomes {
        match (&outcome.output, &outcome.error) {
            (Some(pdf), _) => println!(
                "{} {}: {} chapters -> {}",
                "✓".green(),
                outcome.language,
                outcome.files_found,
                pdf.display()
            ),
            (None, Some(error)) => println!(
                "{} {}: {error}",
                "✗".red(),
                outcome.language
            ),
            (None, None) => {}
        }
    }
}
