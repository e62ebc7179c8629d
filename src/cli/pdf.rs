//! The `pdf` command: render markdown manuals to per-language PDFs.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::pdf::{convert_manual_dir, print_summary};

/// Create PDF manuals from per-language markdown chapters
/// (`00-intro.en.md`, `00-einfuehrung.de.md`, ...).
#[derive(Args, Debug)]
pub struct PdfCommand {
    /// Directory containing the markdown chapters.
    pub manual_dir: PathBuf,

    /// Comma-separated list of languages to render.
    #[arg(short, long, default_value = "en,de", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Output directory for the PDFs (defaults to the manual directory).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep the combined intermediate markdown files.
    #[arg(short, long)]
    pub keep_temp: bool,
}

impl PdfCommand {
    pub async fn execute(self) -> Result<()> {
        let output_dir = self.output.as_deref().unwrap_or(&self.manual_dir);
        let outcomes =
            convert_manual_dir(&self.manual_dir, &self.languages, output_dir, self.keep_temp)
                .await?;
        print_summary(&outcomes);
        if outcomes.iter().all(|o| o.output.is_none()) {
            anyhow::bail!("no PDF manual could be created");
        }
        Ok(())
    }
}
