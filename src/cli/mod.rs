//! Command-line interface.
//!
//! Two commands share a handful of global flags:
//!
//! - `swrb build` - the full release workflow: version bump, asset
//!   verification, staging, foundation injection, archiving, upload, and
//!   notification
//! - `swrb inject` - run the foundation injector on its own against an
//!   existing directory, for debugging an injection or wiring it into a
//!   different pipeline
//! - `swrb variant` - rebrand a plugin copy under a prefixed/suffixed
//!   identity
//! - `swrb pdf` - render markdown manuals to per-language PDFs

mod build;
mod inject;
mod pdf;
mod variant;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use build::BuildCommand;
pub use inject::InjectCommand;
pub use pdf::PdfCommand;
pub use variant::VariantCommand;

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "swrb",
    about = "Shopware 6 plugin release builder",
    version,
    long_about = "Packages a Shopware 6 plugin into a versioned, self-contained ZIP archive, \
                  optionally injecting the required foundation code, uploading the artifact, \
                  and announcing the release."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable progress spinners (useful in CI logs).
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and package the plugin for release.
    Build(BuildCommand),
    /// Inject foundation code into a target directory without building.
    Inject(InjectCommand),
    /// Transform a plugin copy into a prefixed/suffixed variant.
    Variant(VariantCommand),
    /// Create PDF manuals from per-language markdown chapters.
    Pdf(PdfCommand),
}

impl Cli {
    /// Initialize logging and progress behavior from the global flags.
    /// Must be called once, before `execute`.
    pub fn init(&self) {
        if self.no_progress || self.quiet {
            crate::utils::progress::set_progress_disabled(true);
        }

        let default_filter = if self.verbose {
            "swrb=debug"
        } else if self.quiet {
            "swrb=error"
        } else {
            "swrb=info"
        };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .ok();
    }

    /// Execute the selected command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build(cmd) => cmd.execute(self.verbose, self.quiet).await,
            Commands::Inject(cmd) => cmd.execute().await,
            Commands::Variant(cmd) => cmd.execute().await,
            Commands::Pdf(cmd) => cmd.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_with_flags() {
        let cli = Cli::parse_from([
            "swrb",
            "build",
            "--output-dir",
            "dist",
            "--no-sync",
            "--version-increment",
            "patch",
        ]);
        match cli.command {
            Commands::Build(cmd) => {
                assert_eq!(cmd.output_dir, std::path::PathBuf::from("dist"));
                assert!(cmd.no_sync);
                assert_eq!(cmd.version_increment.as_deref(), Some("patch"));
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["swrb", "-v", "-q", "build"]).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn quiet_disables_progress_without_touching_the_environment() {
        let env_before = std::env::var_os("SWRB_NO_PROGRESS");
        let cli = Cli::parse_from(["swrb", "--quiet", "build"]);
        cli.init();
        assert!(crate::utils::progress::is_progress_disabled());
        assert_eq!(std::env::var_os("SWRB_NO_PROGRESS"), env_before);
        crate::utils::progress::set_progress_disabled(false);
    }
}
