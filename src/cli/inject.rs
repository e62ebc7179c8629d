//! The `inject` command: run the foundation injector on its own.
//!
//! Operates on the directory in place - unlike `build`, which injects
//! into a staged copy - so this is for build directories you manage
//! yourself, not for source checkouts.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::Settings;
use crate::core::BuilderError;
use crate::injector::{self, DEFAULT_DONOR_NAMESPACE, InjectionOptions};

#[derive(Args, Debug)]
pub struct InjectCommand {
    /// Directory of the plugin build to inject into.
    #[arg(long, default_value = ".")]
    pub target_dir: PathBuf,

    /// Foundation plugin checkout to copy code from. Defaults to
    /// `FOUNDATION_PLUGIN_PATH`.
    #[arg(long)]
    pub foundation_path: Option<PathBuf>,

    /// Namespace prefix of the donor code.
    #[arg(long, default_value = DEFAULT_DONOR_NAMESPACE)]
    pub donor_namespace: String,
}

impl InjectCommand {
    pub async fn execute(self) -> Result<()> {
        let target_dir = self
            .target_dir
            .canonicalize()
            .with_context(|| format!("Target directory not found: {}", self.target_dir.display()))?;

        let donor = match self.foundation_path {
            Some(path) => path,
            None => Settings::from_env().foundation_plugin_path.ok_or_else(|| {
                anyhow::Error::from(BuilderError::FoundationPathNotFound {
                    path: PathBuf::from("$FOUNDATION_PLUGIN_PATH (unset)"),
                })
            })?,
        };

        let options = InjectionOptions {
            donor_namespace: self.donor_namespace,
        };
        let report = injector::inject(&target_dir, &donor, &options)?;
        report.print_summary();
        Ok(())
    }
}
