//! The `variant` command: rebrand a plugin copy under a new identity.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::variant::transform_to_variant;

/// Transform a plugin directory into a prefixed/suffixed variant.
///
/// The directory is rewritten in place and renamed, so point this at a
/// staged copy, not at a source checkout.
#[derive(Args, Debug)]
pub struct VariantCommand {
    /// Plugin directory to transform.
    #[arg(long, default_value = ".")]
    pub source_dir: PathBuf,

    /// Name prefix of the variant (e.g. "Free").
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Name suffix of the variant.
    #[arg(long, default_value = "")]
    pub suffix: String,
}

impl VariantCommand {
    pub async fn execute(self) -> Result<()> {
        let report = transform_to_variant(&self.source_dir, &self.prefix, &self.suffix)?;
        for warning in &report.warnings {
            println!("{} {warning}", "warning:".yellow());
        }
        println!(
            "{} {} ({} files rewritten) at {}",
            "✓ Variant created:".green(),
            report.new_name,
            report.files_rewritten,
            report.plugin_dir.display()
        );
        Ok(())
    }
}
