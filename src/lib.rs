//! swrb - Shopware 6 plugin release builder.
//!
//! Packages a Shopware 6 plugin into a versioned, self-contained ZIP
//! archive. The pipeline stages a clean copy of the plugin tree, injects
//! the foundation code the plugin actually uses, stamps the build with
//! release metadata, and optionally uploads and announces the result.
//!
//! # Module organization
//!
//! - [`cli`] - command-line interface (`build`, `inject`)
//! - [`composer`] - `composer.json` reading and patching
//! - [`injector`] - dependency-aware foundation code injection
//! - [`plugin`] - staging, ignore filtering, asset verification
//! - [`version`] - semver bumping for releases
//! - [`git`] - branch/commit discovery, tagging, pushing
//! - [`archive`] - ZIP creation
//! - [`release`] - `release_info.txt` rendering
//! - [`variant`] - plugin variant creation (prefix/suffix rebranding)
//! - [`remote`] - rsync upload
//! - [`notify`] - Slack release announcements
//! - [`manual`] - per-language manual copying
//! - [`pdf`] - manual-to-PDF conversion via pandoc
//! - [`config`] - environment-driven settings
//! - [`core`] - error types shared across the crate
//! - [`utils`] - filesystem helpers and progress reporting

pub mod archive;
pub mod cli;
pub mod composer;
pub mod config;
pub mod core;
pub mod git;
pub mod injector;
pub mod manual;
pub mod notify;
pub mod pdf;
pub mod plugin;
pub mod release;
pub mod remote;
pub mod utils;
pub mod variant;
pub mod version;
