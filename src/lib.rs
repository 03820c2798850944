//! # pagegen
//!
//! Batch-generate HTML tutorial pages through an LLM chat-completions API.
//!
//! ## Features
//!
//! - YAML plan describing one completion request per page
//! - One blocking API call per record, strictly in plan order
//! - Artifact files written with auto-created parent directories
//! - Cumulative `links.txt` log of HTML anchor snippets
//! - Dry run mode that validates the whole plan without spending quota
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagegen::{Pipeline, RunConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RunConfig::builder()
//!     .plan_path("./plan.yaml")
//!     .template_path("./template.html")
//!     .api_key(std::env::var("DEEPSEEK_API_KEY").unwrap_or_default())
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! A single linear pass over the plan:
//! 1. **Template**: read once, appended to every prompt
//! 2. **Plan**: YAML list of request records, decoded at point of use
//! 3. **Client**: one synchronous chat-completion call per record
//! 4. **Writer / Links**: artifact file plus one appended link line

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
mod error;
mod links;
mod pipeline;
mod plan;
mod slug;
mod template;
mod writer;

pub use client::{ChatMessage, ChatRequest, ChatResponse, Choice, CompletionClient, Role};
pub use config::{ConfigBuilder, RunConfig};
pub use error::{Error, Result};
pub use links::{format_link, LinkLog, LINK_LOG_PATH};
pub use pipeline::{Pipeline, RunStats};
pub use plan::{load_plan, RequestSpec};
pub use slug::path_part;
pub use template::{compose_prompt, read_template};
pub use writer::write_artifact;

/// Runs a complete batch generation with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The template or plan file cannot be read
/// - A record is missing a field or has an unusable title
/// - A completion call or file write fails
///
/// # Examples
///
/// ```no_run
/// use pagegen::{run, RunConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = RunConfig::builder()
///     .plan_path("./plan.yaml")
///     .template_path("./template.html")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: RunConfig) -> Result<RunStats> {
    Pipeline::new(config)?.run()
}
