use anyhow::Context;
use clap::Parser;
use pagegen::{Pipeline, RunConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "pagegen",
    version,
    author,
    about = "Batch-generate HTML pages through an LLM chat-completions API",
    long_about = "Batch-generate HTML tutorial pages through an LLM chat-completions API.\n\n\
    This tool reads a YAML plan of completion requests, sends each one to the \
    configured API in order, writes the returned page to its destination path, \
    and appends an HTML link snippet for it to links.txt.\n\n\
    Each non-dry run is billed against the configured API key: expect one \
    completion call per plan record.\n\n\
    USAGE EXAMPLES:\n  \
      # Generate every page in the plan\n  \
      pagegen --config plan.yaml --template template.html\n\n  \
      # Validate the plan without calling the API\n  \
      pagegen --config plan.yaml --template template.html --dry-run\n\n  \
      # Point at a different OpenAI-compatible endpoint\n  \
      pagegen --config plan.yaml --template template.html --api-base https://api.example.com"
)]
struct Cli {
    /// YAML plan listing the chat-completion requests
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// HTML template appended to every prompt as reference material
    #[arg(short, long, value_name = "FILE")]
    template: PathBuf,

    /// Base URL of the chat-completions API
    #[arg(long, default_value = "https://api.deepseek.com", value_name = "URL")]
    api_base: String,

    /// API key for the completion service
    ///
    /// An absent key is not rejected up front; it fails with an
    /// authentication error on the first call.
    #[arg(long, env = "DEEPSEEK_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 600, value_name = "SECS")]
    timeout: u64,

    /// Validate the plan and print the would-be links without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let config = RunConfig::builder()
        .plan_path(cli.config)
        .template_path(cli.template)
        .api_base(cli.api_base)
        .api_key(cli.api_key)
        .timeout(Duration::from_secs(cli.timeout))
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Batch run failed")?;

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("pagegen=info"),
        1 => EnvFilter::new("pagegen=debug"),
        _ => EnvFilter::new("pagegen=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
