use crate::error::{Error, Result};
use crate::links::LINK_LOG_PATH;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.deepseek.com";
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Configuration for one batch generation run.
///
/// Use [`RunConfig::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RunConfig {
    /// Path to the YAML plan listing the chat-completion requests
    pub plan_path: PathBuf,

    /// Path to the HTML template appended to every prompt
    pub template_path: PathBuf,

    /// Base URL of the chat-completions API
    pub api_base: String,

    /// API key sent as a bearer token. An empty key is passed through
    /// as-is and surfaces as an authentication failure on the first call.
    pub api_key: String,

    /// Per-request HTTP timeout
    pub timeout: Duration,

    /// Path of the cumulative link log. Defaults to the fixed relative
    /// `links.txt`; the CLI never overrides it.
    pub link_log_path: PathBuf,

    /// Dry run mode (no API calls, no file writes, no log appends)
    pub dry_run: bool,
}

impl RunConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pagegen::RunConfig;
    ///
    /// let config = RunConfig::builder()
    ///     .plan_path("./plan.yaml")
    ///     .template_path("./template.html")
    ///     .api_key("sk-...")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The plan file doesn't exist or is not a file
    /// - The template file doesn't exist or is not a file
    /// - The API base URL is empty
    pub fn validate(&self) -> Result<()> {
        if !self.plan_path.exists() {
            return Err(Error::config(format!(
                "Plan file does not exist: {}",
                self.plan_path.display()
            )));
        }

        if !self.plan_path.is_file() {
            return Err(Error::config(format!(
                "Plan path is not a file: {}",
                self.plan_path.display()
            )));
        }

        if !self.template_path.exists() {
            return Err(Error::config(format!(
                "Template file does not exist: {}",
                self.template_path.display()
            )));
        }

        if !self.template_path.is_file() {
            return Err(Error::config(format!(
                "Template path is not a file: {}",
                self.template_path.display()
            )));
        }

        if self.api_base.trim().is_empty() {
            return Err(Error::config("API base URL must not be empty"));
        }

        // api_key is deliberately not checked here

        Ok(())
    }
}

/// Builder for creating a [`RunConfig`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    plan_path: Option<PathBuf>,
    template_path: Option<PathBuf>,
    api_base: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    link_log_path: Option<PathBuf>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the path to the YAML plan file.
    #[must_use]
    pub fn plan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plan_path = Some(path.into());
        self
    }

    /// Sets the path to the HTML template file.
    #[must_use]
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Sets the base URL of the chat-completions API.
    ///
    /// A trailing slash is stripped.
    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Sets the API key used for bearer authentication.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-request HTTP timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the link log location.
    #[must_use]
    pub fn link_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.link_log_path = Some(path.into());
        self
    }

    /// Enables dry run mode (no API calls, no writes).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan or template path is unset, or if
    /// validation fails.
    pub fn build(self) -> Result<RunConfig> {
        let plan_path = self
            .plan_path
            .ok_or_else(|| Error::config("plan_path is required"))?;
        let template_path = self
            .template_path
            .ok_or_else(|| Error::config("template_path is required"))?;

        let api_base = self
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = RunConfig {
            plan_path,
            template_path,
            api_base,
            api_key: self.api_key.unwrap_or_default(),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            link_log_path: self
                .link_log_path
                .unwrap_or_else(|| PathBuf::from(LINK_LOG_PATH)),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
