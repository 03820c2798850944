use crate::{
    client::{ChatRequest, CompletionClient},
    config::RunConfig,
    error::Result,
    links::{self, LinkLog},
    plan::{self, RequestSpec},
    slug, template, writer,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Statistics collected during a batch run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Number of records fully processed
    pub records: usize,

    /// Number of artifact files written
    pub files_written: usize,

    /// Number of lines appended to the link log
    pub links_logged: usize,

    /// Total execution time
    pub duration: Duration,
}

/// Sequential orchestrator for one batch generation run.
///
/// Processes the plan strictly in file order, one blocking completion
/// call at a time. Any failure aborts the remaining queue; records that
/// already completed keep their files and log lines.
pub struct Pipeline {
    config: RunConfig,
    client: CompletionClient,
    link_log: LinkLog,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// The completion client is built once here and reused for every
    /// request in the run.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation or client
    /// construction fails.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;

        let client =
            CompletionClient::new(&config.api_base, &config.api_key, config.timeout)?;
        let link_log = LinkLog::new(&config.link_log_path);

        Ok(Self {
            config,
            client,
            link_log,
        })
    }

    /// Executes the run and returns statistics.
    ///
    /// # Process
    ///
    /// 1. Read the template (once, before any network call)
    /// 2. Load the plan records
    /// 3. For each record in order: call the API, write the artifact,
    ///    derive the slug, print and append the link line
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; nothing is retried and no
    /// partial progress is rolled back.
    #[instrument(skip(self), fields(plan = %self.config.plan_path.display()))]
    pub fn run(self) -> Result<RunStats> {
        let start = Instant::now();

        let template = template::read_template(&self.config.template_path)?;
        debug!(
            "Loaded template {} ({} bytes)",
            self.config.template_path.display(),
            template.len()
        );

        let entries = plan::load_plan(&self.config.plan_path)?;
        info!(
            "Loaded {} request(s) from {}",
            entries.len(),
            self.config.plan_path.display()
        );

        if self.config.dry_run {
            warn!("Dry run mode enabled - no API calls, no writes");
        }

        let mut stats = RunStats {
            records: 0,
            files_written: 0,
            links_logged: 0,
            duration: Duration::ZERO,
        };

        for (index, entry) in entries.iter().enumerate() {
            let spec = RequestSpec::from_entry(index, entry)?;

            if self.config.dry_run {
                self.process_dry(index, &spec)?;
            } else {
                self.process(index, &spec, &template, &mut stats)?;
            }

            stats.records += 1;
        }

        stats.duration = start.elapsed();
        info!(
            "✓ Processed {} record(s) ({} file(s), {} link(s)) in {:.2}s",
            stats.records,
            stats.files_written,
            stats.links_logged,
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }

    /// Processes one record end to end.
    fn process(
        &self,
        index: usize,
        spec: &RequestSpec,
        template: &str,
        stats: &mut RunStats,
    ) -> Result<()> {
        info!(
            "Record {}: '{}' (model={}, max_completion_tokens={})",
            index, spec.title, spec.model, spec.max_completion_tokens
        );

        let prompt = template::compose_prompt(&spec.content, template);
        let request = ChatRequest::for_spec(spec, prompt);

        let page = self.client.complete(&request)?;

        writer::write_artifact(&spec.path, &page)?;
        stats.files_written += 1;
        debug!("Wrote {} bytes to {}", page.len(), spec.path.display());

        // the slug is derived after the artifact write; a rejected title
        // leaves the file in place with no log line
        let part = slug::path_part(&spec.title)?;
        let link = links::format_link(&part, &spec.title);

        println!("{link}");

        self.link_log.append(&link)?;
        stats.links_logged += 1;

        println!("finished");
        Ok(())
    }

    /// Validates one record without touching the network or the disk.
    ///
    /// The would-be link line goes to stdout like in a real run.
    fn process_dry(&self, index: usize, spec: &RequestSpec) -> Result<()> {
        let part = slug::path_part(&spec.title)?;
        let link = links::format_link(&part, &spec.title);

        println!("{link}");

        info!(
            "Record {}: '{}' would write {}",
            index,
            spec.title,
            spec.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::Path;
    use std::thread;

    const PLAN: &str = r#"
chat_completions:
  - messages:
      - role: user
        content: Write a tutorial about Docker.
    temperature: 0.7
    top_p: 0.9
    model: deepseek-chat
    max_completion_tokens: 4096
    path: out/linux/docker/index.html
    title: Docker
  - messages:
      - role: user
        content: Write a tutorial about grep.
    temperature: 0.7
    top_p: 0.9
    model: deepseek-chat
    max_completion_tokens: 4096
    path: out/linux/grep/index.html
    title: grep
"#;

    /// Plan with absolute destination paths, for tests that really write.
    fn plan_with_paths(first: &Path, second: &Path) -> String {
        PLAN.replace("out/linux/docker/index.html", &first.display().to_string())
            .replace("out/linux/grep/index.html", &second.display().to_string())
    }

    fn config_for(temp: &assert_fs::TempDir, plan: &str, dry_run: bool) -> RunConfig {
        config_against(temp, plan, dry_run, "https://api.invalid")
    }

    fn config_against(
        temp: &assert_fs::TempDir,
        plan: &str,
        dry_run: bool,
        api_base: &str,
    ) -> RunConfig {
        let plan_file = temp.child("plan.yaml");
        plan_file.write_str(plan).unwrap();
        let template_file = temp.child("template.html");
        template_file.write_str("<html></html>").unwrap();

        RunConfig::builder()
            .plan_path(plan_file.path())
            .template_path(template_file.path())
            .api_base(api_base)
            .api_key("test-key")
            .link_log_path(temp.child("links.txt").path())
            .dry_run(dry_run)
            .build()
            .unwrap()
    }

    /// Minimal chat-completions stub: answers `expected` requests with a
    /// canned JSON body, one connection per request, then exits.
    fn serve_completions(expected: usize) -> (String, thread::JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut served = 0;
            for stream in listener.incoming().take(expected) {
                let mut stream = stream.unwrap();

                let mut head = Vec::new();
                let mut byte = [0u8; 1];
                while !head.ends_with(b"\r\n\r\n") {
                    stream.read_exact(&mut byte).unwrap();
                    head.push(byte[0]);
                }

                let header_text = String::from_utf8_lossy(&head).to_ascii_lowercase();
                let length = header_text
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                let mut body = vec![0u8; length];
                stream.read_exact(&mut body).unwrap();

                served += 1;
                let content = format!("<html>generated {served}</html>");
                let payload = format!(
                    r#"{{"choices":[{{"index":0,"message":{{"role":"assistant","content":"{content}"}}}}]}}"#
                );
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    payload.len(),
                    payload
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            served
        });

        (base, handle)
    }

    #[test]
    fn test_run_writes_every_record() {
        let temp = assert_fs::TempDir::new().unwrap();
        let first = temp.path().join("site/docker/index.html");
        let second = temp.path().join("site/grep/index.html");
        let (api_base, server) = serve_completions(2);

        let plan = plan_with_paths(&first, &second);
        let config = config_against(&temp, &plan, false, &api_base);

        let stats = Pipeline::new(config).unwrap().run().unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.files_written, 2);
        assert_eq!(stats.links_logged, 2);
        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            "<html>generated 1</html>"
        );
        assert_eq!(
            fs::read_to_string(&second).unwrap(),
            "<html>generated 2</html>"
        );

        let log = fs::read_to_string(temp.child("links.txt").path()).unwrap();
        assert_eq!(
            log,
            "<li><a href=\"/linux/docker/\">Docker</li>\n<li><a href=\"/linux/grep/\">grep</li>\n"
        );
        assert_eq!(server.join().unwrap(), 2);
    }

    #[test]
    fn test_record_failure_keeps_prior_progress() {
        let temp = assert_fs::TempDir::new().unwrap();
        let first = temp.path().join("site/docker/index.html");
        let second = temp.path().join("site/grep/index.html");
        let (api_base, server) = serve_completions(1);

        // strip `model` from the second record only
        let plan = plan_with_paths(&first, &second);
        let marker = "    model: deepseek-chat\n";
        let cut = plan.rfind(marker).unwrap();
        let broken = format!("{}{}", &plan[..cut], &plan[cut + marker.len()..]);

        let config = config_against(&temp, &broken, false, &api_base);
        let err = Pipeline::new(config).unwrap().run().unwrap_err();

        assert!(err.to_string().contains("'model'"));
        assert!(err.to_string().contains("#1"));

        // the first record's artifact and log line survive the abort
        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            "<html>generated 1</html>"
        );
        assert!(!second.exists());
        assert_eq!(
            fs::read_to_string(temp.child("links.txt").path()).unwrap(),
            "<li><a href=\"/linux/docker/\">Docker</li>\n"
        );
        assert_eq!(server.join().unwrap(), 1);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = config_for(&temp, PLAN, true);

        let stats = Pipeline::new(config).unwrap().run().unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.files_written, 0);
        assert_eq!(stats.links_logged, 0);
        assert!(!temp.child("out").exists());
        assert!(!temp.child("links.txt").exists());
    }

    #[test]
    fn test_dry_run_rejects_bad_record() {
        let broken = PLAN.replace("    model: deepseek-chat\n", "");
        let temp = assert_fs::TempDir::new().unwrap();
        let config = config_for(&temp, &broken, true);

        let err = Pipeline::new(config).unwrap().run().unwrap_err();
        assert!(err.to_string().contains("'model'"));
    }

    #[test]
    fn test_dry_run_rejects_hyphenated_title() {
        let broken = PLAN.replace("title: Docker", "title: multi-stage");
        let temp = assert_fs::TempDir::new().unwrap();
        let config = config_for(&temp, &broken, true);

        let err = Pipeline::new(config).unwrap().run().unwrap_err();
        assert!(matches!(err, crate::Error::Slug { .. }));
    }

    #[test]
    fn test_missing_template_fails_before_anything_runs() {
        let temp = assert_fs::TempDir::new().unwrap();
        let plan_file = temp.child("plan.yaml");
        plan_file.write_str(PLAN).unwrap();

        let result = RunConfig::builder()
            .plan_path(plan_file.path())
            .template_path(temp.child("missing.html").path())
            .build();

        assert!(result.is_err());
        assert!(!temp.child("out").exists());
    }
}
