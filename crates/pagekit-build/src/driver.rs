//! Batch build driver.
//!
//! Launches one build process per page, all at once, and reports each result as
//! soon as its process exits.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::task::JoinSet;

use pagekit_manifest::PageRecord;

/// Which build script to run for each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildVariant {
    #[default]
    Standard,
    Test,
}

impl BuildVariant {
    /// `test` selects the test variant, anything else the standard one.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("test") => BuildVariant::Test,
            _ => BuildVariant::Standard,
        }
    }
}

/// The external build command, run once per page.
///
/// `{script}` and `{page}` in `args` are replaced with the variant's script name
/// and the page identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
    pub script: String,
    pub test_script: String,
}

impl Default for BuildCommand {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec![
                "run".to_string(),
                "{script}".to_string(),
                "--page={page}".to_string(),
            ],
            script: "build".to_string(),
            test_script: "build:test".to_string(),
        }
    }
}

impl BuildCommand {
    /// Arguments for building `chunk`.
    pub fn args_for(&self, chunk: &str, variant: BuildVariant) -> Vec<String> {
        let script = match variant {
            BuildVariant::Standard => &self.script,
            BuildVariant::Test => &self.test_script,
        };

        self.args
            .iter()
            .map(|arg| arg.replace("{script}", script).replace("{page}", chunk))
            .collect()
    }

    /// Human-readable command line for `chunk`.
    pub fn display_for(&self, chunk: &str, variant: BuildVariant) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args_for(chunk, variant));
        parts.join(" ")
    }
}

/// Why a page's build failed.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Failed to start build: {0}")]
    Spawn(String),

    #[error("Build exited with {}: {stderr}", exit_status(.code))]
    Exit { code: Option<i32>, stderr: String },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result of one page's build.
#[derive(Debug)]
pub struct PageOutcome {
    /// Page identifier
    pub chunk: String,

    /// Command line that was run
    pub command: String,

    /// Captured stdout on success
    pub result: Result<String, DriverError>,
}

impl PageOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch run, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<PageOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &PageOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PageOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(PageOutcome::is_success)
    }

    /// Find the outcome for a page.
    pub fn get(&self, chunk: &str) -> Option<&PageOutcome> {
        self.outcomes.iter().find(|o| o.chunk == chunk)
    }
}

/// Runs the build command for every page concurrently.
#[derive(Debug, Clone)]
pub struct BatchDriver {
    command: BuildCommand,
    working_dir: PathBuf,
}

impl BatchDriver {
    pub fn new(command: BuildCommand, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            working_dir: working_dir.into(),
        }
    }

    /// Build every page. A failing page never stops the others.
    ///
    /// All processes are started before any is awaited. Outcomes are logged as
    /// they arrive and collected into the returned report.
    pub async fn run(&self, pages: &[PageRecord], variant: BuildVariant) -> BatchReport {
        let mut tasks = JoinSet::new();

        for page in pages {
            let chunk = page.chunk.clone();
            let program = self.command.program.clone();
            let args = self.command.args_for(&chunk, variant);
            let command = self.command.display_for(&chunk, variant);
            let working_dir = self.working_dir.clone();

            tracing::debug!("Starting `{}`", command);

            tasks.spawn(async move {
                let result = build_page(&program, &args, &working_dir).await;
                PageOutcome {
                    chunk,
                    command,
                    result,
                }
            });
        }

        let mut report = BatchReport::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    log_outcome(&outcome);
                    report.outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::error!("Build task failed: {}", e);
                }
            }
        }

        report
    }
}

async fn build_page(
    program: &str,
    args: &[String],
    working_dir: &Path,
) -> Result<String, DriverError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| DriverError::Spawn(format!("{}: {}", program, e)))?;

    if !output.status.success() {
        return Err(DriverError::Exit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn log_outcome(outcome: &PageOutcome) {
    match &outcome.result {
        Ok(stdout) => {
            tracing::info!("Built {} ({})", outcome.chunk, outcome.command);
            let stdout = stdout.trim();
            if !stdout.is_empty() {
                tracing::info!("{}", stdout);
            }
        }
        Err(e) => {
            tracing::error!("Build failed for {} ({}): {}", outcome.chunk, outcome.command, e);
        }
    }
}
