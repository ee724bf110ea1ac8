//! Scenario runner
//!
//! Opens a session per scenario, runs the body, and closes the session on every path.

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

use crate::assertion::Verdict;
use crate::config::Config;
use crate::error::ErrorKind;
use crate::report::{ReportSink, TracingReportSink};
use crate::scenario::context::ScenarioContext;
use crate::scenario::traits::Scenario;
use crate::session::{SessionBackend, SessionManager};
use crate::Error;

/// Step name given to failures while opening the session
const SETUP_STEP: &str = "session setup";

/// Step name given to failures while closing the session
const TEARDOWN_STEP: &str = "session teardown";

/// Scenario runner
pub struct ScenarioRunner {
    manager: Arc<dyn SessionManager>,
    config: Arc<Config>,
    sink: Arc<dyn ReportSink>,
}

impl ScenarioRunner {
    /// Create a runner reporting through `tracing`
    pub fn new(manager: Arc<dyn SessionManager>, config: Arc<Config>) -> Self {
        Self::with_sink(manager, config, Arc::new(TracingReportSink))
    }

    pub fn with_sink(
        manager: Arc<dyn SessionManager>,
        config: Arc<Config>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            manager,
            config,
            sink,
        }
    }

    /// Run one scenario to its verdict
    #[instrument(skip_all, fields(scenario = %scenario.name()))]
    pub async fn run(&self, scenario: &dyn Scenario) -> Verdict {
        let started = Instant::now();
        let name = scenario.name().to_string();

        let session_config = scenario.session_config(&self.config);
        let session = match self.manager.open(&session_config).await {
            Ok(session) => session,
            Err(e) => {
                let verdict = Verdict::failed(
                    &name,
                    Some(SETUP_STEP.to_string()),
                    &e,
                    started.elapsed(),
                );
                self.sink.verdict(&verdict);
                return verdict;
            }
        };

        let mut ctx = ScenarioContext::new(
            &name,
            session,
            self.config.clone(),
            self.sink.clone(),
        );

        let outcome = AssertUnwindSafe(scenario.run(&mut ctx)).catch_unwind().await;
        let result = outcome.unwrap_or_else(|panic| {
            Err(Error::internal(format!(
                "scenario panicked: {}",
                panic_message(panic.as_ref())
            )))
        });

        if let Err(e) = &result {
            warn!("Scenario {} failed: {}", name, e);
            self.capture_failure_screenshot(&ctx).await;
        }

        let step = ctx.current_step().map(str::to_string);
        let teardown = self.manager.close(ctx.into_session()).await;

        let verdict = match (result, teardown) {
            (Ok(()), Ok(())) => Verdict::passed(&name, started.elapsed()),
            (Ok(()), Err(e)) => Verdict::failed(
                &name,
                Some(TEARDOWN_STEP.to_string()),
                &e,
                started.elapsed(),
            ),
            (Err(e), teardown) => {
                if let Err(te) = teardown {
                    warn!("Teardown of {} also failed: {}", name, te);
                }
                Verdict::failed(&name, step, &e, started.elapsed())
            }
        };

        self.sink.verdict(&verdict);
        verdict
    }

    /// Run independent scenarios concurrently, at most `parallelism` at a time
    ///
    /// Verdicts come back in input order.
    pub async fn run_all(&self, scenarios: &[Arc<dyn Scenario>]) -> Vec<Verdict> {
        let parallelism = self.config.parallelism.max(1);
        info!(
            "Running {} scenario(s), parallelism {}",
            scenarios.len(),
            parallelism
        );

        let mut verdicts: Vec<(usize, Verdict)> = stream::iter(scenarios.iter().enumerate())
            .map(|(index, scenario)| async move { (index, self.run(scenario.as_ref()).await) })
            .buffer_unordered(parallelism)
            .collect()
            .await;

        verdicts.sort_by_key(|(index, _)| *index);
        verdicts.into_iter().map(|(_, verdict)| verdict).collect()
    }

    /// Run scenarios one after another
    ///
    /// With `fail_fast`, everything after the first non-passing scenario is skipped.
    pub async fn run_sequential(&self, scenarios: &[Arc<dyn Scenario>], fail_fast: bool) -> Vec<Verdict> {
        let mut verdicts = Vec::with_capacity(scenarios.len());
        let mut halted_by: Option<(String, Option<ErrorKind>)> = None;

        for scenario in scenarios {
            if let Some((failed, kind)) = &halted_by {
                let verdict = Verdict::skipped(
                    scenario.name(),
                    format!("skipped after {} failed", failed),
                    *kind,
                );
                self.sink.verdict(&verdict);
                verdicts.push(verdict);
                continue;
            }

            let verdict = self.run(scenario.as_ref()).await;
            if fail_fast && !verdict.is_passed() {
                halted_by = Some((verdict.scenario.clone(), verdict.error_kind));
            }
            verdicts.push(verdict);
        }
        verdicts
    }

    async fn capture_failure_screenshot(&self, ctx: &ScenarioContext) {
        let Some(dir) = self.config.screenshot_dir() else {
            return;
        };
        let SessionBackend::Browser(driver) = ctx.session().backend() else {
            return;
        };

        let png = match driver.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Failed to capture failure screenshot: {}", e);
                return;
            }
        };

        let path = screenshot_path(&dir, ctx.scenario());
        let written: std::io::Result<()> = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, png).await
        }
        .await;
        match written {
            Ok(()) => info!("Failure screenshot saved to {}", path.display()),
            Err(e) => warn!("Failed to write screenshot {}: {}", path.display(), e),
        }
    }
}

fn screenshot_path(dir: &std::path::Path, scenario: &str) -> PathBuf {
    let stem: String = scenario
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f");
    dir.join(format!("{}-{}.png", stem, stamp))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
