//! Runner lifecycle tests

use async_trait::async_trait;
use std::sync::Arc;

use crate::assertion::{Matcher, VerdictStatus};
use crate::config::{Config, SessionConfig};
use crate::driver::{Locator, MockBrowser, MockDriverFactory, MockElement};
use crate::error::ErrorKind;
use crate::http::{MockHttpClient, MockHttpFactory};
use crate::report::{MemoryReportSink, StepOutcome};
use crate::scenario::{Scenario, ScenarioContext, ScenarioRunner};
use crate::session::{SessionManager, SessionManagerImpl};
use crate::Result;

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Pass,
    FailAssertion,
    FailStep,
    Panic,
}

struct Scripted {
    name: &'static str,
    behavior: Behavior,
}

#[async_trait]
impl Scenario for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn session_config(&self, config: &Config) -> SessionConfig {
        config.browser_session(Some("https://www.saucedemo.com"))
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let title = ctx.text(Locator::class_name("title")).await?;
        match self.behavior {
            Behavior::Pass => ctx.expect("title", title, Matcher::equals("Products")),
            Behavior::FailAssertion => ctx.expect("title", title, Matcher::equals("Checkout")),
            Behavior::FailStep => {
                ctx.click(Locator::id("missing")).await?;
                ctx.expect("unreachable", "x", Matcher::NonEmpty)
            }
            Behavior::Panic => panic!("boom"),
        }
    }
}

struct Fixture {
    drivers: Arc<MockDriverFactory>,
    manager: Arc<SessionManagerImpl>,
    sink: Arc<MemoryReportSink>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_drivers(MockDriverFactory::new(|| {
            let browser = MockBrowser::new();
            browser.add_element(MockElement::new(Locator::class_name("title")).with_text("Products"));
            browser
        }))
    }

    fn with_drivers(drivers: MockDriverFactory) -> Self {
        let drivers = Arc::new(drivers);
        let http = Arc::new(MockHttpClient::new("https://api.example.com"));
        let manager = Arc::new(SessionManagerImpl::new(
            drivers.clone(),
            Arc::new(MockHttpFactory::new(http)),
        ));
        Self {
            drivers,
            manager,
            sink: Arc::new(MemoryReportSink::new()),
        }
    }

    fn runner(&self, config: Config) -> ScenarioRunner {
        ScenarioRunner::with_sink(self.manager.clone(), Arc::new(config), self.sink.clone())
    }

    fn quit_counts(&self) -> Vec<usize> {
        self.drivers.launched().iter().map(|b| b.quit_count()).collect()
    }
}

#[tokio::test]
async fn test_each_path_yields_one_verdict_and_one_teardown() {
    for behavior in [
        Behavior::Pass,
        Behavior::FailAssertion,
        Behavior::FailStep,
        Behavior::Panic,
    ] {
        let fixture = Fixture::new();
        let runner = fixture.runner(Config::default());

        let verdict = runner
            .run(&Scripted {
                name: "scripted",
                behavior,
            })
            .await;

        assert_eq!(fixture.sink.verdicts().len(), 1, "{:?}", behavior);
        assert_eq!(fixture.quit_counts(), vec![1], "{:?}", behavior);
        assert_eq!(fixture.manager.session_count(), 0, "{:?}", behavior);
        assert_eq!(
            verdict.is_passed(),
            matches!(behavior, Behavior::Pass),
            "{:?}",
            behavior
        );
    }
}

#[tokio::test]
async fn test_assertion_failure_names_step() {
    let fixture = Fixture::new();
    let verdict = fixture
        .runner(Config::default())
        .run(&Scripted {
            name: "title-check",
            behavior: Behavior::FailAssertion,
        })
        .await;

    assert_eq!(verdict.status, VerdictStatus::Failed);
    assert_eq!(verdict.step.as_deref(), Some("title"));
    assert_eq!(verdict.error_kind, Some(ErrorKind::AssertionFailure));
    assert_eq!(verdict.actual.as_deref(), Some("'Products'"));
}

#[tokio::test]
async fn test_step_error_halts_body() {
    let fixture = Fixture::new();
    let verdict = fixture
        .runner(Config::default())
        .run(&Scripted {
            name: "missing-element",
            behavior: Behavior::FailStep,
        })
        .await;

    assert_eq!(verdict.error_kind, Some(ErrorKind::ElementNotFound));
    assert_eq!(verdict.step.as_deref(), Some("Locate(id=missing)"));

    let steps = fixture.sink.steps();
    let last = steps.last().unwrap();
    assert_eq!(last.outcome, StepOutcome::Failed);
    assert!(steps.iter().all(|s| s.step != "unreachable"));
}

#[tokio::test]
async fn test_panic_becomes_internal_failure() {
    let fixture = Fixture::new();
    let verdict = fixture
        .runner(Config::default())
        .run(&Scripted {
            name: "panicky",
            behavior: Behavior::Panic,
        })
        .await;

    assert_eq!(verdict.error_kind, Some(ErrorKind::Internal));
    assert!(verdict.message.unwrap().contains("boom"));
}

#[tokio::test]
async fn test_session_init_failure_runs_no_step() {
    let fixture = Fixture::with_drivers(MockDriverFactory::unavailable("connection refused"));
    let verdict = fixture
        .runner(Config::default())
        .run(&Scripted {
            name: "no-driver",
            behavior: Behavior::Pass,
        })
        .await;

    assert_eq!(verdict.status, VerdictStatus::Failed);
    assert_eq!(verdict.error_kind, Some(ErrorKind::SessionInit));
    assert_eq!(verdict.step.as_deref(), Some("session setup"));
    assert!(fixture.sink.steps().is_empty());
}

#[tokio::test]
async fn test_fail_fast_skips_remaining() {
    let fixture = Fixture::new();
    let scenarios: Vec<Arc<dyn Scenario>> = vec![
        Arc::new(Scripted {
            name: "first",
            behavior: Behavior::FailAssertion,
        }),
        Arc::new(Scripted {
            name: "second",
            behavior: Behavior::Pass,
        }),
    ];

    let verdicts = fixture
        .runner(Config::default())
        .run_sequential(&scenarios, true)
        .await;

    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].status, VerdictStatus::Failed);
    assert_eq!(verdicts[1].status, VerdictStatus::Skipped);
    assert_eq!(fixture.drivers.launched().len(), 1);
}

#[tokio::test]
async fn test_run_all_keeps_input_order() {
    let fixture = Fixture::new();
    let mut config = Config::default();
    config.parallelism = 3;

    let scenarios: Vec<Arc<dyn Scenario>> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| {
            Arc::new(Scripted {
                name,
                behavior: if name == "c" {
                    Behavior::FailAssertion
                } else {
                    Behavior::Pass
                },
            }) as Arc<dyn Scenario>
        })
        .collect();

    let verdicts = fixture.runner(config).run_all(&scenarios).await;
    let names: Vec<&str> = verdicts.iter().map(|v| v.scenario.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert!(!verdicts[2].is_passed());
    assert_eq!(fixture.quit_counts(), vec![1, 1, 1, 1]);
}

#[tokio::test]
async fn test_failure_screenshot_written() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = Fixture::new();
    let mut config = Config::default();
    config.screenshot_dir = Some(dir.path().to_string_lossy().into_owned());

    fixture
        .runner(config)
        .run(&Scripted {
            name: "shot",
            behavior: Behavior::FailAssertion,
        })
        .await;

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let name = files[0].as_ref().unwrap().file_name();
    assert!(name.to_string_lossy().starts_with("shot-"));
}
