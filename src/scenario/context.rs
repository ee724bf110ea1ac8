//! Scenario execution context

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::assertion::{evaluate, AssertionResult, Matcher};
use crate::config::Config;
use crate::driver::{ElementRef, KeySequence, Locator};
use crate::report::{ReportSink, StepEvent};
use crate::session::Session;
use crate::steps::{Interact, Locate, Navigate, Step, WaitFor};
use crate::wait::Condition;
use crate::{Error, Result};

/// Runs the steps of one scenario against its session
///
/// Every step and every expectation is reported to the sink. The name of the last step
/// started is kept so a failure can be attributed to it.
pub struct ScenarioContext {
    scenario: String,
    session: Session,
    config: Arc<Config>,
    sink: Arc<dyn ReportSink>,
    current_step: Option<String>,
}

impl ScenarioContext {
    pub fn new<S: Into<String>>(
        scenario: S,
        session: Session,
        config: Arc<Config>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            session,
            config,
            sink,
            current_step: None,
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the most recent step or expectation
    pub fn current_step(&self) -> Option<&str> {
        self.current_step.as_deref()
    }

    /// Give the session back for teardown
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Execute one step and report it
    pub async fn run<S: Step>(&mut self, step: S) -> Result<S::Output> {
        let name = step.name();
        debug!(scenario = %self.scenario, "step {}", name);
        self.current_step = Some(name.clone());

        match step.execute(&mut self.session).await {
            Ok(output) => {
                self.sink.step(&StepEvent::passed(&self.scenario, name));
                Ok(output)
            }
            Err(e) => {
                self.sink.step(&StepEvent::failed(&self.scenario, name, &e));
                Err(e)
            }
        }
    }

    /// Check `actual` against `matcher`; a mismatch halts the scenario
    pub fn expect<V: Into<Value>>(&mut self, step: &str, actual: V, matcher: Matcher) -> Result<()> {
        self.current_step = Some(step.to_string());
        match evaluate(&actual.into(), &matcher) {
            AssertionResult::Passed => {
                self.sink.step(&StepEvent::passed(&self.scenario, step));
                Ok(())
            }
            AssertionResult::Failed { expected, actual } => {
                let err = Error::assertion(step, expected, actual);
                self.sink.step(&StepEvent::failed(&self.scenario, step, &err));
                Err(err)
            }
        }
    }

    pub async fn navigate(&mut self, url: &str) -> Result<()> {
        self.run(Navigate::new(url)).await
    }

    pub async fn locate(&mut self, locator: Locator) -> Result<ElementRef> {
        self.run(Locate::new(locator)).await
    }

    pub async fn click(&mut self, locator: Locator) -> Result<()> {
        let element = self.locate(locator).await?;
        self.run(Interact::click(element)).await?;
        Ok(())
    }

    pub async fn type_keys<K: Into<KeySequence>>(&mut self, locator: Locator, keys: K) -> Result<()> {
        let element = self.locate(locator).await?;
        self.run(Interact::type_keys(element, keys)).await?;
        Ok(())
    }

    /// Rendered text of the first element matching `locator`
    pub async fn text(&mut self, locator: Locator) -> Result<String> {
        let element = self.locate(locator).await?;
        Ok(self
            .run(Interact::read_text(element))
            .await?
            .unwrap_or_default())
    }

    pub async fn attribute(&mut self, locator: Locator, name: &str) -> Result<Option<String>> {
        let element = self.locate(locator).await?;
        self.run(Interact::read_attribute(element, name)).await
    }

    pub async fn wait_for<C>(&mut self, condition: C) -> Result<C::Output>
    where
        C: Condition + 'static,
    {
        self.run(WaitFor::new(condition)).await
    }
}
