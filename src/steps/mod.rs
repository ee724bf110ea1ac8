//! Scenario steps
//!
//! Each step is a named unit of work against a session with a typed output. Scenario bodies
//! run steps through [`ScenarioContext::run`](crate::scenario::ScenarioContext::run) and thread
//! the outputs into later steps explicitly.

pub mod traits;
pub mod navigation;
pub mod context;
pub mod element;
pub mod window;
pub mod alert;
pub mod http;
pub mod script;
pub mod wait;


pub use traits::Step;
pub use navigation::{Navigate, ReadPageSource};
pub use context::{ContextTarget, SwitchContext};
pub use element::{Action, Interact, Locate};
pub use window::{CloseNewWindows, CloseWindow, EnumerateWindows};
pub use alert::HandleAlert;
pub use http::HttpRequest;
pub use script::ExecuteScript;
pub use wait::WaitFor;
