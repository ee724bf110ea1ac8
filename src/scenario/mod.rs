//! # 场景执行
//!
//! 场景 = 会话获取 → 按顺序执行步骤 → 断言 → 会话释放，最终产生且仅产生一个 `Verdict`。
//!
//! ## 模块结构
//! - `traits`: `Scenario` trait
//! - `context`: `ScenarioContext`，执行步骤并向报告端发送步骤事件
//! - `runner`: `ScenarioRunner`，负责作用域内的会话获取与释放（包括 panic 路径）

pub mod traits;
pub mod context;
pub mod runner;

#[cfg(test)]
pub mod tests;

pub use traits::Scenario;
pub use context::ScenarioContext;
pub use runner::ScenarioRunner;
