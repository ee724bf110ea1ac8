//! # 会话管理层
//!
//! 负责自动化会话的获取与释放：浏览器会话（WebDriver）或 HTTP 会话。
//!
//! ## 核心概念
//! - **Session**: 独占的会话句柄，持有后端、当前导航上下文（窗口 + 框架）和等待策略
//! - **SessionManager**: 打开/关闭会话，记录活跃会话；`close` 按值消费会话，关闭后无法再使用
//!
//! ## 模块结构
//! - `traits`: `SessionManager` trait 定义
//! - `manager`: 基于驱动工厂和 HTTP 客户端工厂的实现
//! - `state`: `Session`、`SessionBackend`、`NavigationContext`
//!
//! ## 使用示例
//! ```rust,no_run
//! use scenario_harness::config::Config;
//! use scenario_harness::session::{SessionManager, SessionManagerImpl};
//!
//! # async fn example() -> scenario_harness::Result<()> {
//! let config = Config::default();
//! let manager = SessionManagerImpl::from_config(&config);
//!
//! let session = manager.open(&config.http_session("https://jsonplaceholder.typicode.com")).await?;
//! println!("Session {} opened", session.id());
//! manager.close(session).await?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod manager;
pub mod state;


pub use traits::SessionManager;
pub use manager::SessionManagerImpl;
pub use state::{NavigationContext, Session, SessionBackend};
