//! # 等待策略
//!
//! 有界轮询：立即检查一次条件，未满足则休眠 `min(poll_interval, remaining)` 后重试，
//! 截止时间到达且最后一次检查仍未满足时返回 `ConditionTimeout`。
//!
//! ## 模块结构
//! - `policy`: `WaitPolicy` 与 `Condition` 接口
//! - `conditions`: 内置条件（元素存在/可见/可点击、失效、窗口数量、弹窗、文本、URL）

pub mod policy;
pub mod conditions;


pub use policy::{Condition, WaitPolicy};
pub use conditions::{
    AlertPresent, ElementClickable, ElementPresent, ElementTextMatches, ElementVisible,
    NewWindowsSince, StalenessOf, UrlContains, WindowCountAtLeast,
};
