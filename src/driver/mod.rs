//! # 浏览器驱动层
//!
//! 定义场景框架所依赖的浏览器能力接口，并提供两种实现。
//!
//! ## 模块结构
//! - `traits`: `BrowserDriver` / `DriverFactory` 能力接口，以及 `Locator`、`ElementRef`、`WindowHandle`
//! - `keys`: 类型化键盘输入（普通文本、特殊键、修饰键组合）
//! - `webdriver`: 基于 reqwest 的 W3C WebDriver 协议客户端
//! - `mock`: 可编程的内存浏览器，用于测试

pub mod traits;
pub mod keys;
pub mod webdriver;
pub mod mock;

#[cfg(test)]
pub mod tests;

pub use traits::{BrowserDriver, By, DriverFactory, ElementRef, Locator, WindowHandle};
pub use keys::{Key, KeyInput, KeySequence, Keystroke};
pub use webdriver::{WebDriverClient, WebDriverFactory};
pub use mock::{MockBrowser, MockDriverFactory, MockElement, MockState};
