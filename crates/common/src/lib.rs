//! # Injector Common
//!
//! 这个 crate 提供了依赖注入容器各层共享的公共类型。
//!
//! ## 核心组件
//!
//! - [`ServiceKey`] - 服务标识（类型标识或命名标识）
//! - [`Lifestyle`] - 服务生命周期策略
//! - [`ScopeInfo`] - 作用域元数据
//! - [`RegistrationError`] / [`ResolutionError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 以显式依赖描述替代运行时反射
//! - 同步解析，单线程访问模型

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
