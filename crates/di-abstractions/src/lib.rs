//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceRegistry`] - 服务注册表接口
//! - [`ServiceResolver`] - 服务解析器接口
//! - [`Provider`] - 构造配方（可构造类型或零参工厂）
//! - [`Registration`] - 注册条目

pub mod provider;
pub mod registry;
pub mod resolver;

pub use provider::*;
pub use registry::*;
pub use resolver::*;
