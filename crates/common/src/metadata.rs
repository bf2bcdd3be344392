//! 服务标识与描述符
//!
//! 以显式的依赖描述替代运行时反射：每个注册条目携带一份
//! `(参数名, 期望标识)` 的有序列表，解析时按表查找。

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

use crate::lifecycle::Lifestyle;

/// 服务标识
///
/// 注册表的键。既支持以类型为标识（接口/契约类型），
/// 也支持任意字符串标识，两者可在同一注册表中混用。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceKey {
    /// 以类型为标识
    Type {
        /// 类型ID
        id: TypeId,
        /// 完整类型名称
        name: &'static str,
    },
    /// 以名称为标识
    Named(Cow<'static, str>),
}

impl ServiceKey {
    /// 从类型获取服务标识
    ///
    /// `T: ?Sized` 使得 trait 对象也可以作为标识使用，
    /// 例如 `ServiceKey::of::<dyn Engine>()`。
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 从名称创建服务标识
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }

    /// 获取简短的标识名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        match self {
            Self::Type { name, .. } => name.rsplit("::").next().unwrap_or(name),
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// 提供者类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// 可构造类型（携带依赖描述，注册时参与校验）
    Constructor,
    /// 零参工厂（不可内省，跳过校验）
    Factory,
}

/// 构造参数依赖描述
///
/// 一条 `(参数名, 期望标识)` 记录，注册时声明、解析时按表查找。
#[derive(Debug, Clone)]
pub struct DependencyDescriptor {
    /// 构造参数名称
    pub parameter: &'static str,
    /// 期望的服务标识
    pub key: ServiceKey,
}

impl DependencyDescriptor {
    /// 创建新的依赖描述
    pub fn new(parameter: &'static str, key: ServiceKey) -> Self {
        Self { parameter, key }
    }
}

/// 服务描述符
///
/// 注册条目的只读快照，用于诊断和依赖校验。
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// 服务标识
    pub key: ServiceKey,
    /// 生命周期策略
    pub lifestyle: Lifestyle,
    /// 提供者类别
    pub provider_kind: ProviderKind,
    /// 依赖描述列表
    pub dependencies: Vec<DependencyDescriptor>,
}
