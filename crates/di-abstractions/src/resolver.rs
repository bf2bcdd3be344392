//! 服务解析器抽象接口
//!
//! 提供依赖解析和实例化的能力

use std::sync::Arc;

use injector_common::{ResolutionError, ResolutionResult, ServiceKey};

use crate::provider::ServiceInstance;

/// 服务解析器 trait
///
/// 负责按生命周期策略解析服务并递归满足其依赖。
pub trait ServiceResolver {
    /// 解析指定标识的服务，返回类型擦除的实例
    fn get_instance(&self, key: &ServiceKey) -> ResolutionResult<ServiceInstance>;

    /// 检查是否可以解析指定标识
    fn can_resolve(&self, key: &ServiceKey) -> bool;

    /// 解析以类型为标识注册的服务
    fn resolve<T: Send + Sync + 'static>(&self) -> ResolutionResult<Arc<T>>
    where
        Self: Sized,
    {
        let key = ServiceKey::of::<T>();
        let instance = self.get_instance(&key)?;
        downcast_instance(&key, instance)
    }

    /// 解析以名称为标识注册的服务
    fn resolve_named<T: Send + Sync + 'static>(&self, name: &str) -> ResolutionResult<Arc<T>>
    where
        Self: Sized,
    {
        let key = ServiceKey::named(name.to_owned());
        let instance = self.get_instance(&key)?;
        downcast_instance(&key, instance)
    }
}

/// 把类型擦除的实例转换到具体类型
pub fn downcast_instance<T: Send + Sync + 'static>(
    key: &ServiceKey,
    instance: ServiceInstance,
) -> ResolutionResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| ResolutionError::TypeMismatch {
            name: key.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
}

/// 解析上下文
///
/// 记录一次顶层解析的递归链，用于检测循环依赖并限制深度。
#[derive(Debug, Clone)]
pub struct ResolveContext {
    chain: Vec<ServiceKey>,
    max_depth: usize,
}

/// 默认最大递归深度
pub const DEFAULT_MAX_DEPTH: usize = 100;

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// 设置最大递归深度
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 把标识压入解析链
    ///
    /// 标识已在链中说明存在循环依赖；超出最大深度同样报错。
    pub fn push_key(&mut self, key: &ServiceKey) -> ResolutionResult<()> {
        if self.chain.contains(key) {
            return Err(ResolutionError::CircularDependency {
                chain: self.format_chain(key),
            });
        }
        if self.chain.len() >= self.max_depth {
            return Err(ResolutionError::MaxDepthExceeded {
                key: key.to_string(),
                max_depth: self.max_depth,
            });
        }
        self.chain.push(key.clone());
        Ok(())
    }

    /// 把标识弹出解析链
    pub fn pop_key(&mut self) {
        self.chain.pop();
    }

    /// 当前递归深度
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    fn format_chain(&self, repeated: &ServiceKey) -> String {
        let mut parts: Vec<String> = self.chain.iter().map(ToString::to_string).collect();
        parts.push(repeated.to_string());
        parts.join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_is_detected() {
        let mut ctx = ResolveContext::new();
        let a = ServiceKey::named("A");
        let b = ServiceKey::named("B");

        ctx.push_key(&a).unwrap();
        ctx.push_key(&b).unwrap();

        let err = ctx.push_key(&a).unwrap_err();
        match err {
            ResolutionError::CircularDependency { chain } => {
                assert_eq!(chain, "A -> B -> A");
            }
            other => panic!("expected CircularDependency, got: {other:?}"),
        }
    }

    #[test]
    fn max_depth_is_enforced() {
        let mut ctx = ResolveContext::new().with_max_depth(2);
        ctx.push_key(&ServiceKey::named("A")).unwrap();
        ctx.push_key(&ServiceKey::named("B")).unwrap();

        let err = ctx.push_key(&ServiceKey::named("C")).unwrap_err();
        assert!(matches!(err, ResolutionError::MaxDepthExceeded { .. }));
    }

    #[test]
    fn pop_restores_depth() {
        let mut ctx = ResolveContext::new();
        ctx.push_key(&ServiceKey::named("A")).unwrap();
        assert_eq!(ctx.depth(), 1);
        ctx.pop_key();
        assert_eq!(ctx.depth(), 0);
        // 弹出后可以重新压入同一标识
        ctx.push_key(&ServiceKey::named("A")).unwrap();
    }
}
