//! 服务提供者
//!
//! 提供者是某个服务标识的构造配方：要么是携带依赖描述的
//! 构造函数，要么是零参工厂。实例以类型擦除的
//! `Arc<dyn Any + Send + Sync>` 形式在容器内流转，
//! 身份比较使用 `Arc::ptr_eq`。

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use injector_common::{
    DependencyDescriptor, ProviderKind, ResolutionError, ResolutionResult, ServiceKey,
};

/// 类型擦除的服务实例
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// 构造函数类型：接收已解析的参数集合，返回类型擦除的实例
pub type ConstructorFn =
    Arc<dyn Fn(&ConstructorArgs) -> ResolutionResult<ServiceInstance> + Send + Sync>;

/// 零参工厂类型：无视任何参数覆盖，直接产出实例
pub type FactoryFn = Arc<dyn Fn() -> ServiceInstance + Send + Sync>;

/// 已解析的构造参数集合
///
/// 解析器按依赖描述逐个填充参数，构造函数按名取用。
#[derive(Default)]
pub struct ConstructorArgs {
    values: HashMap<&'static str, ServiceInstance>,
}

impl ConstructorArgs {
    /// 创建空的参数集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 填入一个已解析的参数
    pub fn insert(&mut self, parameter: &'static str, value: ServiceInstance) {
        self.values.insert(parameter, value);
    }

    /// 按名取出参数并转换到具体类型
    pub fn get<T: Send + Sync + 'static>(&self, parameter: &str) -> ResolutionResult<Arc<T>> {
        let value = self
            .values
            .get(parameter)
            .ok_or_else(|| ResolutionError::MissingArgument {
                parameter: parameter.to_string(),
            })?;
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| ResolutionError::TypeMismatch {
                name: parameter.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// 按名取出参数并克隆出具体值
    ///
    /// 适用于服务类型本身就是 `Arc<dyn Trait>` 或其他可克隆
    /// 值的场合。
    pub fn get_cloned<T: Clone + Send + Sync + 'static>(
        &self,
        parameter: &str,
    ) -> ResolutionResult<T> {
        self.get::<T>(parameter).map(|value| (*value).clone())
    }

    /// 是否包含指定参数
    pub fn contains(&self, parameter: &str) -> bool {
        self.values.contains_key(parameter)
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ConstructorArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorArgs")
            .field("parameters", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// 手动参数覆盖
///
/// 注册条目的 `params` 表中每个参数的来源：
/// 字面值按原样使用，引用则递归解析另一个已注册标识。
#[derive(Clone)]
pub enum ParamValue {
    /// 字面值，按原样注入
    Literal(ServiceInstance),
    /// 引用另一个已注册标识，解析时递归求值
    Reference(ServiceKey),
}

impl ParamValue {
    /// 从任意值创建字面参数
    pub fn literal<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Literal(Arc::new(value))
    }

    /// 创建引用参数
    pub fn reference(key: ServiceKey) -> Self {
        Self::Reference(key)
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => write!(f, "Literal(<value>)"),
            Self::Reference(key) => write!(f, "Reference({key})"),
        }
    }
}

/// 服务提供者
#[derive(Clone)]
pub enum Provider {
    /// 可构造类型：构造函数加上显式依赖描述
    Constructor {
        /// 构造函数
        construct: ConstructorFn,
        /// 依赖描述列表，按声明顺序解析
        dependencies: Vec<DependencyDescriptor>,
    },
    /// 零参工厂：调用时不传任何参数
    Factory {
        /// 工厂函数
        create: FactoryFn,
    },
}

impl Provider {
    /// 创建可构造类型提供者
    pub fn constructor<T, F>(dependencies: Vec<DependencyDescriptor>, construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ConstructorArgs) -> ResolutionResult<T> + Send + Sync + 'static,
    {
        Self::Constructor {
            construct: Arc::new(move |args| {
                construct(args).map(|value| Arc::new(value) as ServiceInstance)
            }),
            dependencies,
        }
    }

    /// 创建零参工厂提供者
    pub fn factory<T, F>(create: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Factory {
            create: Arc::new(move || Arc::new(create()) as ServiceInstance),
        }
    }

    /// 提供者类别
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Constructor { .. } => ProviderKind::Constructor,
            Self::Factory { .. } => ProviderKind::Factory,
        }
    }

    /// 依赖描述列表（工厂提供者恒为空）
    pub fn dependencies(&self) -> &[DependencyDescriptor] {
        match self {
            Self::Constructor { dependencies, .. } => dependencies,
            Self::Factory { .. } => &[],
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor { dependencies, .. } => f
                .debug_struct("Constructor")
                .field("dependencies", dependencies)
                .finish_non_exhaustive(),
            Self::Factory { .. } => f.debug_struct("Factory").finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_args_roundtrip() {
        let mut args = ConstructorArgs::new();
        args.insert("name", Arc::new(String::from("engine")));

        let value: Arc<String> = args.get("name").unwrap();
        assert_eq!(value.as_str(), "engine");
        assert_eq!(args.get_cloned::<String>("name").unwrap(), "engine");
    }

    #[test]
    fn missing_argument_is_reported() {
        let args = ConstructorArgs::new();
        let err = args.get::<String>("absent").unwrap_err();
        assert!(matches!(err, ResolutionError::MissingArgument { .. }));
    }

    #[test]
    fn wrong_type_is_reported() {
        let mut args = ConstructorArgs::new();
        args.insert("port", Arc::new(8080_u16));

        let err = args.get::<String>("port").unwrap_err();
        assert!(matches!(err, ResolutionError::TypeMismatch { .. }));
    }

    #[test]
    fn factory_provider_has_no_dependencies() {
        let provider = Provider::factory(|| 42_u32);
        assert_eq!(provider.kind(), ProviderKind::Factory);
        assert!(provider.dependencies().is_empty());
    }
}
