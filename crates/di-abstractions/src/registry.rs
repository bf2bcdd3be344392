//! 服务注册表抽象接口

use std::collections::HashMap;
use std::fmt;

use injector_common::{
    DependencyDescriptor, Lifestyle, RegistrationError, RegistrationResult, ServiceDescriptor,
    ServiceKey,
};

use crate::provider::{ConstructorArgs, ParamValue, Provider};

/// 注册条目
///
/// 一个服务标识对应至多一条注册；重复注册覆盖旧条目。
#[derive(Clone)]
pub struct Registration {
    /// 服务标识
    pub key: ServiceKey,
    /// 构造配方
    pub provider: Provider,
    /// 生命周期策略
    pub lifestyle: Lifestyle,
    /// 手动参数覆盖表
    pub params: HashMap<&'static str, ParamValue>,
}

impl Registration {
    /// 创建可构造类型的注册条目（默认 PerRequest）
    pub fn constructor<T, F>(
        key: ServiceKey,
        dependencies: Vec<DependencyDescriptor>,
        construct: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ConstructorArgs) -> injector_common::ResolutionResult<T> + Send + Sync + 'static,
    {
        Self {
            key,
            provider: Provider::constructor(dependencies, construct),
            lifestyle: Lifestyle::default(),
            params: HashMap::new(),
        }
    }

    /// 创建零参工厂的注册条目（默认 PerRequest）
    pub fn factory<T, F>(key: ServiceKey, create: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            key,
            provider: Provider::factory(create),
            lifestyle: Lifestyle::default(),
            params: HashMap::new(),
        }
    }

    /// 设置生命周期策略
    pub fn with_lifestyle(mut self, lifestyle: Lifestyle) -> Self {
        self.lifestyle = lifestyle;
        self
    }

    /// 添加手动参数覆盖
    pub fn with_param(mut self, parameter: &'static str, value: ParamValue) -> Self {
        self.params.insert(parameter, value);
        self
    }

    /// 生成只读描述符快照
    pub fn descriptor(&self) -> ServiceDescriptor {
        ServiceDescriptor {
            key: self.key.clone(),
            lifestyle: self.lifestyle,
            provider_kind: self.provider.kind(),
            dependencies: self.provider.dependencies().to_vec(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("lifestyle", &self.lifestyle)
            .field("provider", &self.provider)
            .field("params", &self.params)
            .finish()
    }
}

/// 服务注册表 trait
///
/// 记录服务标识到构造配方与生命周期策略的映射。
pub trait ServiceRegistry {
    /// 注册服务
    ///
    /// 对于构造型提供者，在注册时校验每个未被手动覆盖的
    /// 依赖描述是否指向已注册标识；校验失败返回
    /// [`RegistrationError`]。零参工厂不参与校验。
    fn register(&self, registration: Registration) -> RegistrationResult<()>;

    /// 检查服务是否已注册
    fn is_registered(&self, key: &ServiceKey) -> bool;

    /// 获取所有已注册的服务描述符
    fn get_registered_services(&self) -> Vec<ServiceDescriptor>;

    /// 校验整个注册表的依赖关系
    fn validate(&self) -> Result<(), Vec<RegistrationError>>;

    /// 清空注册表、单例缓存和作用域栈
    fn clear(&self);
}
