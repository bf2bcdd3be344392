//! # 依赖注入具体实现
//!
//! 提供具体的注入器实现：注册表、递归解析器和作用域栈。
//!
//! 解析是同步的深度优先递归：每个依赖按注册条目的依赖描述
//! 逐个求值，生命周期策略决定实例是否缓存以及缓存在哪里。
//! 内部状态使用 `parking_lot` 锁做内部可变性，但设计假定
//! 单线程访问，不对并发解析做任何保证。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use injector_abstractions::{
    ConstructorArgs, ParamValue, Provider, Registration, ResolveContext, ServiceInstance,
    ServiceRegistry, ServiceResolver,
};
use injector_common::{
    Lifestyle, RegistrationError, RegistrationResult, ResolutionError, ResolutionResult,
    ScopeInfo, ServiceDescriptor, ServiceKey,
};

/// 作用域栈帧
///
/// 一次作用域激活期间创建的 Scoped 实例缓存。
struct ScopeFrame {
    info: ScopeInfo,
    instances: HashMap<ServiceKey, ServiceInstance>,
}

impl ScopeFrame {
    fn new(depth: usize) -> Self {
        Self {
            info: ScopeInfo::new(depth),
            instances: HashMap::new(),
        }
    }
}

/// 具体的依赖注入容器实现
///
/// 容器自身的三块状态：
/// - `registry` - 标识到注册条目的映射，只被显式注册调用修改
/// - `singletons` - 单例缓存，首次解析时惰性填充
/// - `scope_stack` - 作用域栈，进入作用域压栈、退出弹栈
pub struct Injector {
    registry: RwLock<HashMap<ServiceKey, Registration>>,
    singletons: RwLock<HashMap<ServiceKey, ServiceInstance>>,
    scope_stack: Mutex<Vec<ScopeFrame>>,
}

impl Injector {
    /// 创建新的注入器
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
            scope_stack: Mutex::new(Vec::new()),
        }
    }

    /// 打开一个新作用域
    ///
    /// 压入一个空栈帧并返回守卫；守卫在任何退出路径上
    /// （正常返回或错误传播）都会弹出该栈帧。
    pub fn open_scope(&self) -> ScopeGuard<'_> {
        let mut stack = self.scope_stack.lock();
        let frame = ScopeFrame::new(stack.len() + 1);
        let info = frame.info.clone();
        stack.push(frame);
        debug!("进入作用域: {} (深度 {})", info.id, info.depth);
        ScopeGuard {
            injector: self,
            info,
        }
    }

    /// 当前是否有活动作用域
    pub fn has_active_scope(&self) -> bool {
        !self.scope_stack.lock().is_empty()
    }

    /// 按生命周期策略解析一个标识
    fn resolve_key(
        &self,
        key: &ServiceKey,
        ctx: &mut ResolveContext,
    ) -> ResolutionResult<ServiceInstance> {
        ctx.push_key(key)?;
        let result = self.dispatch(key, ctx);
        ctx.pop_key();
        result
    }

    fn dispatch(
        &self,
        key: &ServiceKey,
        ctx: &mut ResolveContext,
    ) -> ResolutionResult<ServiceInstance> {
        // 克隆注册条目后立即释放读锁，递归解析期间不持锁
        let registration = self
            .registry
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ResolutionError::NotRegistered {
                key: key.to_string(),
            })?;

        match registration.lifestyle {
            Lifestyle::PerRequest => self.construct(&registration, ctx),
            Lifestyle::Singleton => self.resolve_singleton(key, &registration, ctx),
            Lifestyle::Scoped => self.resolve_scoped(key, &registration, ctx),
        }
    }

    fn resolve_singleton(
        &self,
        key: &ServiceKey,
        registration: &Registration,
        ctx: &mut ResolveContext,
    ) -> ResolutionResult<ServiceInstance> {
        if let Some(existing) = self.singletons.read().get(key) {
            return Ok(existing.clone());
        }

        let instance = self.construct(registration, ctx)?;
        debug!("创建单例实例: {key}");

        // 单线程模型下不会出现竞争构造；仍以 entry 语义兜底
        Ok(self
            .singletons
            .write()
            .entry(key.clone())
            .or_insert(instance)
            .clone())
    }

    fn resolve_scoped(
        &self,
        key: &ServiceKey,
        registration: &Registration,
        ctx: &mut ResolveContext,
    ) -> ResolutionResult<ServiceInstance> {
        {
            let stack = self.scope_stack.lock();
            let frame = stack
                .last()
                .ok_or_else(|| ResolutionError::ScopeViolation {
                    key: key.to_string(),
                })?;
            if let Some(existing) = frame.instances.get(key) {
                return Ok(existing.clone());
            }
        }

        // 构造期间必须释放栈锁：嵌套依赖可能同样是 Scoped
        let instance = self.construct(registration, ctx)?;

        let mut stack = self.scope_stack.lock();
        let frame = stack
            .last_mut()
            .ok_or_else(|| ResolutionError::ScopeViolation {
                key: key.to_string(),
            })?;
        debug!("缓存 Scoped 实例: {key} (作用域 {})", frame.info.id);
        Ok(frame
            .instances
            .entry(key.clone())
            .or_insert(instance)
            .clone())
    }

    /// 调用提供者构造一个新实例
    ///
    /// 构造型提供者按依赖描述逐个求参：手动字面值按原样使用，
    /// 手动引用与自动装配均递归解析；零参工厂直接调用，
    /// 任何参数覆盖都被忽略。
    fn construct(
        &self,
        registration: &Registration,
        ctx: &mut ResolveContext,
    ) -> ResolutionResult<ServiceInstance> {
        match &registration.provider {
            Provider::Factory { create } => Ok(create()),
            Provider::Constructor {
                construct,
                dependencies,
            } => {
                let mut args = ConstructorArgs::new();
                for dependency in dependencies {
                    let value = match registration.params.get(dependency.parameter) {
                        Some(ParamValue::Literal(value)) => value.clone(),
                        Some(ParamValue::Reference(key)) => self.resolve_key(key, ctx)?,
                        None => {
                            if self.registry.read().contains_key(&dependency.key) {
                                self.resolve_key(&dependency.key, ctx)?
                            } else {
                                return Err(ResolutionError::UnresolvedParameter {
                                    component: registration.key.to_string(),
                                    parameter: dependency.parameter.to_string(),
                                    dependency: dependency.key.to_string(),
                                });
                            }
                        }
                    };
                    args.insert(dependency.parameter, value);
                }
                construct(&args)
            }
        }
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("registered", &self.registry.read().len())
            .field("singletons", &self.singletons.read().len())
            .field("scope_depth", &self.scope_stack.lock().len())
            .finish()
    }
}

impl ServiceRegistry for Injector {
    fn register(&self, registration: Registration) -> RegistrationResult<()> {
        // 注册时校验：仅构造型提供者可内省，逐个检查未被
        // 手动覆盖的依赖描述是否指向已注册标识
        if let Provider::Constructor { dependencies, .. } = &registration.provider {
            let registry = self.registry.read();
            for dependency in dependencies {
                if registration.params.contains_key(dependency.parameter) {
                    continue;
                }
                if !registry.contains_key(&dependency.key) {
                    return Err(RegistrationError::UnregisteredDependency {
                        component: registration.key.to_string(),
                        parameter: dependency.parameter.to_string(),
                        dependency: dependency.key.to_string(),
                    });
                }
            }
        }

        info!(
            "注册服务: {} ({}, {:?})",
            registration.key,
            registration.lifestyle,
            registration.provider.kind()
        );

        let mut registry = self.registry.write();
        if registry
            .insert(registration.key.clone(), registration)
            .is_some()
        {
            warn!("覆盖已有注册条目");
        }
        Ok(())
    }

    fn is_registered(&self, key: &ServiceKey) -> bool {
        self.registry.read().contains_key(key)
    }

    fn get_registered_services(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .read()
            .values()
            .map(Registration::descriptor)
            .collect()
    }

    fn validate(&self) -> Result<(), Vec<RegistrationError>> {
        let registry = self.registry.read();
        let mut errors = Vec::new();

        for registration in registry.values() {
            for dependency in registration.provider.dependencies() {
                if registration.params.contains_key(dependency.parameter) {
                    continue;
                }
                if !registry.contains_key(&dependency.key) {
                    errors.push(RegistrationError::UnregisteredDependency {
                        component: registration.key.to_string(),
                        parameter: dependency.parameter.to_string(),
                        dependency: dependency.key.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn clear(&self) {
        info!("清空注入器状态");
        self.registry.write().clear();
        self.singletons.write().clear();
        self.scope_stack.lock().clear();
    }
}

impl ServiceResolver for Injector {
    fn get_instance(&self, key: &ServiceKey) -> ResolutionResult<ServiceInstance> {
        debug!("解析服务: {key}");
        let mut ctx = ResolveContext::new();
        self.resolve_key(key, &mut ctx)
    }

    fn can_resolve(&self, key: &ServiceKey) -> bool {
        self.is_registered(key)
    }
}

/// 作用域守卫
///
/// 持有期间顶层栈帧即"当前作用域"；析构时无条件弹出栈帧，
/// 作用域内创建的 Scoped 实例不会泄漏到后续激活中。
pub struct ScopeGuard<'a> {
    injector: &'a Injector,
    info: ScopeInfo,
}

impl ScopeGuard<'_> {
    /// 作用域元数据
    pub fn info(&self) -> &ScopeInfo {
        &self.info
    }

    /// 所属注入器
    pub fn injector(&self) -> &Injector {
        self.injector
    }

    /// 在当前作用域内解析指定标识
    pub fn get_instance(&self, key: &ServiceKey) -> ResolutionResult<ServiceInstance> {
        self.injector.get_instance(key)
    }

    /// 在当前作用域内解析以类型为标识的服务
    pub fn resolve<T: Send + Sync + 'static>(&self) -> ResolutionResult<Arc<T>> {
        self.injector.resolve::<T>()
    }

    /// 在当前作用域内解析以名称为标识的服务
    pub fn resolve_named<T: Send + Sync + 'static>(&self, name: &str) -> ResolutionResult<Arc<T>> {
        self.injector.resolve_named::<T>(name)
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.injector.scope_stack.lock();
        if let Some(frame) = stack.pop() {
            if frame.info.id != self.info.id {
                warn!(
                    "作用域退出顺序异常: 期望 {}, 实际 {}",
                    self.info.id, frame.info.id
                );
            }
            debug!(
                "退出作用域: {} (缓存实例 {} 个)",
                frame.info.id,
                frame.instances.len()
            );
        }
    }
}

impl fmt::Debug for ScopeGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("id", &self.info.id)
            .field("depth", &self.info.depth)
            .finish()
    }
}
