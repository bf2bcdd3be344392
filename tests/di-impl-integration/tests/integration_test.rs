//! Centralized integration tests for injector-impl crate (migrated)

use std::sync::Arc;

use injector_abstractions::{
    ConstructorArgs, Registration, ServiceRegistry, ServiceResolver,
};
use injector_common::{DependencyDescriptor, Lifestyle, ResolutionError, ServiceKey};
use injector_impl::Injector;

/// 测试服务
#[derive(Debug)]
struct TestService {
    name: String,
}

impl TestService {
    fn new(name: String) -> Self {
        Self { name }
    }
    fn get_name(&self) -> &str {
        &self.name
    }
}

/// 持有依赖的测试服务
#[derive(Debug)]
struct DependentService {
    inner: Arc<TestService>,
}

#[test]
fn test_service_registration_and_resolution() {
    let injector = Injector::new();
    injector
        .register(Registration::factory(ServiceKey::of::<TestService>(), || {
            TestService::new("test".to_string())
        }))
        .unwrap();

    assert!(injector.is_registered(&ServiceKey::of::<TestService>()));

    let resolved = injector.resolve::<TestService>().unwrap();
    assert_eq!(resolved.get_name(), "test");
}

#[test]
fn test_singleton_factory_registration() {
    let injector = Injector::new();
    injector
        .register(
            Registration::factory(ServiceKey::of::<TestService>(), || {
                TestService::new("factory_created".to_string())
            })
            .with_lifestyle(Lifestyle::Singleton),
        )
        .unwrap();

    let resolved = injector.resolve::<TestService>().unwrap();
    assert_eq!(resolved.get_name(), "factory_created");

    // 单例行为 - 第二次解析应该返回同一个实例
    let resolved2 = injector.resolve::<TestService>().unwrap();
    assert!(Arc::ptr_eq(&resolved, &resolved2));
}

#[test]
fn test_constructor_injection_with_declared_dependency() {
    let injector = Injector::new();
    injector
        .register(
            Registration::factory(ServiceKey::of::<TestService>(), || {
                TestService::new("inner".to_string())
            })
            .with_lifestyle(Lifestyle::Singleton),
        )
        .unwrap();
    injector
        .register(Registration::constructor(
            ServiceKey::of::<DependentService>(),
            vec![DependencyDescriptor::new(
                "inner",
                ServiceKey::of::<TestService>(),
            )],
            |args: &ConstructorArgs| {
                Ok(DependentService {
                    inner: args.get("inner")?,
                })
            },
        ))
        .unwrap();

    let dependent = injector.resolve::<DependentService>().unwrap();
    let inner = injector.resolve::<TestService>().unwrap();
    assert!(Arc::ptr_eq(&dependent.inner, &inner));
}

#[test]
fn test_scope_guard_pops_on_exit() {
    let injector = Injector::new();
    injector
        .register(
            Registration::factory(ServiceKey::of::<TestService>(), || {
                TestService::new("scoped".to_string())
            })
            .with_lifestyle(Lifestyle::Scoped),
        )
        .unwrap();

    assert!(!injector.has_active_scope());
    {
        let scope = injector.open_scope();
        assert!(injector.has_active_scope());
        assert!(scope.resolve::<TestService>().is_ok());
    }
    assert!(!injector.has_active_scope());

    let err = injector.resolve::<TestService>().unwrap_err();
    assert!(matches!(err, ResolutionError::ScopeViolation { .. }));
}

#[test]
fn test_container_validation() {
    let injector = Injector::new();
    injector
        .register(Registration::factory(ServiceKey::of::<TestService>(), || {
            TestService::new("valid".to_string())
        }))
        .unwrap();

    assert!(injector.validate().is_ok());

    let services = injector.get_registered_services();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].key.short_name(), "TestService");
}

#[test]
fn test_container_clear() {
    let injector = Injector::new();
    injector
        .register(Registration::factory(ServiceKey::of::<TestService>(), || {
            TestService::new("test".to_string())
        }))
        .unwrap();

    assert!(injector.is_registered(&ServiceKey::of::<TestService>()));

    injector.clear();

    assert!(!injector.is_registered(&ServiceKey::of::<TestService>()));
    assert_eq!(injector.get_registered_services().len(), 0);
}
