//! # 示例应用程序
//!
//! 演示注入器的注册、生命周期解析和作用域守卫用法

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use injector_abstractions::{
    ConstructorArgs, Registration, ServiceRegistry, ServiceResolver,
};
use injector_common::{DependencyDescriptor, Lifestyle, ServiceKey};
use injector_impl::Injector;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "注入器演示应用")]
struct Args {
    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 发动机服务（进程级单例）
#[derive(Debug)]
struct PetrolEngine {
    displacement: u32,
}

/// 日志服务（每次请求新实例）
#[derive(Debug)]
struct DebugLogger;

impl DebugLogger {
    fn log(&self, message: &str) {
        info!("[DebugLogger] {message}");
    }
}

/// 整车服务（作用域内共享）
#[derive(Debug)]
struct CityCar {
    engine: Arc<PetrolEngine>,
    logger: Arc<DebugLogger>,
}

impl CityCar {
    fn drive(&self) {
        self.logger
            .log(&format!("行驶中，排量 {} cc", self.engine.displacement));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动注入器演示应用");

    let injector = build_injector()?;

    demonstrate_lifestyles(&injector)?;
    demonstrate_scope_violation(&injector);

    info!("演示结束");
    Ok(())
}

/// 搭建注册表
fn build_injector() -> Result<Injector, Box<dyn std::error::Error>> {
    info!("注册服务");
    let injector = Injector::new();

    injector.register(
        Registration::factory(ServiceKey::named("Engine"), || PetrolEngine {
            displacement: 1598,
        })
        .with_lifestyle(Lifestyle::Singleton),
    )?;

    injector.register(
        Registration::factory(ServiceKey::named("Logger"), || DebugLogger)
            .with_lifestyle(Lifestyle::PerRequest),
    )?;

    injector.register(
        Registration::constructor(
            ServiceKey::named("Car"),
            vec![
                DependencyDescriptor::new("engine", ServiceKey::named("Engine")),
                DependencyDescriptor::new("logger", ServiceKey::named("Logger")),
            ],
            |args: &ConstructorArgs| {
                Ok(CityCar {
                    engine: args.get("engine")?,
                    logger: args.get("logger")?,
                })
            },
        )
        .with_lifestyle(Lifestyle::Scoped),
    )?;

    info!("注册完成，共 {} 个服务", injector.get_registered_services().len());
    Ok(injector)
}

/// 演示三种生命周期
fn demonstrate_lifestyles(injector: &Injector) -> Result<(), Box<dyn std::error::Error>> {
    // 单例：两次解析同一实例
    let engine1: Arc<PetrolEngine> = injector.resolve_named("Engine")?;
    let engine2: Arc<PetrolEngine> = injector.resolve_named("Engine")?;
    info!(
        "Engine 单例共享: {}",
        if Arc::ptr_eq(&engine1, &engine2) { "是" } else { "否" }
    );

    // 每次请求：两次解析不同实例
    let logger1: Arc<DebugLogger> = injector.resolve_named("Logger")?;
    let logger2: Arc<DebugLogger> = injector.resolve_named("Logger")?;
    info!(
        "Logger 每次请求独立: {}",
        if Arc::ptr_eq(&logger1, &logger2) { "否" } else { "是" }
    );

    // 作用域：激活窗口内共享，跨窗口独立
    let first_car = {
        let scope = injector.open_scope();
        let car1: Arc<CityCar> = scope.resolve_named("Car")?;
        let car2: Arc<CityCar> = scope.resolve_named("Car")?;
        info!(
            "同一作用域内 Car 共享: {}",
            if Arc::ptr_eq(&car1, &car2) { "是" } else { "否" }
        );
        car1.drive();
        car1
    };

    let scope = injector.open_scope();
    let later_car: Arc<CityCar> = scope.resolve_named("Car")?;
    info!(
        "跨作用域 Car 独立: {}",
        if Arc::ptr_eq(&first_car, &later_car) { "否" } else { "是" }
    );
    later_car.drive();

    Ok(())
}

/// 演示作用域违规错误
fn demonstrate_scope_violation(injector: &Injector) {
    match injector.resolve_named::<CityCar>("Car") {
        Ok(_) => info!("意外：无作用域时竟然解析成功"),
        Err(e) => info!("无作用域解析 Car 被拒绝: {e}"),
    }
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
