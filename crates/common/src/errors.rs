//! 错误类型定义

use thiserror::Error;

/// 注册错误类型
///
/// 在注册时刻进行"尽力而为"的依赖校验：只有携带依赖描述的
/// 构造型提供者会被校验，零参工厂不参与校验。
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("注册 '{component}' 失败: 参数 '{parameter}' 使用了未注册的依赖 '{dependency}'")]
    UnregisteredDependency {
        component: String,
        parameter: String,
        dependency: String,
    },
}

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("服务未注册: {key}")]
    NotRegistered { key: String },

    #[error("无法解析 '{component}' 的依赖 '{parameter}: {dependency}'")]
    UnresolvedParameter {
        component: String,
        parameter: String,
        dependency: String,
    },

    #[error("Scoped 服务 '{key}' 在作用域之外被请求")]
    ScopeViolation { key: String },

    #[error("构造参数 '{parameter}' 未在依赖描述中声明")]
    MissingArgument { parameter: String },

    #[error("类型转换失败: '{name}' 不是期望的类型 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("构造 '{key}' 失败: {message}")]
    ConstructionFailed { key: String, message: String },

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },

    #[error("解析 '{key}' 超出最大递归深度 {max_depth}")]
    MaxDepthExceeded { key: String, max_depth: usize },
}

/// 注入器统一错误类型
#[derive(Error, Debug)]
pub enum InjectorError {
    #[error("注册错误: {source}")]
    Registration {
        #[from]
        source: RegistrationError,
    },

    #[error("解析错误: {source}")]
    Resolution {
        #[from]
        source: ResolutionError,
    },
}

/// 结果类型别名
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type ResolutionResult<T> = Result<T, ResolutionError>;
pub type InjectorResult<T> = Result<T, InjectorError>;
