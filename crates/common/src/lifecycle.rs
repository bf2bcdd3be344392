//! 服务生命周期管理

use std::fmt;

/// 服务生命周期策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifestyle {
    /// 每次请求都创建新实例，从不缓存
    PerRequest,
    /// 单例模式 - 首次解析时惰性创建，容器生命周期内共享
    Singleton,
    /// 作用域模式 - 在同一作用域激活窗口内共享实例
    Scoped,
}

impl Default for Lifestyle {
    fn default() -> Self {
        Self::PerRequest
    }
}

impl fmt::Display for Lifestyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerRequest => write!(f, "PerRequest"),
            Self::Singleton => write!(f, "Singleton"),
            Self::Scoped => write!(f, "Scoped"),
        }
    }
}

/// 作用域元数据
///
/// 作用域帧在栈上的身份信息，仅用于日志和诊断。
#[derive(Debug, Clone)]
pub struct ScopeInfo {
    /// 作用域ID
    pub id: uuid::Uuid,
    /// 栈深度（最外层作用域为 1）
    pub depth: usize,
    /// 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ScopeInfo {
    /// 创建新的作用域元数据
    pub fn new(depth: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            depth,
            created_at: chrono::Utc::now(),
        }
    }
}
