//! AspectX - 基于切面链的横切行为组合库
//!
//! 把执行耗时、结果日志、失败恢复这类横切行为组织成有序的切面链，包装在固定签名的
//! 操作外面，操作本身不需要任何改动。
//!
//! ## 模块
//!
//! - **aop**: 切面、切面链、拦截上下文和内置切面
//! - **cfg**: 配置管理模块（TypeOptions + trait 注册表）
//! - **log**: 日志模块（切面的输出目标，支持多种格式和输出方式）
//! - **calculator**: 四则运算示例
//!
//! ## 设计理念
//!
//! - 🔗 **显式组合**: 切面是普通的值，按顺序装配到链上，可以检查和测试
//! - 🔒 **类型安全**: 链绑定到固定的参数和结果类型
//! - 🧵 **并发安全**: 每次调用独立的上下文，切面链可以被多个线程共享
//! - ⚙️ **配置驱动**: 切面通过类型名注册，由配置文件组装

pub mod aop;
pub mod calculator;
pub mod cfg;
pub mod log;

// 重新导出主要的公共 API
pub use aop::{
    register_aspects, Aspect, AspectChain, AspectChainConfig, Capabilities, Failure,
    FailureDescriptor, FailureKind, FailureOutcome, InterceptionContext, InvokeError,
};

pub use cfg::{create_trait_from_type_options, register_trait, TypeOptions};

pub use log::{LogAppender, LogFormatter, LogLevel, LogRecord, Logger, LoggerConfig};
