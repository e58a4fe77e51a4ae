//! AOP (Aspect-Oriented Programming) 模块
//!
//! 把横切行为（执行耗时、结果日志、失败恢复）组织成有序的切面链，包装在固定签名的目标
//! 操作外面，目标本身不需要任何改动。
//!
//! - `Aspect`：切面，实现 `on_entry` / `on_exit` / `on_failure` 中的任意几个
//! - `AspectChain`：切面链，入口钩子按声明顺序执行，出口和失败钩子按逆序执行
//! - `InterceptionContext`：单次调用的上下文，携带参数、结果和每个切面独立的 scratch
//! - `FailureKind` / `FailureDescriptor`：失败分类，切面据此决定是否处理
//!
//! # 使用示例
//!
//! ```ignore
//! use aspectx::aop::{AspectChain, RecoverAspect, TraceAspect};
//!
//! let chain = AspectChain::builder("Calculator.Divide")
//!     .aspect(TraceAspect::with_logger(logger.clone()))
//!     .aspect(RecoverAspect::new("division_by_zero", 0.0).logger(logger))
//!     .build(|&(x, y): &(i32, i32)| calculator::divide(x, y));
//!
//! assert_eq!(chain.invoke((20, 4))?, 5.0);
//! assert_eq!(chain.invoke((20, 0))?, 0.0);
//! ```
//!
//! 也可以从配置构建：
//!
//! ```ignore
//! register_aspects::<(i32, i32), f64>()?;
//! let config: AspectChainConfig = json5::from_str(r#"{ aspects: [{ type: "Trace" }] }"#)?;
//! let chain = AspectChain::from_config("Calculator.Divide", &config, divide)?;
//! ```

pub mod aspect;
pub mod aspects;
pub mod chain;
pub mod context;
pub mod error;
pub mod failure;
pub mod registry;

pub use aspect::{Aspect, Capabilities};
pub use aspects::{
    LoggingAspect, LoggingConfig, RecoverAspect, RecoverConfig, TraceAspect, TraceConfig,
};
pub use chain::{AspectChain, AspectChainBuilder};
pub use context::{AspectId, InterceptionContext};
pub use error::{AopError, InvokeError};
pub use failure::{Failure, FailureDescriptor, FailureKind, FailureOutcome};
pub use registry::{create_aspect, register_aspects, AspectChainConfig};
