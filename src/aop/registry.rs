use crate::aop::aspect::Aspect;
use crate::aop::aspects::{
    LoggingAspect, LoggingConfig, RecoverAspect, RecoverConfig, TraceAspect, TraceConfig,
};
use crate::aop::chain::AspectChain;
use crate::cfg::{create_trait_from_type_options, register_trait_with, TypeOptions};
use crate::log::{Logger, LoggerConfig};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Debug;
use std::sync::Arc;

/// 切面链配置
///
/// `aspects` 的顺序即声明顺序
///
/// ```json5
/// {
///     aspects: [
///         { type: "Logging", options: { info_sample_rate: 1.0 } },
///         { type: "Trace", options: { slow_threshold: "100ms" } },
///         { type: "Recover", options: { kind: "division_by_zero", fallback: 0.0 } },
///     ],
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AspectChainConfig {
    pub aspects: Vec<TypeOptions>,

    /// 链的诊断日志
    pub logger: Option<LoggerConfig>,
}

/// 为签名 `(A, R)` 注册内置切面：`Trace`、`Logging`、`Recover`
///
/// 泛型 trait 的每种签名在注册表中相互独立，使用哪种签名的链就需要注册哪种签名。
/// 重复注册是安全的。
pub fn register_aspects<A, R>() -> Result<()>
where
    A: Debug + 'static,
    R: Debug + Clone + DeserializeOwned + Send + Sync + 'static,
{
    register_trait_with::<dyn Aspect<A, R>, TraceConfig, _>("Trace", |config| {
        Ok(Box::new(TraceAspect::new(config)?))
    })?;
    register_trait_with::<dyn Aspect<A, R>, LoggingConfig, _>("Logging", |config| {
        Ok(Box::new(LoggingAspect::new(config)?))
    })?;
    register_trait_with::<dyn Aspect<A, R>, RecoverConfig, _>("Recover", |config| {
        Ok(Box::new(RecoverAspect::<R>::from_config(config)?))
    })?;
    Ok(())
}

/// 按名称创建一个切面
pub fn create_aspect<A, R>(options: &TypeOptions) -> Result<Arc<dyn Aspect<A, R>>>
where
    A: 'static,
    R: 'static,
{
    let aspect: Box<dyn Aspect<A, R>> = create_trait_from_type_options(options)?;
    Ok(Arc::from(aspect))
}

impl<A: 'static, R: 'static, F> AspectChain<A, R, F> {
    /// 从配置构建切面链
    ///
    /// 切面类型需要事先注册，内置切面通过 `register_aspects::<A, R>()` 注册。
    pub fn from_config(
        operation: impl Into<Arc<str>>,
        config: &AspectChainConfig,
        target: F,
    ) -> Result<Self> {
        let operation: Arc<str> = operation.into();

        let mut builder = AspectChain::builder(Arc::clone(&operation));
        for (index, options) in config.aspects.iter().enumerate() {
            let aspect = create_aspect::<A, R>(options).with_context(|| {
                format!(
                    "Failed to build aspect #{} '{}' of '{}'",
                    index, options.type_name, operation
                )
            })?;
            builder = builder.shared(aspect);
        }

        if let Some(logger) = &config.logger {
            builder = builder.logger(Logger::resolve(logger.clone())?);
        }

        Ok(builder.build(target))
    }
}
