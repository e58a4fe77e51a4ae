use crate::aop::aspect::{Aspect, Capabilities};
use crate::aop::context::InterceptionContext;
use crate::aop::failure::{FailureDescriptor, FailureKind, FailureOutcome};
use crate::log::{LogLevel, LogRecord, Logger, LoggerConfig};
use anyhow::Result;
use garde::Validate;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::fmt::Debug;
use std::sync::Arc;

/// Logging 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logger 配置
    #[garde(skip)]
    pub logger: LoggerConfig,

    /// 成功日志的采样率（0.0 - 1.0），默认 1.0（总是记录）
    #[default = 1.0]
    #[garde(range(min = 0.0, max = 1.0))]
    pub info_sample_rate: f32,

    /// 失败日志的采样率（0.0 - 1.0），默认 1.0（总是记录）
    #[default = 1.0]
    #[garde(range(min = 0.0, max = 1.0))]
    pub warn_sample_rate: f32,
}

/// 结果日志切面
///
/// 成功时输出 `{operation}: {result:?}`，附带参数和结果；失败时输出 `{operation} failed`，
/// 只观察不处理，总是返回 `Propagate`。
pub struct LoggingAspect {
    logger: Arc<Logger>,
    info_sample_rate: f32,
    warn_sample_rate: f32,
}

impl LoggingAspect {
    pub fn new(config: LoggingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            logger: Logger::resolve(config.logger)?,
            info_sample_rate: config.info_sample_rate,
            warn_sample_rate: config.warn_sample_rate,
        })
    }

    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            info_sample_rate: 1.0,
            warn_sample_rate: 1.0,
        }
    }

    fn sampled(rate: f32) -> bool {
        rate >= 1.0 || rand::random::<f32>() < rate
    }
}

impl<A: Debug, R: Debug> Aspect<A, R> for LoggingAspect {
    fn name(&self) -> &str {
        "Logging"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::EXIT | Capabilities::FAILURE
    }

    fn on_exit(&self, ctx: &mut InterceptionContext<A, R>) {
        let Some(result) = ctx.result() else {
            return;
        };
        if !self.logger.enabled(LogLevel::Info) || !Self::sampled(self.info_sample_rate) {
            return;
        }

        let record = LogRecord::new(LogLevel::Info, format!("{}: {:?}", ctx.operation(), result))
            .with_location(file!(), line!())
            .with_module(module_path!())
            .with_metadata("operation", ctx.operation())
            .with_metadata("args", format!("{:?}", ctx.args()))
            .with_metadata("result", format!("{:?}", result))
            .with_metadata("status", "success");
        let _ = self.logger.log(record);
    }

    fn handles(&self, _kind: &FailureKind) -> bool {
        true
    }

    fn on_failure(
        &self,
        ctx: &mut InterceptionContext<A, R>,
        failure: &FailureDescriptor<'_>,
    ) -> FailureOutcome<R> {
        if self.logger.enabled(LogLevel::Warn) && Self::sampled(self.warn_sample_rate) {
            let record = LogRecord::new(LogLevel::Warn, format!("{} failed", ctx.operation()))
                .with_location(file!(), line!())
                .with_module(module_path!())
                .with_metadata("operation", ctx.operation())
                .with_metadata("args", format!("{:?}", ctx.args()))
                .with_metadata("kind", failure.kind().as_str())
                .with_metadata("error", failure.error().to_string())
                .with_metadata("status", "failure");
            let _ = self.logger.log(record);
        }

        FailureOutcome::Propagate
    }
}
