use crate::aop::aspect::{Aspect, Capabilities};
use crate::aop::context::InterceptionContext;
use crate::aop::failure::{FailureDescriptor, FailureKind, FailureOutcome};
use crate::log::{LogLevel, LogRecord, Logger, LoggerConfig};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Recover 配置
#[derive(Debug, Clone, Deserialize)]
pub struct RecoverConfig {
    /// 处理的失败类型
    pub kind: FailureKind,

    /// 替代结果
    pub fallback: JsonValue,

    /// 切面名称，默认 "Recover"
    #[serde(default)]
    pub name: Option<String>,

    /// 恢复时输出的提示，默认 "{kind} exception"
    #[serde(default)]
    pub message: Option<String>,

    /// 不配置时不输出提示
    #[serde(default)]
    pub logger: Option<LoggerConfig>,
}

/// 失败恢复切面
///
/// 只处理一种失败类型：输出提示后返回预设的替代结果，阻止失败继续传播。
/// 其他类型的失败原样传播。
pub struct RecoverAspect<R> {
    name: String,
    kind: FailureKind,
    fallback: R,
    message: String,
    logger: Option<Arc<Logger>>,
}

impl<R> RecoverAspect<R> {
    pub fn new(kind: impl Into<FailureKind>, fallback: R) -> Self {
        let kind = kind.into();
        Self {
            name: "Recover".to_string(),
            message: format!("{} exception", kind),
            kind,
            fallback,
            logger: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }
}

impl<R: DeserializeOwned> RecoverAspect<R> {
    pub fn from_config(config: RecoverConfig) -> Result<Self> {
        let fallback: R = serde_json::from_value(config.fallback).with_context(|| {
            format!(
                "fallback does not match the result type {}",
                std::any::type_name::<R>()
            )
        })?;

        let mut aspect = RecoverAspect::new(config.kind, fallback);
        if let Some(name) = config.name {
            aspect = aspect.named(name);
        }
        if let Some(message) = config.message {
            aspect = aspect.message(message);
        }
        if let Some(logger) = config.logger {
            aspect = aspect.logger(Logger::resolve(logger)?);
        }
        Ok(aspect)
    }
}

impl<A, R: Clone + Send + Sync> Aspect<A, R> for RecoverAspect<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FAILURE
    }

    fn handles(&self, kind: &FailureKind) -> bool {
        &self.kind == kind
    }

    fn on_failure(
        &self,
        ctx: &mut InterceptionContext<A, R>,
        failure: &FailureDescriptor<'_>,
    ) -> FailureOutcome<R> {
        if failure.kind() != &self.kind {
            return FailureOutcome::Propagate;
        }

        if let Some(logger) = &self.logger {
            let record = LogRecord::new(LogLevel::Warn, self.message.as_str())
                .with_location(file!(), line!())
                .with_module(module_path!())
                .with_metadata("operation", ctx.operation())
                .with_metadata("kind", self.kind.as_str())
                .with_metadata("error", failure.error().to_string());
            let _ = logger.log(record);
        }

        FailureOutcome::Handled(self.fallback.clone())
    }
}
