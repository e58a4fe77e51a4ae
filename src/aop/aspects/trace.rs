use crate::aop::aspect::{Aspect, Capabilities};
use crate::aop::context::InterceptionContext;
use crate::aop::error::AopError;
use crate::cfg::serde_duration::{serde_as, HumanDur};
use crate::log::{LogLevel, LogRecord, Logger, LoggerConfig};
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trace 配置
#[serde_as]
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TraceConfig {
    /// Logger 配置
    pub logger: LoggerConfig,

    /// 耗时日志的级别
    #[default(LogLevel::Info)]
    pub level: LogLevel,

    /// 超过该耗时升级为 WARN，例如 "500ms"
    #[serde_as(as = "Option<HumanDur>")]
    pub slow_threshold: Option<Duration>,
}

/// 执行耗时切面
///
/// 入口记录开始时间，出口输出 `{operation} execution time: {ms}`。目标失败时不输出。
pub struct TraceAspect {
    logger: Arc<Logger>,
    level: LogLevel,
    slow_threshold: Option<Duration>,
}

impl TraceAspect {
    pub fn new(config: TraceConfig) -> Result<Self> {
        Ok(Self {
            logger: Logger::resolve(config.logger)?,
            level: config.level,
            slow_threshold: config.slow_threshold,
        })
    }

    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            level: LogLevel::Info,
            slow_threshold: None,
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    fn level_for(&self, elapsed: Duration) -> LogLevel {
        match self.slow_threshold {
            Some(threshold) if elapsed > threshold => LogLevel::Warn.max(self.level),
            _ => self.level,
        }
    }
}

/// 毫秒数，超出 i64 范围时饱和
fn duration_ms(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}

impl<A, R> Aspect<A, R> for TraceAspect {
    fn name(&self) -> &str {
        "Trace"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ENTRY | Capabilities::EXIT
    }

    fn on_entry(&self, ctx: &mut InterceptionContext<A, R>) -> Result<(), AopError> {
        ctx.stash(Instant::now())
    }

    fn on_exit(&self, ctx: &mut InterceptionContext<A, R>) {
        let Some(start) = ctx.take::<Instant>() else {
            return;
        };
        let elapsed = start.elapsed();
        let millis = duration_ms(elapsed);
        let level = self.level_for(elapsed);
        if !self.logger.enabled(level) {
            return;
        }

        let record = LogRecord::new(
            level,
            format!("{} execution time: {}", ctx.operation(), millis),
        )
        .with_location(file!(), line!())
        .with_module(module_path!())
        .with_metadata("operation", ctx.operation())
        .with_metadata("duration_ms", millis);
        let _ = self.logger.log(record);
    }
}
