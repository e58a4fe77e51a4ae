use crate::cfg::{create_trait_from_type_options, TypeOptions};
use crate::log::{
    appender::{ConsoleAppender, ConsoleAppenderConfig, LogAppender},
    formatter::{LogFormatter, TextFormatter, TextFormatterConfig},
    log_record::{LogLevel, LogRecord, MetadataValue},
};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use smart_default::SmartDefault;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Once};

/// Logger 创建配置（用于创建新的 Logger 实例）
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct LoggerCreateConfig {
    /// 日志级别
    #[default = "info"]
    pub level: String,

    /// Formatter 配置
    #[default(TypeOptions::of("TextFormatter"))]
    pub formatter: TypeOptions,

    /// Appender 配置
    #[default(TypeOptions::of("ConsoleAppender"))]
    pub appender: TypeOptions,
}

/// Logger 配置
///
/// 支持两种模式：
/// - Reference: 引用已存在的 logger 实例（通过 $instance 字段）
/// - Create: 创建新的 logger 实例
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LoggerConfig {
    /// 引用一个已存在的 logger 实例
    Reference {
        /// 引用的 logger 实例名称
        #[serde(rename = "$instance")]
        instance: String,
    },

    /// 创建新的 logger 实例
    Create(LoggerCreateConfig),
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig::Create(LoggerCreateConfig::default())
    }
}

impl LoggerConfig {
    /// 引用全局管理器中的 logger
    pub fn reference(instance: impl Into<String>) -> Self {
        LoggerConfig::Reference {
            instance: instance.into(),
        }
    }
}

/// 注册所有日志组件（只执行一次）
static REGISTER_ONCE: Once = Once::new();

pub(crate) fn ensure_registered() {
    REGISTER_ONCE.call_once(|| {
        let _ = crate::log::register_formatters();
        let _ = crate::log::register_appenders();
    });
}

/// 日志器
///
/// 负责日志的级别控制、格式化和输出。所有方法都是同步的，可以直接在切面钩子中调用。
pub struct Logger {
    level: AtomicU8,
    formatter: Arc<dyn LogFormatter>,
    appender: Arc<dyn LogAppender>,
}

impl Logger {
    /// 从创建配置创建 Logger
    pub fn new(config: LoggerCreateConfig) -> Result<Self> {
        ensure_registered();

        let level = config.level.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
        let formatter: Box<dyn LogFormatter> = create_trait_from_type_options(&config.formatter)?;
        let appender: Box<dyn LogAppender> = create_trait_from_type_options(&config.appender)?;

        Ok(Self::with_components(
            level,
            Arc::from(formatter),
            Arc::from(appender),
        ))
    }

    /// 直接用组件创建 Logger
    ///
    /// 需要保留 appender 句柄的场景（例如读取 `MemoryAppender` 的内容）使用这个构造函数。
    pub fn with_components(
        level: LogLevel,
        formatter: Arc<dyn LogFormatter>,
        appender: Arc<dyn LogAppender>,
    ) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            formatter,
            appender,
        }
    }

    /// 输出到 stdout 的文本 logger（INFO 级别）
    pub fn console() -> Self {
        Self::with_components(
            LogLevel::Info,
            Arc::new(TextFormatter::new(TextFormatterConfig::default())),
            Arc::new(ConsoleAppender::new(ConsoleAppenderConfig::default())),
        )
    }

    /// 从配置解析 Logger
    ///
    /// 如果配置是 Reference 模式，从全局管理器获取已存在的 logger
    /// 如果配置是 Create 模式，创建新的 logger
    pub fn resolve(config: LoggerConfig) -> Result<Arc<Self>> {
        match config {
            LoggerConfig::Reference { instance } => crate::log::get(&instance).ok_or_else(|| {
                anyhow!("Logger instance '{}' not found in global manager", instance)
            }),
            LoggerConfig::Create(create_config) => Ok(Arc::new(Logger::new(create_config)?)),
        }
    }

    /// 设置日志级别
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// 获取当前日志级别
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// 指定级别的日志是否会被输出
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// 记录日志
    pub fn log(&self, record: LogRecord) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let formatted = self.formatter.format(&record)?;
        self.appender.append(&formatted)
    }

    /// 记录带 metadata 的日志
    ///
    /// ```ignore
    /// logger.logm(LogLevel::Info, "Calculator.Add: 9", vec![("args", "(2, 7)".into())])?;
    /// ```
    pub fn logm<K, I>(&self, level: LogLevel, message: impl Into<String>, metadata: I) -> Result<()>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MetadataValue)>,
    {
        let mut record = LogRecord::new(level, message);
        for (key, value) in metadata {
            record.metadata.push((key.into(), value));
        }
        self.log(record)
    }

    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Trace, message))
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Debug, message))
    }

    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Info, message))
    }

    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Warn, message))
    }

    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogRecord::new(LogLevel::Error, message))
    }

    /// 刷新底层输出器
    pub fn flush(&self) -> Result<()> {
        self.appender.flush()
    }
}
