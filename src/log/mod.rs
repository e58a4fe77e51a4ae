//! 日志模块
//!
//! 切面产生的可观察副作用（执行耗时、结果、异常恢复提示）都写入这里的 Logger。
//!
//! # 特性
//!
//! - 多种日志级别：Trace, Debug, Info, Warn, Error
//! - 可扩展的格式化器：TextFormatter、JsonFormatter
//! - 多种输出目标：ConsoleAppender、FileAppender、MemoryAppender
//! - 基于 `TypeOptions` 配置的动态创建，`$instance` 引用全局管理器中的实例
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use aspectx::log::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config: LoggerCreateConfig = json5::from_str(r#"
//!         {
//!             level: "info",
//!             formatter: { type: "TextFormatter", options: { colored: false } },
//!             appender: { type: "ConsoleAppender", options: { target: "stdout" } }
//!         }
//!     "#)?;
//!
//!     let logger = Logger::new(config)?;
//!     logger.info("Calculator.Add execution time: 0")?;
//!     Ok(())
//! }
//! ```

pub mod appender;
pub mod formatter;
pub mod global_logger_manager;
pub mod log_record;
pub mod logger;
pub mod logger_manager;

pub use appender::{
    create_appender_from_options, register_appenders, ConsoleAppender, ConsoleAppenderConfig,
    FileAppender, FileAppenderConfig, LogAppender, MemoryAppender, MemoryAppenderConfig, Target,
};
pub use formatter::{
    create_formatter_from_options, register_formatters, JsonFormatter, JsonFormatterConfig,
    LogFormatter, TextFormatter, TextFormatterConfig,
};
pub use global_logger_manager::{
    add, contains, get, get_default, get_or_default, global_logger_manager, init, remove,
    set_default,
};
pub use log_record::{LogLevel, LogRecord, MetadataValue};
pub use logger::{Logger, LoggerConfig, LoggerCreateConfig};
pub use logger_manager::{LoggerManager, LoggerManagerConfig};
