use crate::log::formatter::LogFormatter;
use crate::log::log_record::{LogLevel, LogRecord};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use colored::{ColoredString, Colorize};
use serde::Deserialize;
use smart_default::SmartDefault;
use std::fmt::Write;

/// TextFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TextFormatterConfig {
    /// 是否启用颜色输出
    #[default = false]
    pub colored: bool,

    /// 是否输出线程 ID
    #[default = true]
    pub with_thread: bool,
}

/// 文本格式化器
///
/// 格式: `[时间戳] [线程] LEVEL [文件:行号] 消息 | k=v k=v`
#[derive(Default)]
pub struct TextFormatter {
    config: TextFormatterConfig,
}

impl TextFormatter {
    pub fn new(config: TextFormatterConfig) -> Self {
        Self { config }
    }

    fn dimmed(&self, out: &mut String, text: &str) {
        if self.config.colored {
            out.push_str(&text.dimmed().to_string());
        } else {
            out.push_str(text);
        }
    }
}

impl LogFormatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut out = String::with_capacity(64 + record.message.len());

        let timestamp = DateTime::<Utc>::from(record.timestamp)
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        out.push('[');
        self.dimmed(&mut out, &timestamp);
        out.push_str("] ");

        if self.config.with_thread {
            out.push('[');
            self.dimmed(&mut out, &record.thread_id);
            out.push_str("] ");
        }

        if self.config.colored {
            write!(out, "{} ", colored_level(record.level))?;
        } else {
            write!(out, "{:<5} ", record.level)?;
        }

        if let (Some(file), Some(line)) = (&record.file, record.line) {
            out.push('[');
            self.dimmed(&mut out, &format!("{}:{}", file, line));
            out.push_str("] ");
        }

        out.push_str(&record.message);

        if !record.metadata.is_empty() {
            out.push_str(" |");
            for (key, value) in &record.metadata {
                out.push(' ');
                if self.config.colored {
                    write!(out, "{}", key.cyan())?;
                } else {
                    out.push_str(key);
                }
                write!(out, "={}", value)?;
            }
        }

        Ok(out)
    }
}

fn colored_level(level: LogLevel) -> ColoredString {
    let padded = format!("{:<5}", level);
    match level {
        LogLevel::Error => padded.red().bold(),
        LogLevel::Warn => padded.yellow(),
        LogLevel::Info => padded.green(),
        LogLevel::Debug => padded.cyan(),
        LogLevel::Trace => padded.white().dimmed(),
    }
}

crate::impl_from!(TextFormatterConfig => TextFormatter);
crate::impl_box_from!(TextFormatter => dyn LogFormatter);

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> TextFormatter {
        TextFormatter::new(TextFormatterConfig {
            colored: false,
            with_thread: false,
        })
    }

    #[test]
    fn test_text_formatter_layout() {
        let record = LogRecord::new(LogLevel::Info, "Calculator.Add execution time: 0");
        let formatted = plain().format(&record).unwrap();

        assert!(formatted.starts_with('['));
        assert!(formatted.contains("Z] INFO  Calculator.Add execution time: 0"));
        assert!(!formatted.contains('|'));
    }

    #[test]
    fn test_text_formatter_location_and_metadata() {
        let record = LogRecord::new(LogLevel::Warn, "Calculator.Divide failed")
            .with_location("logging.rs", 12)
            .with_metadata("status", "error")
            .with_metadata("duration_ms", 5i64);

        let formatted = plain().format(&record).unwrap();
        assert!(formatted.contains("WARN  [logging.rs:12] Calculator.Divide failed"));
        assert!(formatted.ends_with("| status=error duration_ms=5"));
    }

    #[test]
    fn test_text_formatter_thread() {
        let formatter = TextFormatter::new(TextFormatterConfig::default());
        let record = LogRecord::new(LogLevel::Debug, "msg");
        let formatted = formatter.format(&record).unwrap();
        assert!(formatted.contains(&format!("[{}]", record.thread_id)));
    }

    #[test]
    fn test_text_formatter_colored() {
        let formatter = TextFormatter::new(TextFormatterConfig {
            colored: true,
            with_thread: false,
        });
        colored::control::set_override(true);
        let record = LogRecord::new(LogLevel::Error, "boom")
            .with_location("trace.rs", 7)
            .with_metadata("k", "v");
        let formatted = formatter.format(&record).unwrap();
        colored::control::unset_override();

        assert!(formatted.contains(&format!("{}", "ERROR".red().bold())));
        assert!(formatted.contains(&format!("{}=v", "k".cyan())));
        assert!(formatted.contains(&format!("[{}]", "trace.rs:7".dimmed())));
        assert!(formatted.contains(" boom | "));
        assert!(formatted.contains('\x1b'));
    }

    #[test]
    fn test_text_formatter_config_default() {
        let config = TextFormatterConfig::default();
        assert!(!config.colored);
        assert!(config.with_thread);
    }
}
