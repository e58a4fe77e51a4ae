use crate::log::formatter::LogFormatter;
use crate::log::log_record::LogRecord;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

/// JsonFormatter 配置（保留扩展性）
#[derive(Debug, Clone, Deserialize, PartialEq, SmartDefault)]
#[serde(default)]
pub struct JsonFormatterConfig {}

/// JSON 格式化器
///
/// 每条记录输出为一行 JSON，适合被日志采集系统消费
#[derive(Default)]
pub struct JsonFormatter {}

impl JsonFormatter {
    pub fn new(_: JsonFormatterConfig) -> Self {
        Self {}
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        Ok(serde_json::to_string(record)?)
    }
}

crate::impl_from!(JsonFormatterConfig => JsonFormatter);
crate::impl_box_from!(JsonFormatter => dyn LogFormatter);
