use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 最详细的日志
    Trace = 0,
    /// 调试信息
    Debug = 1,
    /// 一般信息
    Info = 2,
    /// 警告信息
    Warn = 3,
    /// 错误信息
    Error = 4,
}

impl LogLevel {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("invalid log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        // 使用 pad 以支持 {:<5} 之类的对齐
        f.pad(name)
    }
}

/// 元数据值，支持多种类型
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
    /// 任意 JSON 兼容的数据
    Json(Value),
}

impl Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetadataValue::String(s) => serializer.serialize_str(s),
            MetadataValue::I64(n) => serializer.serialize_i64(*n),
            MetadataValue::U64(n) => serializer.serialize_u64(*n),
            MetadataValue::F64(n) => serializer.serialize_f64(*n),
            MetadataValue::Bool(b) => serializer.serialize_bool(*b),
            MetadataValue::Null => serializer.serialize_none(),
            MetadataValue::Json(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{}", s),
            MetadataValue::I64(n) => write!(f, "{}", n),
            MetadataValue::U64(n) => write!(f, "{}", n),
            MetadataValue::F64(n) => write!(f, "{}", n),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Null => write!(f, "null"),
            MetadataValue::Json(v) => write!(f, "'{}'", v),
        }
    }
}

macro_rules! impl_metadata_from {
    ($($source:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$source> for MetadataValue {
                fn from(value: $source) -> Self {
                    MetadataValue::$variant(value as $target)
                }
            }
        )*
    };
}

impl_metadata_from!(
    i64 => I64 as i64,
    i32 => I64 as i64,
    u64 => U64 as u64,
    u32 => U64 as u64,
    usize => U64 as u64,
    f64 => F64 as f64,
    f32 => F64 as f64,
);

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

impl From<Value> for MetadataValue {
    fn from(v: Value) -> Self {
        MetadataValue::Json(v)
    }
}

/// 日志记录
pub struct LogRecord {
    /// 日志级别
    pub level: LogLevel,
    /// 日志消息
    pub message: String,
    /// 模块路径
    pub module: Option<String>,
    /// 源文件路径
    pub file: Option<String>,
    /// 行号
    pub line: Option<u32>,
    /// 时间戳
    pub timestamp: SystemTime,
    /// 线程 ID（已缓存的字符串表示）
    pub thread_id: String,
    /// 自定义元数据（保持插入顺序）
    pub metadata: Vec<(String, MetadataValue)>,
}

impl LogRecord {
    /// 创建新的日志记录
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            module: None,
            file: None,
            line: None,
            timestamp: SystemTime::now(),
            thread_id: format!("{:?}", std::thread::current().id()),
            metadata: Vec::new(),
        }
    }

    /// 添加元数据
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// 设置位置信息（文件和行号）
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// 设置模块路径
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// 按 key 查找元数据（返回第一个匹配项）
    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Serialize for LogRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        use std::time::UNIX_EPOCH;

        let timestamp = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("timestamp", &timestamp)?;
        map.serialize_entry("level", &self.level.to_string())?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("module", &self.module)?;
        map.serialize_entry("file", &self.file)?;
        map.serialize_entry("line", &self.line)?;
        map.serialize_entry("thread_id", &self.thread_id)?;

        if self.metadata.is_empty() {
            map.serialize_entry("metadata", &None::<()>)?;
        } else {
            let metadata: serde_json::Map<String, Value> = self
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::to_value(v).unwrap_or(Value::Null)))
                .collect();
            map.serialize_entry("metadata", &metadata)?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_log_level_display_and_padding() {
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(format!("{:<5}|", LogLevel::Info), "INFO |");
    }

    #[test]
    fn test_log_level_ordering_and_u8() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Debug > LogLevel::Trace);
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::from_u8(level as u8), level);
        }
    }

    #[test]
    fn test_log_level_deserialize_lowercase() {
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
    }

    #[test]
    fn test_log_record_builder() {
        let record = LogRecord::new(LogLevel::Info, "Calculator.Add execution time: 0")
            .with_module("aspectx::aop")
            .with_location("trace.rs", 42)
            .with_metadata("operation", "Calculator.Add")
            .with_metadata("duration_ms", 0i64);

        assert_eq!(record.module.as_deref(), Some("aspectx::aop"));
        assert_eq!(record.file.as_deref(), Some("trace.rs"));
        assert_eq!(record.line, Some(42));
        assert!(!record.thread_id.is_empty());
        assert_eq!(
            record.metadata_value("operation"),
            Some(&MetadataValue::String("Calculator.Add".to_string()))
        );
        assert_eq!(record.metadata_value("duration_ms"), Some(&MetadataValue::I64(0)));
        assert_eq!(record.metadata_value("missing"), None);
    }

    #[test]
    fn test_metadata_value_display() {
        assert_eq!(MetadataValue::from("x").to_string(), "x");
        assert_eq!(MetadataValue::from(-3i32).to_string(), "-3");
        assert_eq!(MetadataValue::from(7usize).to_string(), "7");
        assert_eq!(MetadataValue::from(true).to_string(), "true");
        assert_eq!(MetadataValue::Null.to_string(), "null");
        assert_eq!(
            MetadataValue::from(serde_json::json!({ "a": 1 })).to_string(),
            "'{\"a\":1}'"
        );
    }

    #[test]
    fn test_log_record_serialize() {
        let record = LogRecord::new(LogLevel::Warn, "Calculator.Divide failed")
            .with_metadata("status", "error")
            .with_metadata("duration_ms", 3i64);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["message"], "Calculator.Divide failed");
        assert_eq!(value["metadata"]["status"], "error");
        assert_eq!(value["metadata"]["duration_ms"], 3);
        assert!(value["timestamp"].is_number());

        let empty = serde_json::to_value(LogRecord::new(LogLevel::Info, "x")).unwrap();
        assert!(empty["metadata"].is_null());
    }
}
