use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 类型选项结构
///
/// 用 `type` 字段选择已注册的实现，`options` 原样交给该实现的配置类型反序列化。
///
/// ```ignore
/// { type: "Trace", options: { level: "info", slow_threshold: "200ms" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeOptions {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "empty_options")]
    pub options: JsonValue,
}

fn empty_options() -> JsonValue {
    JsonValue::Object(Default::default())
}

impl TypeOptions {
    /// 只指定类型名，使用该类型的默认配置
    pub fn of(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            options: empty_options(),
        }
    }

    /// 指定类型名和配置
    pub fn with_options(type_name: impl Into<String>, options: JsonValue) -> Self {
        Self {
            type_name: type_name.into(),
            options,
        }
    }

    /// 从 JSON 字符串创建 TypeOptions（支持 JSON5 格式）
    pub fn from_json(json_str: &str) -> Result<Self> {
        // 使用 json5 解析（支持注释、尾随逗号、未引用的键等）
        Ok(json5::from_str(json_str)?)
    }

    /// 从 YAML 字符串创建 TypeOptions
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// 从 TOML 字符串创建 TypeOptions
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// 导出为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
