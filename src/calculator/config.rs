use crate::aop::AspectChainConfig;
use crate::log::LoggerConfig;
use serde::Deserialize;
use smart_default::SmartDefault;

/// AspectCalculator 配置
///
/// 没有配置的操作使用默认的切面布局，配置了的操作完全按配置构建切面链
///
/// ```json5
/// {
///     logger: { level: "info", formatter: { type: "TextFormatter" } },
///     divide: {
///         aspects: [
///             { type: "Trace" },
///             { type: "Recover", options: { kind: "division_by_zero", fallback: 0.0 } },
///         ],
///     },
/// }
/// ```
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct CalculatorConfig {
    /// 默认切面布局使用的 logger
    pub logger: LoggerConfig,

    pub add: Option<AspectChainConfig>,
    pub subtract: Option<AspectChainConfig>,
    pub multiply: Option<AspectChainConfig>,
    pub divide: Option<AspectChainConfig>,
}
