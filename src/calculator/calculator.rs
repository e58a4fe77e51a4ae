use crate::aop::{
    register_aspects, AspectChain, AspectChainConfig, InvokeError, LoggingAspect, RecoverAspect,
    TraceAspect,
};
use crate::calculator::config::CalculatorConfig;
use crate::calculator::error::{CalcError, DIVISION_BY_ZERO};
use crate::log::Logger;
use anyhow::{Context, Result};
use once_cell::unsync::OnceCell;
use std::sync::Arc;

/// 操作数
pub type Operands = (i32, i32);

/// 固定签名的目标操作
pub type Target<R> = fn(&Operands) -> Result<R, CalcError>;

/// 计算器操作的切面链
pub type CalcChain<R> = AspectChain<Operands, R, Target<R>>;

pub fn add(x: i32, y: i32) -> Result<i32, CalcError> {
    x.checked_add(y).ok_or(CalcError::Overflow {
        operation: "add",
        x,
        y,
    })
}

pub fn subtract(x: i32, y: i32) -> Result<i32, CalcError> {
    x.checked_sub(y).ok_or(CalcError::Overflow {
        operation: "subtract",
        x,
        y,
    })
}

pub fn multiply(x: i32, y: i32) -> Result<i32, CalcError> {
    x.checked_mul(y).ok_or(CalcError::Overflow {
        operation: "multiply",
        x,
        y,
    })
}

/// 整数除法，结果转换为 f64
pub fn divide(x: i32, y: i32) -> Result<f64, CalcError> {
    if y == 0 {
        return Err(CalcError::DivisionByZero { dividend: x });
    }
    x.checked_div(y)
        .map(f64::from)
        .ok_or(CalcError::Overflow {
            operation: "divide",
            x,
            y,
        })
}

/// 计算器
pub trait Calculator {
    fn add(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>>;

    fn subtract(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>>;

    fn multiply(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>>;

    fn divide(&self, x: i32, y: i32) -> Result<f64, InvokeError<CalcError>>;
}

/// 不带切面的计算器
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCalculator;

impl Calculator for PlainCalculator {
    fn add(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>> {
        add(x, y).map_err(InvokeError::Target)
    }

    fn subtract(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>> {
        subtract(x, y).map_err(InvokeError::Target)
    }

    fn multiply(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>> {
        multiply(x, y).map_err(InvokeError::Target)
    }

    fn divide(&self, x: i32, y: i32) -> Result<f64, InvokeError<CalcError>> {
        divide(x, y).map_err(InvokeError::Target)
    }
}

fn add_target(&(x, y): &Operands) -> Result<i32, CalcError> {
    add(x, y)
}

fn subtract_target(&(x, y): &Operands) -> Result<i32, CalcError> {
    subtract(x, y)
}

fn multiply_target(&(x, y): &Operands) -> Result<i32, CalcError> {
    multiply(x, y)
}

fn divide_target(&(x, y): &Operands) -> Result<f64, CalcError> {
    divide(x, y)
}

/// 除零恢复切面：输出 "Division by zero exception"，结果替换为 0
pub fn handle_division_by_zero(logger: Arc<Logger>) -> RecoverAspect<f64> {
    RecoverAspect::new(DIVISION_BY_ZERO, 0.0)
        .named("HandleDivisionByZero")
        .message("Division by zero exception")
        .logger(logger)
}

fn default_add(logger: Arc<Logger>) -> CalcChain<i32> {
    AspectChain::builder("Calculator.Add")
        .aspect(LoggingAspect::with_logger(Arc::clone(&logger)))
        .aspect(TraceAspect::with_logger(logger))
        .build(add_target as Target<i32>)
}

fn default_subtract(logger: Arc<Logger>) -> CalcChain<i32> {
    AspectChain::builder("Calculator.Subtract")
        .aspect(TraceAspect::with_logger(logger))
        .build(subtract_target as Target<i32>)
}

fn default_multiply(logger: Arc<Logger>) -> CalcChain<i32> {
    AspectChain::builder("Calculator.Multiply")
        .aspect(LoggingAspect::with_logger(Arc::clone(&logger)))
        .aspect(TraceAspect::with_logger(logger))
        .build(multiply_target as Target<i32>)
}

fn default_divide(logger: Arc<Logger>) -> CalcChain<f64> {
    AspectChain::builder("Calculator.Divide")
        .aspect(LoggingAspect::with_logger(Arc::clone(&logger)))
        .aspect(TraceAspect::with_logger(Arc::clone(&logger)))
        .aspect(handle_division_by_zero(logger))
        .build(divide_target as Target<f64>)
}

/// 每个操作包装在各自切面链中的计算器
///
/// 默认布局：
///
/// | 操作 | 切面（声明顺序） |
/// |------|------------------|
/// | `Calculator.Add` | Logging, Trace |
/// | `Calculator.Subtract` | Trace |
/// | `Calculator.Multiply` | Logging, Trace |
/// | `Calculator.Divide` | Logging, Trace, HandleDivisionByZero |
pub struct AspectCalculator {
    add: CalcChain<i32>,
    subtract: CalcChain<i32>,
    multiply: CalcChain<i32>,
    divide: CalcChain<f64>,
}

impl AspectCalculator {
    /// 默认布局
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            add: default_add(Arc::clone(&logger)),
            subtract: default_subtract(Arc::clone(&logger)),
            multiply: default_multiply(Arc::clone(&logger)),
            divide: default_divide(logger),
        }
    }

    /// 使用自定义的切面链
    pub fn with_chains(
        add: CalcChain<i32>,
        subtract: CalcChain<i32>,
        multiply: CalcChain<i32>,
        divide: CalcChain<f64>,
    ) -> Self {
        Self {
            add,
            subtract,
            multiply,
            divide,
        }
    }

    /// 从配置创建
    ///
    /// 只有未覆盖的操作才会构建默认切面链，全部覆盖时不解析 `logger`。
    pub fn from_config(config: CalculatorConfig) -> Result<Self> {
        register_aspects::<Operands, i32>()?;
        register_aspects::<Operands, f64>()?;

        let CalculatorConfig {
            logger,
            add,
            subtract,
            multiply,
            divide,
        } = config;
        let resolved = OnceCell::new();
        let default_logger = || -> Result<Arc<Logger>> {
            resolved
                .get_or_try_init(|| Logger::resolve(logger.clone()))
                .map(Arc::clone)
        };

        Ok(Self {
            add: Self::chain_or("Calculator.Add", add, add_target, || {
                default_logger().map(default_add)
            })?,
            subtract: Self::chain_or("Calculator.Subtract", subtract, subtract_target, || {
                default_logger().map(default_subtract)
            })?,
            multiply: Self::chain_or("Calculator.Multiply", multiply, multiply_target, || {
                default_logger().map(default_multiply)
            })?,
            divide: Self::chain_or("Calculator.Divide", divide, divide_target, || {
                default_logger().map(default_divide)
            })?,
        })
    }

    fn chain_or<R: 'static>(
        operation: &str,
        config: Option<AspectChainConfig>,
        target: Target<R>,
        default: impl FnOnce() -> Result<CalcChain<R>>,
    ) -> Result<CalcChain<R>> {
        match config {
            Some(config) => AspectChain::from_config(operation, &config, target)
                .with_context(|| format!("Failed to configure {}", operation)),
            None => default(),
        }
    }

    /// 每个操作的名称和切面列表
    pub fn layout(&self) -> Vec<(&str, Vec<&str>)> {
        vec![
            (self.add.operation(), self.add.aspect_names()),
            (self.subtract.operation(), self.subtract.aspect_names()),
            (self.multiply.operation(), self.multiply.aspect_names()),
            (self.divide.operation(), self.divide.aspect_names()),
        ]
    }
}

impl Calculator for AspectCalculator {
    fn add(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>> {
        self.add.invoke((x, y))
    }

    fn subtract(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>> {
        self.subtract.invoke((x, y))
    }

    fn multiply(&self, x: i32, y: i32) -> Result<i32, InvokeError<CalcError>> {
        self.multiply.invoke((x, y))
    }

    fn divide(&self, x: i32, y: i32) -> Result<f64, InvokeError<CalcError>> {
        self.divide.invoke((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{JsonFormatter, LogLevel, MemoryAppender, TextFormatter, TextFormatterConfig};

    fn memory_logger() -> (Arc<Logger>, MemoryAppender) {
        let appender = MemoryAppender::default();
        let logger = Logger::with_components(
            LogLevel::Info,
            Arc::new(TextFormatter::new(TextFormatterConfig {
                colored: false,
                with_thread: false,
            })),
            Arc::new(appender.clone()),
        );
        (Arc::new(logger), appender)
    }

    #[test]
    fn test_raw_operations() {
        assert_eq!(add(2, 7), Ok(9));
        assert_eq!(subtract(10, 8), Ok(2));
        assert_eq!(multiply(3, 3), Ok(9));
        assert_eq!(divide(20, 4), Ok(5.0));
        assert_eq!(divide(7, 2), Ok(3.0));
        assert_eq!(divide(20, 0), Err(CalcError::DivisionByZero { dividend: 20 }));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(add(i32::MAX, 1), Err(CalcError::Overflow { operation: "add", .. })));
        assert!(matches!(subtract(i32::MIN, 1), Err(CalcError::Overflow { .. })));
        assert!(matches!(multiply(i32::MAX, 2), Err(CalcError::Overflow { .. })));
        assert!(matches!(
            divide(i32::MIN, -1),
            Err(CalcError::Overflow { operation: "divide", .. })
        ));
    }

    #[test]
    fn test_plain_calculator() {
        let calculator = PlainCalculator;
        assert_eq!(calculator.add(2, 7), Ok(9));
        assert_eq!(
            calculator.divide(20, 0),
            Err(InvokeError::Target(CalcError::DivisionByZero { dividend: 20 }))
        );
    }

    #[test]
    fn test_default_layout() {
        let (logger, _) = memory_logger();
        let calculator = AspectCalculator::new(logger);

        assert_eq!(
            calculator.layout(),
            vec![
                ("Calculator.Add", vec!["Logging", "Trace"]),
                ("Calculator.Subtract", vec!["Trace"]),
                ("Calculator.Multiply", vec!["Logging", "Trace"]),
                (
                    "Calculator.Divide",
                    vec!["Logging", "Trace", "HandleDivisionByZero"]
                ),
            ]
        );
    }

    #[test]
    fn test_demo_sequence() {
        let appender = MemoryAppender::default();
        let logger = Arc::new(Logger::with_components(
            LogLevel::Info,
            Arc::new(JsonFormatter::default()),
            Arc::new(appender.clone()),
        ));
        let calculator = AspectCalculator::new(logger);

        assert_eq!(calculator.add(2, 7), Ok(9));
        assert_eq!(calculator.subtract(10, 8), Ok(2));
        assert_eq!(calculator.multiply(3, 3), Ok(9));
        assert_eq!(calculator.divide(20, 4), Ok(5.0));
        assert_eq!(calculator.divide(20, 0), Ok(0.0));

        // 出口钩子逆序：Trace 先于 Logging
        let records: Vec<serde_json::Value> = appender
            .lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let messages: Vec<&str> = records
            .iter()
            .map(|record| record["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages.len(), 8);
        assert!(messages[0].starts_with("Calculator.Add execution time: "));
        assert_eq!(messages[1], "Calculator.Add: 9");
        assert!(messages[2].starts_with("Calculator.Subtract execution time: "));
        assert!(messages[3].starts_with("Calculator.Multiply execution time: "));
        assert_eq!(messages[4], "Calculator.Multiply: 9");
        assert!(messages[5].starts_with("Calculator.Divide execution time: "));
        assert_eq!(messages[6], "Calculator.Divide: 5.0");
        assert_eq!(messages[7], "Division by zero exception");
        assert_eq!(records[7]["level"], "WARN");
        assert_eq!(records[7]["metadata"]["kind"], "division_by_zero");
    }

    #[test]
    fn test_overflow_propagates_through_divide_chain() {
        let (logger, appender) = memory_logger();
        let calculator = AspectCalculator::new(logger);

        assert_eq!(
            calculator.divide(i32::MIN, -1),
            Err(InvokeError::Target(CalcError::Overflow {
                operation: "divide",
                x: i32::MIN,
                y: -1
            }))
        );
        // Logging 观察到失败，没有执行时间行
        assert_eq!(appender.lines_containing("Calculator.Divide failed").len(), 1);
        assert!(appender.lines_containing("execution time").is_empty());
    }

    #[test]
    fn test_from_config_overrides() -> Result<()> {
        let config: CalculatorConfig = json5::from_str(
            r#"{
                logger: { appender: { type: "MemoryAppender" } },
                divide: {
                    aspects: [
                        { type: "Recover", options: { kind: "division_by_zero", fallback: -1.0 } },
                    ],
                },
            }"#,
        )?;
        let calculator = AspectCalculator::from_config(config)?;

        assert_eq!(calculator.divide(20, 0), Ok(-1.0));
        assert_eq!(calculator.layout()[3].1, vec!["Recover"]);
        assert_eq!(calculator.layout()[0].1, vec!["Logging", "Trace"]);
        Ok(())
    }

    #[test]
    fn test_from_config_all_overridden_skips_default_logger() -> Result<()> {
        let config: CalculatorConfig = json5::from_str(
            r#"{
                logger: { "$instance": "calculator-never-registered" },
                add: { aspects: [] },
                subtract: { aspects: [] },
                multiply: { aspects: [] },
                divide: { aspects: [{ type: "Recover", options: { kind: "division_by_zero", fallback: 0.0 } }] },
            }"#,
        )?;
        let calculator = AspectCalculator::from_config(config)?;

        assert_eq!(calculator.add(2, 7), Ok(9));
        assert_eq!(calculator.divide(20, 0), Ok(0.0));
        assert!(calculator.layout()[0].1.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_config_default_needs_logger() {
        let config: CalculatorConfig = json5::from_str(
            r#"{
                logger: { "$instance": "calculator-never-registered" },
                add: { aspects: [] },
            }"#,
        )
        .unwrap();
        let err = AspectCalculator::from_config(config).err().unwrap();
        assert!(format!("{:#}", err).contains("calculator-never-registered"));
    }

    #[test]
    fn test_from_config_error_names_operation() {
        let config: CalculatorConfig = json5::from_str(
            r#"{ logger: { appender: { type: "MemoryAppender" } }, add: { aspects: [{ type: "Cache" }] } }"#,
        )
        .unwrap();
        let err = AspectCalculator::from_config(config).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to configure Calculator.Add"));
    }
}
