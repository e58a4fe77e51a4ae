//! 计算器示例
//!
//! 四则运算本身很简单，这里用它展示切面链：每个操作包装在各自的切面链中，
//! 执行耗时、结果日志和除零恢复都不需要修改运算函数。

mod calculator;
mod config;
mod error;

pub use calculator::{
    add, divide, handle_division_by_zero, multiply, subtract, AspectCalculator, CalcChain,
    Calculator, Operands, PlainCalculator, Target,
};
pub use config::CalculatorConfig;
pub use error::{CalcError, DIVISION_BY_ZERO, OVERFLOW};
