use crate::aop::{Failure, FailureKind};
use thiserror::Error;

pub const DIVISION_BY_ZERO: FailureKind = FailureKind::from_static("division_by_zero");
pub const OVERFLOW: FailureKind = FailureKind::from_static("overflow");

/// 计算错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("attempted to divide {dividend} by zero")]
    DivisionByZero { dividend: i32 },

    #[error("{operation}({x}, {y}) overflowed")]
    Overflow {
        operation: &'static str,
        x: i32,
        y: i32,
    },
}

impl Failure for CalcError {
    fn kind(&self) -> FailureKind {
        match self {
            CalcError::DivisionByZero { .. } => DIVISION_BY_ZERO,
            CalcError::Overflow { .. } => OVERFLOW,
        }
    }
}
