use crate::aop::context::AspectId;
use std::error::Error;
use thiserror::Error;

/// 切面自身的错误
///
/// 都属于配置错误：调用立即中止，不会交给失败钩子处理。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AopError {
    #[error("scratch slot {slot} is already occupied")]
    ScratchOccupied { slot: AspectId },

    #[error("scratch is only accessible from inside a hook")]
    NoActiveAspect,

    #[error("aspect '{aspect}' rejected entry: {reason}")]
    EntryRejected { aspect: String, reason: String },

    #[error("result slot was emptied by an exit hook")]
    MissingResult,
}

impl AopError {
    pub fn rejected(aspect: impl Into<String>, reason: impl Into<String>) -> Self {
        AopError::EntryRejected {
            aspect: aspect.into(),
            reason: reason.into(),
        }
    }
}

/// 切面链调用的错误
#[derive(Debug, PartialEq, Error)]
pub enum InvokeError<E: Error + 'static> {
    /// 目标操作的原始错误，没有切面处理
    #[error(transparent)]
    Target(E),

    /// 切面钩子失败
    #[error("aspect '{aspect}' failed: {source}")]
    Configuration {
        aspect: String,
        #[source]
        source: AopError,
    },
}

impl<E: Error + 'static> InvokeError<E> {
    /// 取出目标错误，配置错误返回 None
    pub fn into_target(self) -> Option<E> {
        match self {
            InvokeError::Target(error) => Some(error),
            InvokeError::Configuration { .. } => None,
        }
    }

    pub fn target(&self) -> Option<&E> {
        match self {
            InvokeError::Target(error) => Some(error),
            InvokeError::Configuration { .. } => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, InvokeError::Configuration { .. })
    }
}
