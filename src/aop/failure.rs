use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;

/// 失败类型
///
/// 目标操作失败时的分类名称，切面按名称声明自己能处理哪些失败。
/// 常量可以用 `FailureKind::from_static` 定义，配置文件中直接写字符串即可。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureKind(Cow<'static, str>);

impl FailureKind {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for FailureKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for FailureKind {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// 可分类的目标错误
///
/// 被切面链包装的操作，其错误类型需要实现这个 trait。
pub trait Failure: Error + Send + Sync + 'static {
    fn kind(&self) -> FailureKind;
}

/// 失败描述
///
/// 目标失败后构造一次，按逆序交给声明处理该类型的切面。原始错误以借用的形式携带，
/// 处理方可以通过 `downcast_ref` 读取具体的错误内容。
#[derive(Debug, Clone, Copy)]
pub struct FailureDescriptor<'a> {
    operation: &'a str,
    kind: &'a FailureKind,
    error: &'a (dyn Error + Send + Sync + 'static),
}

impl<'a> FailureDescriptor<'a> {
    pub fn new(
        operation: &'a str,
        kind: &'a FailureKind,
        error: &'a (dyn Error + Send + Sync + 'static),
    ) -> Self {
        Self {
            operation,
            kind,
            error,
        }
    }

    pub fn operation(&self) -> &'a str {
        self.operation
    }

    pub fn kind(&self) -> &'a FailureKind {
        self.kind
    }

    pub fn error(&self) -> &'a (dyn Error + Send + Sync + 'static) {
        self.error
    }

    /// 按具体类型读取原始错误
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&'a T> {
        self.error.downcast_ref::<T>()
    }
}

/// 失败钩子的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureOutcome<R> {
    /// 已处理，使用替代结果并停止传播
    Handled(R),
    /// 未处理，交给下一个切面，最终传播给调用方
    Propagate,
}

impl<R> FailureOutcome<R> {
    pub fn is_handled(&self) -> bool {
        matches!(self, FailureOutcome::Handled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    const TIMEOUT: FailureKind = FailureKind::from_static("timeout");

    #[derive(Debug, Error)]
    #[error("timed out after {0}ms")]
    struct Timeout(u64);

    impl Failure for Timeout {
        fn kind(&self) -> FailureKind {
            TIMEOUT
        }
    }

    #[derive(Debug, Error)]
    #[error("other")]
    struct Other;

    #[test]
    fn test_failure_kind_equality() {
        assert_eq!(TIMEOUT, FailureKind::new("timeout"));
        assert_eq!(FailureKind::from("timeout"), TIMEOUT);
        assert_ne!(TIMEOUT, FailureKind::from("overflow".to_string()));
        assert_eq!(TIMEOUT.to_string(), "timeout");
        assert_eq!(TIMEOUT.as_str(), "timeout");
    }

    #[test]
    fn test_failure_kind_serde() {
        let kind: FailureKind = serde_json::from_str(r#""division_by_zero""#).unwrap();
        assert_eq!(kind, FailureKind::from_static("division_by_zero"));
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""division_by_zero""#);
    }

    #[test]
    fn test_descriptor_downcast() {
        let error = Timeout(250);
        let kind = error.kind();
        let descriptor = FailureDescriptor::new("Client.Get", &kind, &error);

        assert_eq!(descriptor.operation(), "Client.Get");
        assert_eq!(descriptor.kind(), &TIMEOUT);
        assert_eq!(descriptor.downcast_ref::<Timeout>().map(|t| t.0), Some(250));
        assert!(descriptor.downcast_ref::<Other>().is_none());
        assert_eq!(descriptor.error().to_string(), "timed out after 250ms");
    }

    #[test]
    fn test_outcome() {
        assert!(FailureOutcome::Handled(0).is_handled());
        assert!(!FailureOutcome::<i32>::Propagate.is_handled());
    }
}
