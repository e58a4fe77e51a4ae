use crate::aop::context::InterceptionContext;
use crate::aop::error::AopError;
use crate::aop::failure::{FailureDescriptor, FailureKind, FailureOutcome};
use bitflags::bitflags;

bitflags! {
    /// 切面实现了哪些钩子
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const ENTRY = 1;
        const EXIT = 1 << 1;
        const FAILURE = 1 << 2;
    }
}

/// 切面
///
/// 一个横切行为，可以实现三个钩子中的任意几个：
///
/// - `on_entry`：目标执行前，按声明顺序调用；返回错误会中止调用
/// - `on_exit`：目标成功后，按声明的逆序调用；可以读取和替换结果
/// - `on_failure`：目标失败后，按声明的逆序调用，只对 `handles` 返回 true 的失败类型调用；
///   第一个返回 `Handled` 的切面提供最终结果
///
/// 链只调用 `capabilities` 中声明的钩子。切面本身不保存单次调用的状态，
/// 入口到出口之间需要传递的数据放在 `InterceptionContext` 的 scratch 中，
/// 因此同一个切面可以被多个链、多个线程同时使用。
pub trait Aspect<A, R>: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    fn on_entry(&self, _ctx: &mut InterceptionContext<A, R>) -> Result<(), AopError> {
        Ok(())
    }

    fn on_exit(&self, _ctx: &mut InterceptionContext<A, R>) {}

    fn handles(&self, _kind: &FailureKind) -> bool {
        false
    }

    fn on_failure(
        &self,
        _ctx: &mut InterceptionContext<A, R>,
        _failure: &FailureDescriptor<'_>,
    ) -> FailureOutcome<R> {
        FailureOutcome::Propagate
    }
}
