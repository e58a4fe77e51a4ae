use crate::aop::error::AopError;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 切面在链中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AspectId(usize);

impl AspectId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 拦截上下文
///
/// 每次调用创建一个，只属于这一次调用，调用结束即销毁。
///
/// scratch 按切面位置隔离：链在调用每个钩子之前设置当前切面，`stash`、`peek`、`take`
/// 总是访问当前切面自己的槽位，不同切面即使存放相同类型的数据也互不可见。
pub struct InterceptionContext<A, R> {
    operation: Arc<str>,
    args: A,
    result: Option<R>,
    scratch: HashMap<AspectId, Box<dyn Any + Send>>,
    current: Option<AspectId>,
}

impl<A, R> InterceptionContext<A, R> {
    pub fn new(operation: impl Into<Arc<str>>, args: A) -> Self {
        Self {
            operation: operation.into(),
            args,
            result: None,
            scratch: HashMap::new(),
            current: None,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn args(&self) -> &A {
        &self.args
    }

    /// 当前正在执行钩子的切面
    pub fn aspect_id(&self) -> Option<AspectId> {
        self.current
    }

    /// 切换当前切面，链在调用每个钩子之前设置
    pub fn enter_aspect(&mut self, id: AspectId) {
        self.current = Some(id);
    }

    pub fn result(&self) -> Option<&R> {
        self.result.as_ref()
    }

    pub fn result_mut(&mut self) -> Option<&mut R> {
        self.result.as_mut()
    }

    /// 替换结果，返回原来的结果
    pub fn replace_result(&mut self, result: R) -> Option<R> {
        self.result.replace(result)
    }

    pub fn take_result(&mut self) -> Option<R> {
        self.result.take()
    }

    pub(crate) fn into_result(self) -> Option<R> {
        self.result
    }

    /// 在当前切面的槽位中存放数据
    ///
    /// 槽位已被占用时返回 `ScratchOccupied`。
    pub fn stash<T: Any + Send>(&mut self, value: T) -> Result<(), AopError> {
        let slot = self.current.ok_or(AopError::NoActiveAspect)?;
        if self.scratch.contains_key(&slot) {
            return Err(AopError::ScratchOccupied { slot });
        }
        self.scratch.insert(slot, Box::new(value));
        Ok(())
    }

    /// 读取当前切面存放的数据
    pub fn peek<T: Any>(&self) -> Option<&T> {
        let slot = self.current?;
        self.scratch.get(&slot)?.downcast_ref::<T>()
    }

    /// 取出当前切面存放的数据
    ///
    /// 类型不匹配时返回 None，数据保留在槽位中。
    pub fn take<T: Any>(&mut self) -> Option<T> {
        let slot = self.current?;
        let value = self.scratch.remove(&slot)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                self.scratch.insert(slot, value);
                None
            }
        }
    }
}

impl<A: fmt::Debug, R: fmt::Debug> fmt::Debug for InterceptionContext<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionContext")
            .field("operation", &self.operation)
            .field("args", &self.args)
            .field("result", &self.result)
            .field("scratch_slots", &self.scratch.len())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn ctx() -> InterceptionContext<(i32, i32), i32> {
        InterceptionContext::new("Calculator.Add", (2, 7))
    }

    #[test]
    fn test_accessors() {
        let mut ctx = ctx();
        assert_eq!(ctx.operation(), "Calculator.Add");
        assert_eq!(ctx.args(), &(2, 7));
        assert_eq!(ctx.result(), None);

        assert_eq!(ctx.replace_result(9), None);
        *ctx.result_mut().unwrap() += 1;
        assert_eq!(ctx.result(), Some(&10));
        assert_eq!(ctx.take_result(), Some(10));
        assert_eq!(ctx.into_result(), None);
    }

    #[test]
    fn test_scratch_requires_active_aspect() {
        let mut ctx = ctx();
        assert_eq!(ctx.stash(1u8), Err(AopError::NoActiveAspect));
        assert!(ctx.peek::<u8>().is_none());
        assert!(ctx.take::<u8>().is_none());
    }

    #[test]
    fn test_scratch_is_isolated_per_aspect() {
        let mut ctx = ctx();
        let first = Instant::now();

        ctx.enter_aspect(AspectId::new(0));
        ctx.stash(first).unwrap();

        ctx.enter_aspect(AspectId::new(1));
        assert!(ctx.peek::<Instant>().is_none());
        ctx.stash(Instant::now()).unwrap();

        ctx.enter_aspect(AspectId::new(0));
        assert_eq!(ctx.take::<Instant>(), Some(first));
        assert!(ctx.take::<Instant>().is_none());

        ctx.enter_aspect(AspectId::new(1));
        assert!(ctx.take::<Instant>().is_some());
    }

    #[test]
    fn test_stash_occupied() {
        let mut ctx = ctx();
        ctx.enter_aspect(AspectId::new(3));
        ctx.stash("first").unwrap();
        assert_eq!(
            ctx.stash("second"),
            Err(AopError::ScratchOccupied {
                slot: AspectId::new(3)
            })
        );
        assert_eq!(ctx.peek::<&str>(), Some(&"first"));
    }

    #[test]
    fn test_take_wrong_type_keeps_value() {
        let mut ctx = ctx();
        ctx.enter_aspect(AspectId::new(0));
        ctx.stash(42u64).unwrap();

        assert!(ctx.take::<String>().is_none());
        assert_eq!(ctx.peek::<u64>(), Some(&42));
        assert_eq!(ctx.take::<u64>(), Some(42));
    }

    #[test]
    fn test_aspect_id_display() {
        assert_eq!(AspectId::new(5).to_string(), "#5");
        assert_eq!(AspectId::new(5).index(), 5);
    }
}
