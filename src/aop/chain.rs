use crate::aop::aspect::{Aspect, Capabilities};
use crate::aop::context::{AspectId, InterceptionContext};
use crate::aop::error::{AopError, InvokeError};
use crate::aop::failure::{Failure, FailureDescriptor, FailureOutcome};
use crate::log::{LogLevel, LogRecord, Logger};
use std::future::Future;
use std::sync::Arc;

/// 切面链
///
/// 一组有序的切面绑定到一个目标操作上，构造后不可变。
///
/// # 执行顺序
///
/// 1. 为本次调用创建新的 `InterceptionContext`
/// 2. 按声明顺序执行 `on_entry`，任何一个返回错误都立即中止
/// 3. 执行目标操作（恰好一次）
/// 4. 成功：按逆序执行 `on_exit`，返回（可能被替换的）结果
/// 5. 失败：按逆序询问处理该失败类型的切面，第一个 `Handled` 的替代结果作为最终结果；
///    没有切面处理时原样返回目标错误。失败路径不会执行任何 `on_exit`
///
/// 链本身不持有可变状态，只要目标是 `Send + Sync`，就可以放在 `Arc` 中被多个线程同时调用。
///
/// # 示例
///
/// ```ignore
/// let chain = AspectChain::builder("Calculator.Divide")
///     .aspect(TraceAspect::with_logger(logger.clone()))
///     .aspect(RecoverAspect::new("division_by_zero", 0.0).logger(logger))
///     .build(|&(x, y): &(i32, i32)| calculator::divide(x, y));
///
/// assert_eq!(chain.invoke((20, 0))?, 0.0);
/// ```
pub struct AspectChain<A, R, F> {
    operation: Arc<str>,
    aspects: Vec<Arc<dyn Aspect<A, R>>>,
    target: F,
    logger: Option<Arc<Logger>>,
}

/// 切面链构造器
pub struct AspectChainBuilder<A, R> {
    operation: Arc<str>,
    aspects: Vec<Arc<dyn Aspect<A, R>>>,
    logger: Option<Arc<Logger>>,
}

impl<A, R> AspectChainBuilder<A, R> {
    /// 追加一个切面，追加顺序即声明顺序
    pub fn aspect<T>(mut self, aspect: T) -> Self
    where
        T: Aspect<A, R> + 'static,
    {
        self.aspects.push(Arc::new(aspect));
        self
    }

    /// 追加一个共享的切面实例
    pub fn shared(mut self, aspect: Arc<dyn Aspect<A, R>>) -> Self {
        self.aspects.push(aspect);
        self
    }

    /// 链的诊断日志，记录失败被哪个切面处理或被传播
    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build<F>(self, target: F) -> AspectChain<A, R, F> {
        AspectChain {
            operation: self.operation,
            aspects: self.aspects,
            target,
            logger: self.logger,
        }
    }
}

impl<A, R> AspectChain<A, R, ()> {
    /// 目标在 `build` 时才确定，这里的 `()` 只是占位
    pub fn builder(operation: impl Into<Arc<str>>) -> AspectChainBuilder<A, R> {
        AspectChainBuilder {
            operation: operation.into(),
            aspects: Vec::new(),
            logger: None,
        }
    }
}

impl<A, R, F> AspectChain<A, R, F> {
    pub fn new(
        operation: impl Into<Arc<str>>,
        aspects: Vec<Arc<dyn Aspect<A, R>>>,
        target: F,
    ) -> Self {
        Self {
            operation: operation.into(),
            aspects,
            target,
            logger: None,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// 按声明顺序列出切面名称
    pub fn aspect_names(&self) -> Vec<&str> {
        self.aspects.iter().map(|aspect| aspect.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// 同步调用
    pub fn invoke<E>(&self, args: A) -> Result<R, InvokeError<E>>
    where
        F: Fn(&A) -> Result<R, E>,
        E: Failure,
    {
        let mut ctx = InterceptionContext::new(Arc::clone(&self.operation), args);
        self.run_entry(&mut ctx)?;
        let outcome = (self.target)(ctx.args());
        self.complete(ctx, outcome)
    }

    /// 异步调用
    ///
    /// 与 `invoke` 的顺序完全相同，`on_exit` 和 `on_failure` 在目标 future 完成之后才执行。
    /// 参数会被克隆一份交给目标，上下文中保留原始参数供出口钩子读取。
    pub async fn invoke_async<Fut, E>(&self, args: A) -> Result<R, InvokeError<E>>
    where
        A: Clone,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Failure,
    {
        let mut ctx = InterceptionContext::new(Arc::clone(&self.operation), args);
        self.run_entry(&mut ctx)?;
        let outcome = (self.target)(ctx.args().clone()).await;
        self.complete(ctx, outcome)
    }

    fn run_entry<E: Failure>(
        &self,
        ctx: &mut InterceptionContext<A, R>,
    ) -> Result<(), InvokeError<E>> {
        for (index, aspect) in self.aspects.iter().enumerate() {
            if !aspect.capabilities().contains(Capabilities::ENTRY) {
                continue;
            }
            ctx.enter_aspect(AspectId::new(index));
            aspect
                .on_entry(ctx)
                .map_err(|source| InvokeError::Configuration {
                    aspect: aspect.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn complete<E: Failure>(
        &self,
        mut ctx: InterceptionContext<A, R>,
        outcome: Result<R, E>,
    ) -> Result<R, InvokeError<E>> {
        let error = match outcome {
            Ok(result) => {
                ctx.replace_result(result);
                return self.run_exit(ctx);
            }
            Err(error) => error,
        };

        let kind = error.kind();
        let descriptor = FailureDescriptor::new(&self.operation, &kind, &error);
        for (index, aspect) in self.aspects.iter().enumerate().rev() {
            if !aspect.capabilities().contains(Capabilities::FAILURE) || !aspect.handles(&kind) {
                continue;
            }
            ctx.enter_aspect(AspectId::new(index));
            if let FailureOutcome::Handled(substitute) = aspect.on_failure(&mut ctx, &descriptor) {
                self.diagnose(
                    LogRecord::new(
                        LogLevel::Debug,
                        format!("[AOP] {} recovered by {}", self.operation, aspect.name()),
                    )
                    .with_metadata("aspect", aspect.name())
                    .with_metadata("kind", kind.as_str()),
                );
                return Ok(substitute);
            }
        }

        self.diagnose(
            LogRecord::new(
                LogLevel::Debug,
                format!("[AOP] {} failure propagated", self.operation),
            )
            .with_metadata("kind", kind.as_str())
            .with_metadata("error", error.to_string()),
        );
        Err(InvokeError::Target(error))
    }

    fn run_exit<E: Failure>(
        &self,
        mut ctx: InterceptionContext<A, R>,
    ) -> Result<R, InvokeError<E>> {
        for (index, aspect) in self.aspects.iter().enumerate().rev() {
            if !aspect.capabilities().contains(Capabilities::EXIT) {
                continue;
            }
            ctx.enter_aspect(AspectId::new(index));
            aspect.on_exit(&mut ctx);
            if ctx.result().is_none() {
                return Err(InvokeError::Configuration {
                    aspect: aspect.name().to_string(),
                    source: AopError::MissingResult,
                });
            }
        }

        ctx.into_result()
            .ok_or_else(|| InvokeError::Configuration {
                aspect: self.operation.to_string(),
                source: AopError::MissingResult,
            })
    }

    fn diagnose(&self, record: LogRecord) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(record.with_metadata("operation", &*self.operation));
        }
    }
}
