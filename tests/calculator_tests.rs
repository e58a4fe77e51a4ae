//! 计算器场景的集成测试：Trace + HandleDivisionByZero

use aspectx::aop::{AspectChain, InvokeError, TraceAspect};
use aspectx::calculator::{
    divide, handle_division_by_zero, AspectCalculator, CalcError, Calculator, Operands,
};
use aspectx::log::{
    JsonFormatter, LogLevel, Logger, MemoryAppender, TextFormatter, TextFormatterConfig,
};
use std::sync::Arc;

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

fn divide_target(&(x, y): &Operands) -> Result<f64, CalcError> {
    divide(x, y)
}

#[test]
fn test_trace_then_handle_division_by_zero() {
    let (logger, appender) = memory_logger();
    let chain = AspectChain::builder("Calculator.Divide")
        .aspect(TraceAspect::with_logger(Arc::clone(&logger)))
        .aspect(handle_division_by_zero(logger))
        .build(divide_target);

    assert_eq!(chain.invoke((20, 4)), Ok(5.0));
    assert_eq!(
        appender
            .lines_containing("Calculator.Divide execution time: ")
            .len(),
        1
    );

    appender.clear();
    assert_eq!(chain.invoke((20, 0)), Ok(0.0));
    assert!(appender.lines_containing("execution time").is_empty());
    assert_eq!(
        appender.lines_containing("Division by zero exception").len(),
        1
    );
}

#[test]
fn test_trace_only_propagates_division_by_zero() {
    let (logger, appender) = memory_logger();
    let chain = AspectChain::builder("Calculator.Divide")
        .aspect(TraceAspect::with_logger(logger))
        .build(divide_target);

    assert_eq!(
        chain.invoke((20, 0)),
        Err(InvokeError::Target(CalcError::DivisionByZero { dividend: 20 }))
    );
    assert!(appender.is_empty());
}

#[test]
fn test_calculator_json_log_lines() {
    let appender = MemoryAppender::default();
    let logger = Arc::new(Logger::with_components(
        LogLevel::Info,
        Arc::new(JsonFormatter::default()),
        Arc::new(appender.clone()),
    ));
    let calculator = AspectCalculator::new(logger);

    assert_eq!(calculator.add(2, 7), Ok(9));

    let records: Vec<serde_json::Value> = appender
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["metadata"]["operation"], "Calculator.Add");
    assert!(records[0]["metadata"]["duration_ms"].is_number());
    assert_eq!(records[1]["message"], "Calculator.Add: 9");
    assert_eq!(records[1]["metadata"]["args"], "(2, 7)");
}

#[test]
fn test_calculator_shared_across_threads() {
    let (logger, appender) = memory_logger();
    let calculator = Arc::new(AspectCalculator::new(logger));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let calculator = Arc::clone(&calculator);
            std::thread::spawn(move || {
                (
                    calculator.multiply(i, i).unwrap(),
                    calculator.divide(i, 0).unwrap(),
                )
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        let i = i as i32;
        assert_eq!(worker.join().unwrap(), (i * i, 0.0));
    }
    assert_eq!(appender.lines_containing("Division by zero exception").len(), 8);
    assert_eq!(appender.lines_containing("Calculator.Multiply execution time").len(), 8);
}
