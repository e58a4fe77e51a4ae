use crate::log::logger_manager::{LoggerManager, LoggerManagerConfig};
use crate::log::Logger;
use anyhow::Result;
use once_cell::sync::Lazy;
use std::sync::{Arc, PoisonError};

/// 全局 LoggerManager 单例
///
/// 默认包含一个输出到终端的文本形式 logger
static GLOBAL_LOGGER_MANAGER: Lazy<LoggerManager> =
    Lazy::new(|| LoggerManager::with_default(Arc::new(Logger::console())));

/// 初始化全局 LoggerManager
///
/// 配置中的 logger 合并进全局单例，并替换默认 logger
///
/// ```ignore
/// aspectx::log::init(json5::from_str(r#"{ loggers: { trace: { level: "info" } } }"#)?)?;
/// ```
pub fn init(config: LoggerManagerConfig) -> Result<()> {
    let manager = LoggerManager::new(config)?;

    {
        let created = manager
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for (key, logger) in created.iter() {
            GLOBAL_LOGGER_MANAGER.add(key.clone(), Arc::clone(logger));
        }
    }
    GLOBAL_LOGGER_MANAGER.set_default(manager.get_default());

    Ok(())
}

/// 获取全局 LoggerManager
pub fn global_logger_manager() -> &'static LoggerManager {
    &GLOBAL_LOGGER_MANAGER
}

/// 获取指定 key 的 logger（全局）
pub fn get(key: &str) -> Option<Arc<Logger>> {
    GLOBAL_LOGGER_MANAGER.get(key)
}

/// 获取指定 key 的 logger，如果不存在则返回默认 logger（全局）
pub fn get_or_default(key: &str) -> Arc<Logger> {
    GLOBAL_LOGGER_MANAGER.get_or_default(key)
}

/// 获取默认 logger（全局）
pub fn get_default() -> Arc<Logger> {
    GLOBAL_LOGGER_MANAGER.get_default()
}

/// 设置默认 logger（全局）
pub fn set_default(logger: Arc<Logger>) {
    GLOBAL_LOGGER_MANAGER.set_default(logger)
}

/// 动态添加 logger（全局）
pub fn add(key: impl Into<String>, logger: Arc<Logger>) {
    GLOBAL_LOGGER_MANAGER.add(key, logger)
}

/// 检查指定 key 的 logger 是否存在（全局）
pub fn contains(key: &str) -> bool {
    GLOBAL_LOGGER_MANAGER.contains(key)
}

/// 移除指定 key 的 logger（全局）
pub fn remove(key: &str) -> Option<Arc<Logger>> {
    GLOBAL_LOGGER_MANAGER.remove(key)
}
