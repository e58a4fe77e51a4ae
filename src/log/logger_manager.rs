use crate::log::logger::LoggerConfig;
use crate::log::Logger;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use smart_default::SmartDefault;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Logger Manager 配置
///
/// 用于统一管理多个 Logger 实例
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct LoggerManagerConfig {
    /// 默认 logger 配置
    pub default: LoggerConfig,

    /// 命名 logger 配置映射
    pub loggers: HashMap<String, LoggerConfig>,
}

/// Logger 管理器
///
/// 按名称维护 Logger 实例，并始终持有一个默认 logger
pub struct LoggerManager {
    pub(crate) loggers: RwLock<HashMap<String, Arc<Logger>>>,
    default: RwLock<Arc<Logger>>,
}

impl LoggerManager {
    /// 从配置创建 LoggerManager
    pub fn new(config: LoggerManagerConfig) -> Result<Self> {
        let mut loggers = HashMap::new();

        // 第一步：创建所有 Create 模式的 logger，记录 Reference 模式的引用关系
        let mut references: Vec<(String, String)> = Vec::new();
        for (key, logger_config) in config.loggers {
            match logger_config {
                LoggerConfig::Reference { instance } => references.push((key, instance)),
                LoggerConfig::Create(create_config) => {
                    loggers.insert(key, Arc::new(Logger::new(create_config)?));
                }
            }
        }

        // 第二步：处理所有 Reference 模式的配置
        for (key, instance) in references {
            let logger = Self::resolve_by_name(&instance, &loggers)?;
            loggers.insert(key, logger);
        }

        let default = match config.default {
            LoggerConfig::Reference { instance } => Self::resolve_by_name(&instance, &loggers)?,
            LoggerConfig::Create(create_config) => Arc::new(Logger::new(create_config)?),
        };

        Ok(Self {
            loggers: RwLock::new(loggers),
            default: RwLock::new(default),
        })
    }

    /// 只包含默认 logger 的管理器
    pub fn with_default(default: Arc<Logger>) -> Self {
        Self {
            loggers: RwLock::new(HashMap::new()),
            default: RwLock::new(default),
        }
    }

    /// 先从当前配置创建的 loggers 中查找，再从全局管理器中查找
    fn resolve_by_name(
        instance: &str,
        created: &HashMap<String, Arc<Logger>>,
    ) -> Result<Arc<Logger>> {
        created
            .get(instance)
            .cloned()
            .or_else(|| crate::log::get(instance))
            .ok_or_else(|| {
                anyhow!(
                    "Logger instance '{}' not found (neither in current config nor in global manager)",
                    instance
                )
            })
    }

    /// 获取指定 key 的 logger
    pub fn get(&self, key: &str) -> Option<Arc<Logger>> {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// 获取指定 key 的 logger，如果不存在则返回默认 logger
    pub fn get_or_default(&self, key: &str) -> Arc<Logger> {
        self.get(key).unwrap_or_else(|| self.get_default())
    }

    /// 获取默认 logger
    pub fn get_default(&self) -> Arc<Logger> {
        Arc::clone(&self.default.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// 设置默认 logger
    pub fn set_default(&self, logger: Arc<Logger>) {
        *self.default.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    /// 动态添加 logger
    pub fn add(&self, key: impl Into<String>, logger: Arc<Logger>) {
        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), logger);
    }

    /// 检查指定 key 的 logger 是否存在
    pub fn contains(&self, key: &str) -> bool {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// 获取所有 logger 的 key 列表
    pub fn keys(&self) -> Vec<String> {
        self.loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// 移除指定 key 的 logger
    pub fn remove(&self, key: &str) -> Option<Arc<Logger>> {
        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}
