use crate::log::appender::LogAppender;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// MemoryAppender 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct MemoryAppenderConfig {
    /// 最多保留的行数，超出后丢弃最旧的行
    #[default = 1024]
    pub capacity: usize,
}

/// 内存输出器
///
/// 把日志行保存在进程内的环形缓冲区中。克隆出的实例共享同一个缓冲区，
/// 一份交给 Logger 写入，另一份留给调用方读取。
#[derive(Clone)]
pub struct MemoryAppender {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl MemoryAppender {
    pub fn new(config: MemoryAppenderConfig) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(config.capacity.min(1024)))),
            capacity: config.capacity,
        }
    }

    /// 当前缓冲区内容的快照
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// 包含指定片段的行
    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Default for MemoryAppender {
    fn default() -> Self {
        Self::new(MemoryAppenderConfig::default())
    }
}

impl LogAppender for MemoryAppender {
    fn append(&self, formatted_message: &str) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(formatted_message.to_string());
        Ok(())
    }
}

crate::impl_from!(MemoryAppenderConfig => MemoryAppender);
crate::impl_box_from!(MemoryAppender => dyn LogAppender);
