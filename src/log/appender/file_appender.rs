use crate::log::appender::LogAppender;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// FileAppender 配置
#[derive(Debug, Clone, Deserialize)]
pub struct FileAppenderConfig {
    /// 日志文件路径
    pub file_path: String,
}

/// 文件输出器
///
/// 以追加模式写入，父目录不存在时自动创建
pub struct FileAppender {
    file: Mutex<File>,
    config: FileAppenderConfig,
}

impl FileAppender {
    pub fn new(config: FileAppenderConfig) -> Result<Self> {
        let path = PathBuf::from(&config.file_path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
            config,
        })
    }

    /// 获取日志文件路径
    pub fn path(&self) -> &str {
        &self.config.file_path
    }
}

impl LogAppender for FileAppender {
    fn append(&self, formatted_message: &str) -> Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(file, "{}", formatted_message)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()?;
        Ok(())
    }
}
