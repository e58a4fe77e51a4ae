use crate::cfg::{
    create_trait_from_type_options, register_trait, register_trait_with, TypeOptions,
};
use crate::log::appender::{
    console_appender::{ConsoleAppender, ConsoleAppenderConfig},
    file_appender::{FileAppender, FileAppenderConfig},
    memory_appender::{MemoryAppender, MemoryAppenderConfig},
    LogAppender,
};
use anyhow::Result;

/// 注册所有 Appender 实现
pub fn register_appenders() -> Result<()> {
    register_trait::<ConsoleAppender, dyn LogAppender, ConsoleAppenderConfig>("ConsoleAppender")?;
    register_trait::<MemoryAppender, dyn LogAppender, MemoryAppenderConfig>("MemoryAppender")?;
    // 打开文件可能失败，使用可失败的构造函数
    register_trait_with::<dyn LogAppender, FileAppenderConfig, _>("FileAppender", |config| {
        Ok(Box::new(FileAppender::new(config)?))
    })?;
    Ok(())
}

/// 从 TypeOptions 创建 Appender
pub fn create_appender_from_options(options: &TypeOptions) -> Result<Box<dyn LogAppender>> {
    create_trait_from_type_options(options)
}
