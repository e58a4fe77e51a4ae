//! cfg 模块 - 配置管理
//!
//! 提供基于 `TypeOptions` 的零耦合组件创建：切面、日志格式化器、日志输出器
//! 都通过类型名注册，再由配置按名称实例化。

pub mod macros;
pub mod registry;
pub mod serde_duration;
pub mod type_options;

// 重新导出公共 API
pub use registry::{
    create_trait_from_type_options, is_registered, register_trait, register_trait_with,
    registered_type_names,
};
pub use type_options::TypeOptions;
