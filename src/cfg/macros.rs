//! 配置相关的宏定义
//!
//! 提供简化 From trait 实现的宏，配合 `register_trait` 使用

/// 为配置类型自动实现 From trait
///
/// 支持两种模式：
/// 1. `impl_from!(ConfigType => Type)` - 调用 Type::new(config)
/// 2. `impl_from!(ConfigType => Type, field: config)` - 使用 Self { config }
#[macro_export]
macro_rules! impl_from {
    // 模式1: 直接调用 new 方法
    ($config_type:ty => $target_type:ty) => {
        impl From<$config_type> for $target_type {
            fn from(config: $config_type) -> Self {
                <$target_type>::new(config)
            }
        }
    };

    // 模式2: 直接使用配置字段构造
    ($config_type:ty => $target_type:ty, field: $field:ident) => {
        impl From<$config_type> for $target_type {
            fn from(config: $config_type) -> Self {
                Self { $field: config }
            }
        }
    };
}

/// 为 Box<T> 类型自动实现到 Box<dyn Trait> 的转换
///
/// 用法：`impl_box_from!(Type => dyn TraitName)`
#[macro_export]
macro_rules! impl_box_from {
    ($source_type:ty => dyn $trait_name:path) => {
        impl From<Box<$source_type>> for Box<dyn $trait_name> {
            fn from(source: Box<$source_type>) -> Self {
                source as Box<dyn $trait_name>
            }
        }
    };
}
