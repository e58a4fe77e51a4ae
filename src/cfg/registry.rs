// Trait 注册表和工厂函数

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::type_options::TypeOptions;

// Trait-based 构造函数类型
// 返回 Box<dyn Any>，实际内容是 Box<Box<dyn Trait>>
type TraitConstructor =
    Arc<dyn Fn(JsonValue) -> Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

// Trait 注册表：为每个 Trait 类型维护一个独立的注册表
// 外层 HashMap 的 key 是 Trait 的 TypeId，内层 HashMap 的 key 是类型名称
//
// 泛型 trait 的每一种实例化（例如 dyn Aspect<(i32, i32), i32>）都有独立的 TypeId，
// 因此同名实现可以为不同的签名分别注册。
static TRAIT_REGISTRY: Lazy<RwLock<HashMap<TypeId, HashMap<String, TraitConstructor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 为实现特定 Trait 的类型注册构造函数
///
/// 重复注册同一个名称会覆盖之前的构造函数。
///
/// # 类型参数
/// - `T`: 具体实现类型
/// - `Trait`: 目标 trait（使用 `dyn Trait` 形式）
/// - `Config`: 配置类型
///
/// # 示例
/// ```ignore
/// register_trait::<TextFormatter, dyn LogFormatter, TextFormatterConfig>("TextFormatter")?;
/// let formatter: Box<dyn LogFormatter> = create_trait_from_type_options(&type_options)?;
/// ```
pub fn register_trait<T, Trait, Config>(type_name: &str) -> Result<()>
where
    T: Send + Sync + 'static,
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    T: From<Config>,
    Box<T>: Into<Box<Trait>>,
{
    let constructor: TraitConstructor = Arc::new(move |value| {
        let config: Config = serde_json::from_value(value)?;
        let trait_object: Box<Trait> = Box::new(T::from(config)).into();
        // 将 Box<dyn Trait> 包装成 Box<dyn Any>
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    register_constructor::<Trait>(type_name, constructor)
}

/// 注册可能失败的构造函数
///
/// 与 `register_trait` 相同，但构造过程可以返回错误（例如需要打开文件、解析 logger 引用），
/// 错误会从 `create_trait_from_type_options` 返回而不是 panic。
pub fn register_trait_with<Trait, Config, Build>(type_name: &str, build: Build) -> Result<()>
where
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    Build: Fn(Config) -> Result<Box<Trait>> + Send + Sync + 'static,
{
    let constructor: TraitConstructor = Arc::new(move |value| {
        let config: Config = serde_json::from_value(value)?;
        let trait_object = build(config)?;
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    register_constructor::<Trait>(type_name, constructor)
}

fn register_constructor<Trait>(type_name: &str, constructor: TraitConstructor) -> Result<()>
where
    Trait: ?Sized + 'static,
{
    let mut registry = TRAIT_REGISTRY
        .write()
        .map_err(|_| anyhow!("Failed to acquire write lock"))?;
    registry
        .entry(TypeId::of::<Trait>())
        .or_default()
        .insert(type_name.to_string(), constructor);

    Ok(())
}

/// 根据 TypeOptions 创建 trait object
///
/// # 示例
/// ```ignore
/// let type_options = TypeOptions::from_json(r#"{"type": "ConsoleAppender", "options": {}}"#)?;
/// let appender: Box<dyn LogAppender> = create_trait_from_type_options(&type_options)?;
/// ```
pub fn create_trait_from_type_options<Trait>(type_options: &TypeOptions) -> Result<Box<Trait>>
where
    Trait: ?Sized + Send + Sync + 'static,
{
    // 先取出构造函数再释放读锁，构造过程中可能会再次注册组件（例如创建 Logger）
    let constructor = {
        let registry = TRAIT_REGISTRY
            .read()
            .map_err(|_| anyhow!("Failed to acquire read lock"))?;

        registry
            .get(&TypeId::of::<Trait>())
            .and_then(|types| types.get(&type_options.type_name))
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "Type '{}' not registered for {}",
                    type_options.type_name,
                    std::any::type_name::<Trait>()
                )
            })?
    };

    let any_box = constructor(type_options.options.clone())
        .map_err(|e| anyhow!("Failed to create '{}': {}", type_options.type_name, e))?;

    // 从 Box<dyn Any> 中提取 Box<dyn Trait>
    any_box
        .downcast::<Box<Trait>>()
        .map(|boxed| *boxed)
        .map_err(|_| anyhow!("Failed to downcast to target trait type"))
}

/// 检查某个类型名是否已为 Trait 注册
pub fn is_registered<Trait>(type_name: &str) -> bool
where
    Trait: ?Sized + 'static,
{
    TRAIT_REGISTRY
        .read()
        .map(|registry| {
            registry
                .get(&TypeId::of::<Trait>())
                .is_some_and(|types| types.contains_key(type_name))
        })
        .unwrap_or(false)
}

/// 获取为 Trait 注册的所有类型名（已排序）
pub fn registered_type_names<Trait>() -> Vec<String>
where
    Trait: ?Sized + 'static,
{
    let mut names: Vec<String> = TRAIT_REGISTRY
        .read()
        .map(|registry| {
            registry
                .get(&TypeId::of::<Trait>())
                .map(|types| types.keys().cloned().collect())
                .unwrap_or_default()
        })
        .unwrap_or_default();
    names.sort();
    names
}
