//! CommitterRegistry 核心实现
//!
//! 类标识 -> 构造函数 的映射，配置加载时按 `class` 实例化 committer。

use std::collections::BTreeMap;
use std::fmt;

use contracts::{shared, Committer, CommitterFactory, ContractError, SharedCommitter};
use dispatcher::{
    CompositeDispatcher, FileSystemCommitter, LogCommitter, NilCommitter, COMPOSITE_CLASS,
    FILESYSTEM_CLASS, LOG_CLASS, NIL_CLASS,
};
use tracing::{debug, instrument, warn};

use crate::error::{FactoryError, Result};

/// Produces a fresh, unconfigured committer
pub type CommitterConstructor =
    Box<dyn Fn() -> std::result::Result<SharedCommitter, ContractError>>;

/// Committer Registry
///
/// 负责把配置中的 class 标识解析为具体 committer 实例，
/// 不依赖运行时反射。
#[derive(Default)]
pub struct CommitterRegistry {
    constructors: BTreeMap<String, CommitterConstructor>,
}

impl CommitterRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含内置 committers 的注册表
    ///
    /// Registers `CompositeDispatcher`, `LogCommitter`, `FileSystemCommitter`
    /// and `NilCommitter` under their class identifiers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert_default::<CompositeDispatcher>(COMPOSITE_CLASS);
        registry.insert_default::<LogCommitter>(LOG_CLASS);
        registry.insert_default::<FileSystemCommitter>(FILESYSTEM_CLASS);
        registry.insert_default::<NilCommitter>(NIL_CLASS);
        registry
    }

    /// 注册构造函数
    ///
    /// # Errors
    /// - `InvalidClass` for an empty or whitespace-containing identifier
    /// - `DuplicateClass` if the identifier is taken
    pub fn register<F>(&mut self, class: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn() -> std::result::Result<SharedCommitter, ContractError> + 'static,
    {
        let class = class.into();
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(FactoryError::invalid(class));
        }
        if self.constructors.contains_key(&class) {
            return Err(FactoryError::duplicate(class));
        }
        debug!(class = %class, "committer class registered");
        self.constructors.insert(class, Box::new(constructor));
        Ok(())
    }

    /// 注册使用 `Default` 构造的 committer 类型
    pub fn register_default<C>(&mut self, class: impl Into<String>) -> Result<()>
    where
        C: Committer + Default + 'static,
    {
        self.register(class, default_constructor::<C>)
    }

    /// 移除注册，返回是否存在
    pub fn unregister(&mut self, class: &str) -> bool {
        self.constructors.remove(class).is_some()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    /// 已注册的类标识 (按字典序)
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    fn insert_default<C>(&mut self, class: &str)
    where
        C: Committer + Default + 'static,
    {
        self.constructors
            .insert(class.to_string(), Box::new(default_constructor::<C>));
    }
}

fn default_constructor<C>() -> std::result::Result<SharedCommitter, ContractError>
where
    C: Committer + Default + 'static,
{
    Ok(shared(C::default()))
}

impl CommitterFactory for CommitterRegistry {
    #[instrument(name = "committer_registry_instantiate", skip(self))]
    fn instantiate(&self, class: &str) -> std::result::Result<SharedCommitter, ContractError> {
        let constructor = self.constructors.get(class).ok_or_else(|| {
            warn!(class, "no committer registered under class");
            ContractError::unknown_class(class)
        })?;

        constructor().map_err(|e| match e {
            ContractError::Instantiation { .. } => e,
            other => ContractError::instantiation(class, other.to_string()),
        })
    }
}

impl fmt::Debug for CommitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitterRegistry")
            .field("classes", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
