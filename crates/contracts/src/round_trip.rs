//! Configuration round-trip contract and the factory seam it loads through

use crate::{ConfigFragment, ContractError, DiagnosticsSink, SharedCommitter};

/// Default bound on composite nesting while loading
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Construct a default committer instance from a class identifier
///
/// Implemented by the committer registry; consumed by composites while
/// loading their members.
pub trait CommitterFactory {
    /// Create a fresh, unconfigured instance of `class`
    ///
    /// # Errors
    /// - `UnknownClass` when nothing is registered under `class`
    /// - `Instantiation` when the constructor fails
    fn instantiate(&self, class: &str) -> Result<SharedCommitter, ContractError>;
}

/// Load a committer from / save it to a [`ConfigFragment`]
pub trait ConfigRoundTrip {
    /// Class identifier written to the `class` attribute on save
    fn class_name(&self) -> &str;

    /// Configure `self` from `fragment`
    fn load_from_config(
        &mut self,
        fragment: &ConfigFragment,
        ctx: &LoadContext<'_>,
    ) -> Result<(), ContractError>;

    /// Produce the fragment describing `self`
    fn save_to_config(&self, ctx: &SaveContext<'_>) -> Result<ConfigFragment, ContractError>;
}

/// State threaded through a (possibly nested) load
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    factory: &'a dyn CommitterFactory,
    depth: usize,
    max_depth: usize,
}

impl<'a> LoadContext<'a> {
    pub fn new(factory: &'a dyn CommitterFactory) -> Self {
        Self {
            factory,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn factory(&self) -> &'a dyn CommitterFactory {
        self.factory
    }

    /// Current nesting depth (0 at the root)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for loading one level deeper
    ///
    /// # Errors
    /// `NestingTooDeep` once `max_depth` is exceeded
    pub fn nested(&self) -> Result<Self, ContractError> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(ContractError::NestingTooDeep {
                depth,
                max: self.max_depth,
            });
        }
        Ok(Self { depth, ..*self })
    }
}

/// State threaded through a (possibly nested) save
#[derive(Clone, Copy)]
pub struct SaveContext<'a> {
    diagnostics: &'a dyn DiagnosticsSink,
    depth: usize,
    max_depth: usize,
}

impl<'a> SaveContext<'a> {
    pub fn new(diagnostics: &'a dyn DiagnosticsSink) -> Self {
        Self {
            diagnostics,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn diagnostics(&self) -> &'a dyn DiagnosticsSink {
        self.diagnostics
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for saving one level deeper
    ///
    /// A composite that contains itself keeps nesting until this fails.
    pub fn nested(&self) -> Result<Self, ContractError> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(ContractError::NestingTooDeep {
                depth,
                max: self.max_depth,
            });
        }
        Ok(Self { depth, ..*self })
    }
}
