//! ConfigFragment - one `committer` node of a configuration document
//!
//! Document shape:
//!
//! ```toml
//! class = "dispatcher::CompositeDispatcher"
//!
//! [[committer]]
//! class = "dispatcher::LogCommitter"
//! name = "audit"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::ContractError;

/// Key under which nested fragments are stored
pub const CHILD_KEY: &str = "committer";

/// Key holding the class identifier
pub const CLASS_KEY: &str = "class";

/// A `committer` node: class identifier, member fields and nested committers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFragment {
    /// Class identifier resolved through the committer registry
    pub class: String,

    /// Member-specific fields
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,

    /// Nested `committer` fragments, in document order
    #[serde(rename = "committer", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfigFragment>,
}

impl ConfigFragment {
    /// Create a fragment with no params and no children
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            params: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style param setter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_param(key, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: ConfigFragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// String param; present-but-not-a-string is a validation error
    pub fn str_param(&self, key: &str) -> Result<Option<&str>, ContractError> {
        match self.params.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ContractError::config_validation(
                format!("{}.{}", self.class, key),
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Nesting depth of this fragment (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((fragment, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(fragment.children.iter().map(|c| (c, depth + 1)));
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let fragment = ConfigFragment::new("root")
            .with_child(ConfigFragment::new("a").with_param("name", "x"))
            .with_child(ConfigFragment::new("b"));

        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["class"], "root");
        assert_eq!(json["committer"][0]["class"], "a");
        assert_eq!(json["committer"][0]["name"], "x");
        assert_eq!(json["committer"][1]["class"], "b");
        assert!(json["committer"][1].get("committer").is_none());
    }

    #[test]
    fn test_deserialize_separates_params_from_children() {
        let fragment: ConfigFragment = serde_json::from_str(
            r#"{"class": "root", "retries": 3, "committer": [{"class": "a"}]}"#,
        )
        .unwrap();

        assert_eq!(fragment.class, "root");
        assert_eq!(fragment.param("retries"), Some(&Value::from(3)));
        assert!(!fragment.params.contains_key(CHILD_KEY));
        assert_eq!(fragment.children.len(), 1);
    }

    #[test]
    fn test_missing_class_is_rejected() {
        let result: Result<ConfigFragment, _> = serde_json::from_str(r#"{"name": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_str_param_type_mismatch() {
        let fragment = ConfigFragment::new("a").with_param("directory", 7);
        assert!(fragment.str_param("directory").is_err());
        assert_eq!(fragment.str_param("missing").unwrap(), None);
    }

    #[test]
    fn test_depth() {
        let leaf = ConfigFragment::new("leaf");
        assert_eq!(leaf.depth(), 1);

        let nested = ConfigFragment::new("root")
            .with_child(ConfigFragment::new("mid").with_child(leaf))
            .with_child(ConfigFragment::new("other"));
        assert_eq!(nested.depth(), 3);
    }
}
