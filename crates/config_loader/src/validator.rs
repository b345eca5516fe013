//! 配置校验模块
//!
//! 校验规则：
//! - 每个 committer 节点的 class 非空
//! - class 不含空白字符
//! - 参数名不与保留键 (class / committer) 冲突

use contracts::{ConfigFragment, ContractError, CHILD_KEY, CLASS_KEY};

/// 校验 ConfigFragment 树
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(root: &ConfigFragment) -> Result<(), ContractError> {
    let mut pending = vec![(root, CHILD_KEY.to_string())];
    while let Some((fragment, path)) = pending.pop() {
        validate_class(fragment, &path)?;
        validate_param_keys(fragment, &path)?;

        for (idx, child) in fragment.children.iter().enumerate().rev() {
            pending.push((child, format!("{path}.{CHILD_KEY}[{idx}]")));
        }
    }
    Ok(())
}

/// 校验 class 标识
fn validate_class(fragment: &ConfigFragment, path: &str) -> Result<(), ContractError> {
    if fragment.class.trim().is_empty() {
        return Err(ContractError::config_validation(
            format!("{path}.{CLASS_KEY}"),
            "class cannot be empty",
        ));
    }
    if fragment.class.chars().any(char::is_whitespace) {
        return Err(ContractError::config_validation(
            format!("{path}.{CLASS_KEY}"),
            format!("class '{}' must not contain whitespace", fragment.class),
        ));
    }
    Ok(())
}

/// 校验参数名
fn validate_param_keys(fragment: &ConfigFragment, path: &str) -> Result<(), ContractError> {
    for key in [CLASS_KEY, CHILD_KEY] {
        if fragment.params.contains_key(key) {
            return Err(ContractError::config_validation(
                format!("{path}.{key}"),
                "reserved key used as a committer param",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tree_passes() {
        let root = ConfigFragment::new("root")
            .with_child(ConfigFragment::new("a").with_param("name", "x"))
            .with_child(ConfigFragment::new("b").with_child(ConfigFragment::new("c")));
        assert!(validate(&root).is_ok());
    }

    #[test]
    fn test_empty_nested_class_reports_path() {
        let root = ConfigFragment::new("root")
            .with_child(ConfigFragment::new("a"))
            .with_child(ConfigFragment::new("b").with_child(ConfigFragment::new("  ")));

        let err = validate(&root).unwrap_err();
        match err {
            ContractError::ConfigValidation { field, .. } => {
                assert_eq!(field, "committer.committer[1].committer[0].class");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whitespace_in_class() {
        let root = ConfigFragment::new("my committer");
        assert!(validate(&root).is_err());
    }

    #[test]
    fn test_reserved_param_key() {
        let mut root = ConfigFragment::new("root");
        root.set_param(CLASS_KEY, "shadow");
        let err = validate(&root).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}
