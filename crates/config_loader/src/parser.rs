//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use std::path::Path;

use contracts::{ConfigFragment, ContractError};
use serde_json::Value;

/// Field under which the `toml` deserializer hands datetimes to untyped values
const TOML_DATETIME_FIELD: &str = "$__toml_private_datetime";

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 从文件路径推断格式
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        Self::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<ConfigFragment, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<ConfigFragment, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<ConfigFragment, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

/// 根据格式序列化配置
pub fn render(fragment: &ConfigFragment, format: ConfigFormat) -> Result<String, ContractError> {
    match format {
        ConfigFormat::Toml => {
            let document = to_toml_value(&serde_json::to_value(fragment).map_err(|e| {
                ContractError::config_serialize(format!("TOML serialize error: {e}"))
            })?)?;
            toml::to_string_pretty(&document)
                .map_err(|e| ContractError::config_serialize(format!("TOML serialize error: {e}")))
        }
        ConfigFormat::Json => serde_json::to_string_pretty(fragment)
            .map_err(|e| ContractError::config_serialize(format!("JSON serialize error: {e}"))),
    }
}

/// Convert a parameter tree to a TOML value, restoring datetimes read from TOML
fn to_toml_value(value: &Value) -> Result<toml::Value, ContractError> {
    Ok(match value {
        Value::Null => {
            return Err(ContractError::config_serialize(
                "TOML serialize error: null values cannot be written to TOML",
            ))
        }
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => toml::Value::Integer(i),
            (None, Some(f)) => toml::Value::Float(f),
            (None, None) => {
                return Err(ContractError::config_serialize(format!(
                    "TOML serialize error: number {n} out of range"
                )))
            }
        },
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(items) => toml::Value::Array(
            items
                .iter()
                .map(to_toml_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(map) => {
            if let (1, Some(Value::String(raw))) = (map.len(), map.get(TOML_DATETIME_FIELD)) {
                let datetime = raw.parse::<toml::value::Datetime>().map_err(|e| {
                    ContractError::config_serialize(format!("invalid datetime '{raw}': {e}"))
                })?;
                return Ok(toml::Value::Datetime(datetime));
            }
            let mut table = toml::Table::new();
            for (key, item) in map {
                table.insert(key.clone(), to_toml_value(item)?);
            }
            toml::Value::Table(table)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_nested() {
        let content = r#"
class = "dispatcher::CompositeDispatcher"

[[committer]]
class = "dispatcher::LogCommitter"
name = "audit"

[[committer]]
class = "dispatcher::CompositeDispatcher"

[[committer.committer]]
class = "dispatcher::NilCommitter"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let root = result.unwrap();
        assert_eq!(root.class, "dispatcher::CompositeDispatcher");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].str_param("name").unwrap(), Some("audit"));
        assert_eq!(root.children[1].children[0].class, "dispatcher::NilCommitter");
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "class": "dispatcher::CompositeDispatcher",
            "committer": [
                { "class": "dispatcher::FileSystemCommitter", "directory": "/tmp/out" }
            ]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let root = result.unwrap();
        assert_eq!(
            root.children[0].str_param("directory").unwrap(),
            Some("/tmp/out")
        );
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_child_without_class_is_malformed() {
        let content = r#"
class = "root"

[[committer]]
name = "orphan"
"#;
        let err = parse_toml(content).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_render_toml_keeps_child_order() {
        let fragment = ConfigFragment::new("root")
            .with_child(ConfigFragment::new("first").with_param("name", "a"))
            .with_child(ConfigFragment::new("second"));

        let rendered = render(&fragment, ConfigFormat::Toml).unwrap();
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        assert!(first < second);

        let reparsed = parse_toml(&rendered).unwrap();
        assert_eq!(reparsed, fragment);
    }

    #[test]
    fn test_toml_datetime_param_round_trips() {
        let content = "class = \"x\"\nsince = 1979-05-27T07:32:00Z\n";
        let fragment = parse_toml(content).unwrap();

        let rendered = render(&fragment, ConfigFormat::Toml).unwrap();
        assert!(
            rendered.contains("since = 1979-05-27T07:32:00Z"),
            "rendered: {rendered}"
        );
        assert!(!rendered.contains(TOML_DATETIME_FIELD));
        assert_eq!(parse_toml(&rendered).unwrap(), fragment);

        // survives a pass through JSON as well
        let json = render(&fragment, ConfigFormat::Json).unwrap();
        let from_json = parse_json(&json).unwrap();
        assert_eq!(
            render(&from_json, ConfigFormat::Toml).unwrap(),
            rendered
        );
    }

    #[test]
    fn test_render_toml_rejects_null_param() {
        let fragment = ConfigFragment::new("x").with_param("gone", Value::Null);
        let err = render(&fragment, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ContractError::ConfigSerialize { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("xml"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("committers.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("committers")).is_err());
    }
}
