//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> committer 树 -> 分发 -> 保存 的端到端测试

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ConfigFragment, CHILD_KEY, CLASS_KEY};

    /// 文档形状快照：class + 成员字段 + 嵌套 committer
    #[test]
    fn test_document_shape_snapshot() {
        let root = ConfigFragment::new("dispatcher::CompositeDispatcher").with_child(
            ConfigFragment::new("dispatcher::FileSystemCommitter")
                .with_param("directory", "/srv/out"),
        );

        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                CLASS_KEY: "dispatcher::CompositeDispatcher",
                CHILD_KEY: [
                    {CLASS_KEY: "dispatcher::FileSystemCommitter", "directory": "/srv/out"}
                ]
            })
        );
    }

    #[test]
    fn test_toml_and_json_describe_the_same_tree() {
        let toml = r#"
class = "dispatcher::CompositeDispatcher"

[[committer]]
class = "dispatcher::LogCommitter"
name = "audit"
"#;
        let json = r#"{
            "class": "dispatcher::CompositeDispatcher",
            "committer": [{"class": "dispatcher::LogCommitter", "name": "audit"}]
        }"#;

        let from_toml = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        let from_json = ConfigLoader::load_from_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(from_toml, from_json);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    use committer_factory::CommitterRegistry;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        shared, Bytes, Committer, ConfigFragment, ConfigRoundTrip, ContractError, LoadContext,
        Metadata, SaveContext, TracingDiagnostics,
    };
    use dispatcher::{CompositeDispatcher, COMPOSITE_CLASS, FILESYSTEM_CLASS, LOG_CLASS};

    /// 记录调用顺序的外部 committer，经注册表按 class 实例化
    struct JournalCommitter {
        name: String,
        journal: Rc<RefCell<Vec<String>>>,
        fail_commit: bool,
    }

    const JOURNAL_CLASS: &str = "acme::JournalCommitter";

    impl Committer for JournalCommitter {
        fn queue_add(
            &mut self,
            reference: &str,
            _content: &Bytes,
            _metadata: &Metadata,
        ) -> Result<(), ContractError> {
            self.journal
                .borrow_mut()
                .push(format!("{}:add:{}", self.name, reference));
            Ok(())
        }

        fn queue_remove(
            &mut self,
            reference: &str,
            _content: &Bytes,
            _metadata: &Metadata,
        ) -> Result<(), ContractError> {
            self.journal
                .borrow_mut()
                .push(format!("{}:remove:{}", self.name, reference));
            Ok(())
        }

        fn commit(&mut self) -> Result<(), ContractError> {
            if self.fail_commit {
                return Err(ContractError::commit_failed(&self.name, "backend offline"));
            }
            self.journal.borrow_mut().push(format!("{}:commit", self.name));
            Ok(())
        }

        fn label(&self) -> &str {
            &self.name
        }

        fn as_round_trip(&self) -> Option<&dyn ConfigRoundTrip> {
            Some(self)
        }

        fn as_round_trip_mut(&mut self) -> Option<&mut dyn ConfigRoundTrip> {
            Some(self)
        }
    }

    impl ConfigRoundTrip for JournalCommitter {
        fn class_name(&self) -> &str {
            JOURNAL_CLASS
        }

        fn load_from_config(
            &mut self,
            fragment: &ConfigFragment,
            _ctx: &LoadContext<'_>,
        ) -> Result<(), ContractError> {
            if let Some(name) = fragment.str_param("name")? {
                self.name = name.to_string();
            }
            self.fail_commit = fragment
                .param("fail_commit")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Ok(())
        }

        fn save_to_config(&self, _ctx: &SaveContext<'_>) -> Result<ConfigFragment, ContractError> {
            let mut fragment = ConfigFragment::new(JOURNAL_CLASS).with_param("name", self.name.as_str());
            if self.fail_commit {
                fragment.set_param("fail_commit", true);
            }
            Ok(fragment)
        }
    }

    fn registry_with_journal(journal: &Rc<RefCell<Vec<String>>>) -> CommitterRegistry {
        let mut registry = CommitterRegistry::with_builtins();
        let journal = Rc::clone(journal);
        registry
            .register(JOURNAL_CLASS, move || {
                Ok(shared(JournalCommitter {
                    name: "journal".to_string(),
                    journal: Rc::clone(&journal),
                    fail_commit: false,
                }))
            })
            .unwrap();
        registry
    }

    fn count_files(dir: &Path, suffix: &str) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().to_string_lossy().ends_with(suffix))
            .count()
    }

    /// End-to-end: TOML 配置 -> 注册表实例化 -> 分发 -> FileSystemCommitter 落盘
    #[test]
    fn test_e2e_config_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let config = format!(
            r#"
class = "{COMPOSITE_CLASS}"

[[committer]]
class = "{JOURNAL_CLASS}"
name = "first"

[[committer]]
class = "{COMPOSITE_CLASS}"

[[committer.committer]]
class = "{FILESYSTEM_CLASS}"
directory = {output:?}

[[committer.committer]]
class = "{JOURNAL_CLASS}"
name = "nested"
"#
        );

        let journal = Rc::new(RefCell::new(Vec::new()));
        let registry = registry_with_journal(&journal);
        let root = ConfigLoader::load_from_str(&config, ConfigFormat::Toml).unwrap();
        let mut dispatcher = CompositeDispatcher::from_config(&root, &registry).unwrap();
        assert_eq!(dispatcher.len(), 2);

        let mut metadata = Metadata::new();
        metadata.add("title", "Quarterly report");
        dispatcher
            .queue_add("doc-1", &Bytes::from_static(b"report body"), &metadata)
            .unwrap();
        dispatcher
            .queue_remove("doc-0", &Bytes::new(), &Metadata::new())
            .unwrap();
        dispatcher.commit().unwrap();

        assert_eq!(
            *journal.borrow(),
            vec![
                "first:add:doc-1",
                "nested:add:doc-1",
                "first:remove:doc-0",
                "nested:remove:doc-0",
                "first:commit",
                "nested:commit",
            ]
        );
        assert_eq!(count_files(&output.join("add"), ".content"), 1);
        assert_eq!(count_files(&output.join("remove"), ".ref"), 1);

        let snapshot = dispatcher.metrics();
        assert_eq!(snapshot.add_count, 2);
        assert_eq!(snapshot.commit_count, 2);
    }

    /// 加载 -> 保存 -> 再加载，配置树不变
    #[test]
    fn test_e2e_round_trip_is_lossless() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let registry = registry_with_journal(&journal);
        let root = ConfigFragment::new(COMPOSITE_CLASS)
            .with_child(ConfigFragment::new(LOG_CLASS).with_param("name", "audit"))
            .with_child(
                ConfigFragment::new(COMPOSITE_CLASS).with_child(
                    ConfigFragment::new(JOURNAL_CLASS)
                        .with_param("name", "flaky")
                        .with_param("fail_commit", true),
                ),
            )
            .with_child(ConfigFragment::new(FILESYSTEM_CLASS).with_param("directory", "/srv/out"));

        let dispatcher = CompositeDispatcher::from_config(&root, &registry).unwrap();

        let mut toml = Vec::new();
        dispatcher
            .save_to_writer(&mut toml, ConfigFormat::Toml, &TracingDiagnostics)
            .unwrap();

        let mut reloaded = CompositeDispatcher::new();
        reloaded
            .load_from_reader(toml.as_slice(), ConfigFormat::Toml, &registry)
            .unwrap();

        let saved = reloaded
            .save_to_config(&SaveContext::new(&TracingDiagnostics))
            .unwrap();
        assert_eq!(saved, root);
    }

    /// 第一个失败中止本次调用：后续成员不会被调用
    #[test]
    fn test_e2e_failed_commit_stops_later_members() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let registry = registry_with_journal(&journal);
        let root = ConfigFragment::new(COMPOSITE_CLASS)
            .with_child(ConfigFragment::new(JOURNAL_CLASS).with_param("name", "a"))
            .with_child(
                ConfigFragment::new(JOURNAL_CLASS)
                    .with_param("name", "b")
                    .with_param("fail_commit", true),
            )
            .with_child(ConfigFragment::new(JOURNAL_CLASS).with_param("name", "c"));

        let mut dispatcher = CompositeDispatcher::from_config(&root, &registry).unwrap();
        let err = dispatcher.commit().unwrap_err();

        assert!(matches!(err, ContractError::CommitFailed { ref committer, .. } if committer == "b"));
        assert_eq!(*journal.borrow(), vec!["a:commit"]);
        assert_eq!(dispatcher.metrics().failure_count, 1);
    }

    /// 未注册的 class：加载失败，之前的成员已加入
    #[test]
    fn test_e2e_unknown_class_leaves_partial_tree() {
        let registry = CommitterRegistry::with_builtins();
        let root = ConfigFragment::new(COMPOSITE_CLASS)
            .with_child(ConfigFragment::new(LOG_CLASS))
            .with_child(ConfigFragment::new("acme::Unregistered"))
            .with_child(ConfigFragment::new(LOG_CLASS));

        let mut dispatcher = CompositeDispatcher::new();
        let err = dispatcher
            .load_from_config(&root, &LoadContext::new(&registry))
            .unwrap_err();

        assert!(matches!(err, ContractError::UnknownClass { .. }));
        assert_eq!(dispatcher.len(), 1);
    }
}
