//! Tests for the rule table and update semantics.

use tempfile::TempDir;

use super::{EngineError, FileRuleEngine, RuleEngine, apply_update};
use crate::rule::{RULE_ID, Rule, RuleDirective, RuleUpdate, build};
use crate::settings::Settings;

fn rule_for(address: &str) -> Rule {
    match build(&Settings::default(), address).unwrap() {
        RuleDirective::Install { rule, .. } => rule,
        RuleDirective::Remove => unreachable!("default settings install a rule"),
    }
}

fn with_id(id: u32) -> Rule {
    Rule {
        id,
        ..rule_for("1.1.1.1")
    }
}

fn engine_in(dir: &TempDir) -> FileRuleEngine {
    FileRuleEngine::new(dir.path().join("rules.json"))
}

mod apply {
    use super::*;

    #[test]
    fn removes_then_adds() {
        let update = RuleUpdate {
            remove_rule_ids: vec![RULE_ID],
            add_rules: vec![rule_for("2.2.2.2")],
        };

        let rules = apply_update(vec![rule_for("1.1.1.1")], update).unwrap();

        assert_eq!(rules, vec![rule_for("2.2.2.2")]);
    }

    #[test]
    fn removing_a_missing_id_is_fine() {
        let update = RuleUpdate {
            remove_rule_ids: vec![7],
            add_rules: vec![],
        };

        assert!(apply_update(vec![], update).unwrap().is_empty());
    }

    #[test]
    fn adding_an_installed_id_is_rejected() {
        let update = RuleUpdate {
            remove_rule_ids: vec![],
            add_rules: vec![with_id(1)],
        };

        let result = apply_update(vec![with_id(1)], update);
        assert!(matches!(result, Err(EngineError::DuplicateRuleId(1))));
    }

    #[test]
    fn adding_the_same_id_twice_is_rejected() {
        let update = RuleUpdate {
            remove_rule_ids: vec![],
            add_rules: vec![with_id(3), with_id(3)],
        };

        assert!(matches!(
            apply_update(vec![], update),
            Err(EngineError::DuplicateRuleId(3))
        ));
    }

    #[test]
    fn other_rules_are_left_alone() {
        let update = RuleUpdate {
            remove_rule_ids: vec![1],
            add_rules: vec![],
        };

        let rules = apply_update(vec![with_id(1), with_id(2)], update).unwrap();
        assert_eq!(rules, vec![with_id(2)]);
    }
}

mod file_rule_engine {
    use super::*;

    #[tokio::test]
    async fn missing_table_means_no_rules() {
        let dir = TempDir::new().unwrap();
        let engine = engine_in(&dir);

        assert!(engine.installed_rules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_installs_replace_the_single_rule() {
        let dir = TempDir::new().unwrap();
        let engine = engine_in(&dir);

        for address in ["1.1.1.1", "2.2.2.2", "3.3.3.3"] {
            let directive = build(&Settings::default(), address).unwrap();
            engine.update_rules(directive.into_update()).await.unwrap();
        }

        assert_eq!(engine.installed_rules().await.unwrap(), vec![rule_for("3.3.3.3")]);
    }

    #[tokio::test]
    async fn remove_directive_empties_the_table() {
        let dir = TempDir::new().unwrap();
        let engine = engine_in(&dir);
        let install = build(&Settings::default(), "1.1.1.1").unwrap();
        engine.update_rules(install.into_update()).await.unwrap();

        engine
            .update_rules(RuleDirective::Remove.into_update())
            .await
            .unwrap();

        assert!(engine.installed_rules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_update_leaves_table_untouched() {
        let dir = TempDir::new().unwrap();
        let engine = engine_in(&dir);
        let install = build(&Settings::default(), "1.1.1.1").unwrap();
        engine.update_rules(install.into_update()).await.unwrap();
        let before = std::fs::read_to_string(engine.path()).unwrap();

        let duplicate = RuleUpdate {
            remove_rule_ids: vec![],
            add_rules: vec![rule_for("9.9.9.9")],
        };
        let result = engine.update_rules(duplicate).await;

        assert!(matches!(result, Err(EngineError::DuplicateRuleId(RULE_ID))));
        assert_eq!(std::fs::read_to_string(engine.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn table_is_stored_in_declarative_format() {
        let dir = TempDir::new().unwrap();
        let engine = engine_in(&dir);
        let install = build(&Settings::default(), "1.1.1.1").unwrap();
        engine.update_rules(install.into_update()).await.unwrap();

        let content = std::fs::read_to_string(engine.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["rules"][0]["id"], 1);
        assert_eq!(value["rules"][0]["action"]["type"], "modifyHeaders");
    }

    #[tokio::test]
    async fn corrupted_table_is_an_error() {
        let dir = TempDir::new().unwrap();
        let engine = engine_in(&dir);
        std::fs::write(engine.path(), "[[[").unwrap();

        let result = engine.installed_rules().await;
        assert!(matches!(result, Err(EngineError::Corrupted { .. })));

        let update = RuleDirective::Remove.into_update();
        assert!(engine.update_rules(update).await.is_err());
    }
}
