//! File-backed rule table.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::atomic::write_atomic;
use crate::rule::{Rule, RuleUpdate};

use super::{EngineError, RuleEngine, apply_update};

/// Current rule table format version.
const RULE_TABLE_VERSION: u32 = 1;

/// On-disk rule table.
#[derive(Debug, Serialize, Deserialize)]
struct RuleTable {
    version: u32,
    rules: Vec<Rule>,
}

/// [`RuleEngine`] that keeps the installed rules in a JSON file.
///
/// The file holds the complete dynamic rule set in declarative rule format,
/// for an enforcement engine (a browser extension, a proxy) to load. Each
/// update is a read-modify-write under a lock, committed with an atomic
/// rename, so a rejected or failed update leaves the file untouched.
#[derive(Debug)]
pub struct FileRuleEngine {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileRuleEngine {
    /// Creates an engine backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path to the rule table.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Rule>, EngineError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EngineError::Read(e)),
        };

        let table: RuleTable =
            serde_json::from_str(&content).map_err(|e| EngineError::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            })?;

        if table.version != RULE_TABLE_VERSION {
            return Err(EngineError::Corrupted {
                reason: format!(
                    "Incompatible version: expected {RULE_TABLE_VERSION}, got {}",
                    table.version
                ),
            });
        }

        Ok(table.rules)
    }
}

impl RuleEngine for FileRuleEngine {
    async fn update_rules(&self, update: RuleUpdate) -> Result<(), EngineError> {
        let _guard = self.lock.lock().await;

        let rules = apply_update(self.load()?, update)?;
        let table = RuleTable {
            version: RULE_TABLE_VERSION,
            rules,
        };
        let content = serde_json::to_string_pretty(&table).map_err(EngineError::Serialize)?;

        write_atomic(self.path.clone(), content)
            .await
            .map_err(EngineError::Write)?;

        tracing::debug!(
            "Rule table {} now holds {} rule(s)",
            self.path.display(),
            table.rules.len()
        );
        Ok(())
    }

    async fn installed_rules(&self) -> Result<Vec<Rule>, EngineError> {
        let _guard = self.lock.lock().await;
        self.load()
    }
}
