use serde::Serialize;
use serde_json::Value;

use crate::core::validation::{boolean, string_list, FieldPath, Fields, Report, ValidationErrors};

/// Which built-in quests the game should suppress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockedQuests {
    pub block_all_default_quests: bool,
    pub block_quest_names: Vec<String>,
}

impl BlockedQuests {
    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut report = Report::new();
        let blocked = Self::check(raw, &FieldPath::root(), &mut report);
        report.finish(blocked)
    }

    pub(crate) fn check(value: &Value, path: &FieldPath, report: &mut Report) -> Option<Self> {
        let fields = Fields::open(value, path, report)?;
        let block_all_default_quests = fields.defaulted("BlockAllDefaultQuests", false, report, boolean);
        let block_quest_names = fields.defaulted("BlockQuestNames", Vec::new(), report, |v, p, r| {
            string_list(v, p, r, 0)
        });
        Some(Self {
            block_all_default_quests: block_all_default_quests?,
            block_quest_names: block_quest_names?,
        })
    }

    pub fn is_blocked(&self, name: &str) -> bool {
        self.block_quest_names.iter().any(|n| n == name)
    }

    /// Add `name` unless already listed. Returns whether it was added.
    pub fn block(&mut self, name: &str) -> bool {
        if self.is_blocked(name) {
            return false;
        }
        self.block_quest_names.push(name.to_string());
        true
    }

    /// Remove every occurrence of `name`. Returns whether anything was removed.
    pub fn unblock(&mut self, name: &str) -> bool {
        let before = self.block_quest_names.len();
        self.block_quest_names.retain(|n| n != name);
        self.block_quest_names.len() != before
    }
}
