/// Quest collection: custom quests plus the blocked-quest list, persisted
/// under a fixed folder layout.
///
/// ```text
/// <base>/Blocked/BlockedQuests.json
/// <base>/Override/<QuestName>.json
/// <base>/QuestList/CustomQuestList.json
/// ```
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::validation::{Issue, ValidationErrors};
use crate::schema::blocked::BlockedQuests;
use crate::schema::quest::Quest;

pub const BLOCKED_DIR: &str = "Blocked";
pub const OVERRIDE_DIR: &str = "Override";
pub const QUEST_LIST_DIR: &str = "QuestList";
pub const BLOCKED_FILE: &str = "BlockedQuests.json";
pub const QUEST_LIST_FILE: &str = "CustomQuestList.json";

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("invalid quest \"{name}\": {errors}")]
    InvalidQuest {
        name: String,
        errors: ValidationErrors,
    },
    #[error("invalid blocked quests: {0}")]
    InvalidBlockedQuests(ValidationErrors),
    #[error("invalid quest name \"{0}\": names must be non-empty and free of path separators")]
    InvalidName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    pub base_path: PathBuf,
    /// Re-validate typed quests handed to [`QuestCollection::add_quest`].
    pub validate_on_import: bool,
}

impl CollectionOptions {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            validate_on_import: true,
        }
    }

    pub fn validate_on_import(mut self, validate: bool) -> Self {
        self.validate_on_import = validate;
        self
    }
}

/// Quest that failed a [`QuestCollection::validate_all_quests`] audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidQuest {
    pub name: String,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestAudit {
    pub valid: Vec<String>,
    pub invalid: Vec<InvalidQuest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    pub total_quests: usize,
    pub blocked_quest_names: usize,
    pub block_all_default: bool,
}

/// What an import pass did. Skipped files are reported, never fatal.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: Vec<String>,
    pub skipped: Vec<(PathBuf, String)>,
    pub blocked_loaded: bool,
}

#[derive(Debug, Clone)]
pub struct QuestCollection {
    options: CollectionOptions,
    quests: FxHashMap<String, Quest>,
    blocked: BlockedQuests,
}

impl QuestCollection {
    pub fn new(options: CollectionOptions) -> Self {
        Self {
            options,
            quests: FxHashMap::default(),
            blocked: BlockedQuests::default(),
        }
    }

    /// Collection rooted at `base_path` with default options.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self::new(CollectionOptions::new(base_path))
    }

    pub fn base_path(&self) -> &Path {
        &self.options.base_path
    }

    // Quests

    /// Insert or replace `name`. Nothing changes if validation fails.
    pub fn add_quest(&mut self, name: &str, quest: Quest) -> Result<(), CollectionError> {
        check_name(name)?;
        let quest = if self.options.validate_on_import {
            quest
                .revalidate()
                .map_err(|errors| CollectionError::InvalidQuest {
                    name: name.to_string(),
                    errors,
                })?
        } else {
            quest
        };
        self.quests.insert(name.to_string(), quest);
        Ok(())
    }

    /// Validate raw JSON and insert it under `name`.
    pub fn add_quest_value(&mut self, name: &str, raw: &Value) -> Result<(), CollectionError> {
        check_name(name)?;
        let quest = Quest::validate(raw).map_err(|errors| CollectionError::InvalidQuest {
            name: name.to_string(),
            errors,
        })?;
        self.quests.insert(name.to_string(), quest);
        Ok(())
    }

    pub fn remove_quest(&mut self, name: &str) -> bool {
        self.quests.remove(name).is_some()
    }

    pub fn get_quest(&self, name: &str) -> Option<&Quest> {
        self.quests.get(name)
    }

    pub fn quests(&self) -> impl Iterator<Item = (&str, &Quest)> {
        self.quests.iter().map(|(name, quest)| (name.as_str(), quest))
    }

    /// Held quest names, sorted.
    pub fn quest_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.quests.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    // Blocked quests

    /// Replace the blocked-quest list. The held value is kept on failure.
    pub fn set_blocked_quests(&mut self, raw: &Value) -> Result<(), CollectionError> {
        self.blocked = BlockedQuests::validate(raw).map_err(CollectionError::InvalidBlockedQuests)?;
        Ok(())
    }

    pub fn blocked_quests(&self) -> &BlockedQuests {
        &self.blocked
    }

    pub fn block_quest(&mut self, name: &str) -> bool {
        self.blocked.block(name)
    }

    pub fn unblock_quest(&mut self, name: &str) -> bool {
        self.blocked.unblock(name)
    }

    pub fn block_all_default_quests(&mut self, block: bool) {
        self.blocked.block_all_default_quests = block;
    }

    // Files

    pub fn create_folder_structure(&self) -> Result<(), CollectionError> {
        for dir in [BLOCKED_DIR, OVERRIDE_DIR, QUEST_LIST_DIR] {
            std::fs::create_dir_all(self.base_path().join(dir))?;
        }
        Ok(())
    }

    /// Write every file of the layout. Existing files with the same names
    /// are overwritten; nothing is deleted.
    pub fn export_to_files(&self) -> Result<(), CollectionError> {
        self.create_folder_structure()?;
        let base = self.base_path();

        let blocked = serde_json::to_string_pretty(&self.blocked)?;
        std::fs::write(base.join(BLOCKED_DIR).join(BLOCKED_FILE), blocked)?;

        let names = self.quest_names();
        for name in &names {
            if let Some(quest) = self.quests.get(name) {
                let path = base.join(OVERRIDE_DIR).join(format!("{}.json", name));
                std::fs::write(path, serde_json::to_string_pretty(quest)?)?;
            }
        }

        let list = serde_json::to_string_pretty(&names)?;
        std::fs::write(base.join(QUEST_LIST_DIR).join(QUEST_LIST_FILE), list)?;

        info!("Exported {} quests to {}", names.len(), base.display());
        Ok(())
    }

    /// Load the blocked list and every `Override/*.json` quest. Bad files
    /// are logged and skipped; only directory-level IO errors propagate.
    pub fn import_from_files(&mut self) -> Result<ImportSummary, CollectionError> {
        let mut summary = ImportSummary::default();
        let base = self.base_path().to_path_buf();

        let blocked_path = base.join(BLOCKED_DIR).join(BLOCKED_FILE);
        if blocked_path.exists() {
            match read_json(&blocked_path).and_then(|raw| self.set_blocked_quests(&raw)) {
                Ok(()) => summary.blocked_loaded = true,
                Err(e) => {
                    warn!("Could not parse blocked quests {}: {}", blocked_path.display(), e);
                    summary.skipped.push((blocked_path, e.to_string()));
                }
            }
        }

        let override_dir = base.join(OVERRIDE_DIR);
        if override_dir.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&override_dir)?
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json"))
                .collect();
            files.sort();

            for path in files {
                let name = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(name) => name.to_string(),
                    None => {
                        warn!("Skipping quest file with a non UTF-8 name: {}", path.display());
                        summary.skipped.push((path, "file name is not valid UTF-8".to_string()));
                        continue;
                    }
                };
                match read_json(&path).and_then(|raw| self.add_quest_value(&name, &raw)) {
                    Ok(()) => summary.imported.push(name),
                    Err(e) => {
                        warn!("Could not parse quest file {}: {}", path.display(), e);
                        summary.skipped.push((path, e.to_string()));
                    }
                }
            }
        }

        info!(
            "Imported {} quests from {} ({} skipped)",
            summary.imported.len(),
            base.display(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    // Reports

    /// Re-check every held quest without touching the store.
    pub fn validate_all_quests(&self) -> QuestAudit {
        let mut audit = QuestAudit::default();
        for name in self.quest_names() {
            let Some(quest) = self.quests.get(&name) else {
                continue;
            };
            match quest.revalidate() {
                Ok(_) => audit.valid.push(name),
                Err(errors) => audit.invalid.push(InvalidQuest {
                    name,
                    issues: errors.into_issues(),
                }),
            }
        }
        audit
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats {
            total_quests: self.quests.len(),
            blocked_quest_names: self.blocked.block_quest_names.len(),
            block_all_default: self.blocked.block_all_default_quests,
        }
    }
}

fn check_name(name: &str) -> Result<(), CollectionError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(CollectionError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, CollectionError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quest_json(title: &str) -> Value {
        json!({
            "AssociatedNpc": "Mechanic",
            "Tier": 2,
            "Title": title,
            "Description": "Testing",
            "RewardPool": [{ "CurrencyNormal": 200 }],
            "Conditions": [{
                "Type": "Fetch",
                "SequenceIndex": 0,
                "RequiredItems": [{ "AcceptedItems": ["Wrench"], "RequiredNum": 1 }]
            }]
        })
    }

    #[test]
    fn last_write_wins() {
        let mut collection = QuestCollection::at("unused");
        collection.add_quest_value("Q", &quest_json("First")).unwrap();
        collection.add_quest_value("Q", &quest_json("Second")).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get_quest("Q").unwrap().title, "Second");
    }

    #[test]
    fn invalid_quest_leaves_store_untouched() {
        let mut collection = QuestCollection::at("unused");
        collection.add_quest_value("Q", &quest_json("Kept")).unwrap();
        let mut bad = quest_json("Broken");
        bad["Tier"] = json!(9);
        let err = collection.add_quest_value("Q", &bad).unwrap_err();
        assert!(matches!(err, CollectionError::InvalidQuest { ref name, .. } if name == "Q"));
        assert_eq!(collection.get_quest("Q").unwrap().title, "Kept");
    }

    #[test]
    fn typed_quest_revalidated_when_enabled() {
        let mut quest = Quest::validate(&quest_json("Ok")).unwrap();
        quest.title.clear();

        let mut strict = QuestCollection::at("unused");
        assert!(strict.add_quest("Q", quest.clone()).is_err());
        assert!(strict.is_empty());

        let mut lax = QuestCollection::new(CollectionOptions::new("unused").validate_on_import(false));
        lax.add_quest("Q", quest).unwrap();
        assert_eq!(lax.len(), 1);
        let audit = lax.validate_all_quests();
        assert!(audit.valid.is_empty());
        assert_eq!(audit.invalid[0].name, "Q");
        assert_eq!(audit.invalid[0].issues[0].path.to_string(), "Title");
    }

    #[test]
    fn remove_reports_whether_present() {
        let mut collection = QuestCollection::at("unused");
        collection.add_quest_value("Q", &quest_json("T")).unwrap();
        assert!(collection.remove_quest("Q"));
        assert!(!collection.remove_quest("Q"));
    }

    #[test]
    fn rejects_path_like_names() {
        let mut collection = QuestCollection::at("unused");
        for name in ["", "../escape", "a/b", "..", "c\\d"] {
            assert!(matches!(
                collection.add_quest_value(name, &quest_json("T")),
                Err(CollectionError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn failed_blocked_update_keeps_previous_value() {
        let mut collection = QuestCollection::at("unused");
        collection
            .set_blocked_quests(&json!({ "BlockAllDefaultQuests": true, "BlockQuestNames": ["A"] }))
            .unwrap();
        let err = collection
            .set_blocked_quests(&json!({ "BlockQuestNames": "A" }))
            .unwrap_err();
        assert!(matches!(err, CollectionError::InvalidBlockedQuests(_)));
        assert!(collection.blocked_quests().block_all_default_quests);
        assert_eq!(collection.blocked_quests().block_quest_names, vec!["A".to_string()]);
    }

    #[test]
    fn stats_reflect_state() {
        let mut collection = QuestCollection::at("unused");
        collection.add_quest_value("Q1", &quest_json("T")).unwrap();
        assert!(collection.block_quest("Default1"));
        assert!(!collection.block_quest("Default1"));
        assert!(collection.block_quest("Default2"));
        assert!(collection.unblock_quest("Default2"));
        assert!(!collection.unblock_quest("Missing"));
        collection.block_all_default_quests(true);
        assert_eq!(
            collection.stats(),
            CollectionStats {
                total_quests: 1,
                blocked_quest_names: 1,
                block_all_default: true,
            }
        );
    }
}
