/// File linter: checks quest-folder JSON against the schema implied by
/// its location, or against one chosen explicitly.
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::collection::{BLOCKED_DIR, QUEST_LIST_DIR};
use crate::core::validation::{string_list, FieldPath, Report, ValidationErrors};
use crate::schema::blocked::BlockedQuests;
use crate::schema::quest::Quest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Quest,
    BlockedQuests,
    QuestList,
}

impl SchemaKind {
    pub const ALL: &'static [SchemaKind] = &[Self::Quest, Self::BlockedQuests, Self::QuestList];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quest => "quest",
            Self::BlockedQuests => "blocked-quests",
            Self::QuestList => "quest-list",
        }
    }

    /// Validate an already-parsed document against this schema.
    pub fn check(self, raw: &Value) -> Result<(), ValidationErrors> {
        match self {
            Self::Quest => Quest::validate(raw).map(drop),
            Self::BlockedQuests => BlockedQuests::validate(raw).map(drop),
            Self::QuestList => {
                let mut report = Report::new();
                let names = string_list(raw, &FieldPath::root(), &mut report, 0);
                report.finish(names).map(drop)
            }
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown schema '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub schema: SchemaKind,
    /// Empty when the file is valid.
    pub errors: Vec<String>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Schema for `path` given its position under `root`. Only the first
/// component below the root matters.
pub fn schema_for(root: &Path, path: &Path) -> SchemaKind {
    let first = path
        .strip_prefix(root)
        .ok()
        .and_then(|rel| rel.components().next())
        .and_then(|c| c.as_os_str().to_str());
    match first {
        Some(BLOCKED_DIR) => SchemaKind::BlockedQuests,
        Some(QUEST_LIST_DIR) => SchemaKind::QuestList,
        _ => SchemaKind::Quest,
    }
}

pub fn lint_file(path: &Path, schema: SchemaKind) -> FileReport {
    let errors = match std::fs::read_to_string(path) {
        Err(e) => vec![format!("IO error: {}", e)],
        Ok(contents) => match serde_json::from_str::<Value>(&contents) {
            Err(e) => vec![format!("JSON error: {}", e)],
            Ok(raw) => match schema.check(&raw) {
                Ok(()) => Vec::new(),
                Err(errors) => errors.messages(),
            },
        },
    };
    FileReport {
        path: path.to_path_buf(),
        schema,
        errors,
    }
}

/// Lint every `*.json` file below `root`, in path order.
pub fn lint_directory(root: &Path) -> std::io::Result<Vec<FileReport>> {
    let mut files = Vec::new();
    collect_json(root, &mut files)?;
    files.sort();
    Ok(files
        .iter()
        .map(|path| lint_file(path, schema_for(root, path)))
        .collect())
}

fn collect_json(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }
    Ok(())
}
