/// Reading and writing single quest and blocked-quest files.
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::core::validation::ValidationErrors;
use crate::schema::blocked::BlockedQuests;
use crate::schema::quest::Quest;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

pub fn parse_quest_from_str(input: &str) -> Result<Quest, ParseError> {
    let raw: serde_json::Value = serde_json::from_str(input)?;
    Ok(Quest::validate(&raw)?)
}

pub fn parse_quest_from_file(path: &Path) -> Result<Quest, ParseError> {
    let contents = std::fs::read_to_string(path)?;
    parse_quest_from_str(&contents)
}

pub fn parse_blocked_quests_from_str(input: &str) -> Result<BlockedQuests, ParseError> {
    let raw: serde_json::Value = serde_json::from_str(input)?;
    Ok(BlockedQuests::validate(&raw)?)
}

pub fn parse_blocked_quests_from_file(path: &Path) -> Result<BlockedQuests, ParseError> {
    let contents = std::fs::read_to_string(path)?;
    parse_blocked_quests_from_str(&contents)
}

/// Like [`parse_quest_from_str`], but flattens every failure into
/// `"path: message"` lines for display.
pub fn safe_parse_quest(input: &str) -> Result<Quest, Vec<String>> {
    match parse_quest_from_str(input) {
        Ok(quest) => Ok(quest),
        Err(ParseError::Invalid(errors)) => Err(errors.messages()),
        Err(other) => Err(vec![other.to_string()]),
    }
}

pub fn quest_to_json(quest: &Quest, pretty: bool) -> Result<String, ParseError> {
    to_json(quest, pretty)
}

pub fn blocked_quests_to_json(blocked: &BlockedQuests, pretty: bool) -> Result<String, ParseError> {
    to_json(blocked, pretty)
}

pub fn quest_to_file(quest: &Quest, path: &Path) -> Result<(), ParseError> {
    std::fs::write(path, quest_to_json(quest, true)?)?;
    Ok(())
}

pub fn blocked_quests_to_file(blocked: &BlockedQuests, path: &Path) -> Result<(), ParseError> {
    std::fs::write(path, blocked_quests_to_json(blocked, true)?)?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, ParseError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_QUEST: &str = r#"{
        "AssociatedNPC": "Armorer",
        "Tier": 3,
        "Title": "Plates",
        "Description": "Bring armor plates",
        "RewardPool": [{ "Fame": 5 }],
        "Conditions": [{
            "Type": "Fetch",
            "SequenceIndex": 0,
            "RequiredItems": [{ "AcceptedItems": ["Plate"], "RequiredNum": 2 }]
        }]
    }"#;

    #[test]
    fn parses_and_normalizes() {
        let quest = parse_quest_from_str(LEGACY_QUEST).unwrap();
        let out = quest_to_json(&quest, false).unwrap();
        assert!(out.contains("\"AssociatedNpc\":\"Armorer\""));
        assert!(!out.contains("AssociatedNPC"));
    }

    #[test]
    fn syntax_errors_are_json_errors() {
        assert!(matches!(parse_quest_from_str("{ nope"), Err(ParseError::Json(_))));
        let lines = safe_parse_quest("{ nope").unwrap_err();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("JSON error"));
    }

    #[test]
    fn safe_parse_lists_issue_paths() {
        let lines = safe_parse_quest(&LEGACY_QUEST.replace("\"Tier\": 3", "\"Tier\": 4")).unwrap_err();
        assert_eq!(lines, vec!["Tier: Invalid literal value, expected 1 | 2 | 3".to_string()]);
    }

    #[test]
    fn blocked_quests_defaults() {
        let blocked = parse_blocked_quests_from_str("{}").unwrap();
        assert_eq!(blocked, BlockedQuests::default());
        let pretty = blocked_quests_to_json(&blocked, true).unwrap();
        assert!(pretty.contains("\"BlockAllDefaultQuests\": false"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_quest_from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
