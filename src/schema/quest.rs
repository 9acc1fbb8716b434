use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::condition::Condition;
use super::enums::Npc;
use super::reward::Reward;
use crate::core::validation::{
    array, integer, non_empty_string, positive_number, variant, FieldPath, Fields, Report,
    ValidationErrors,
};

/// Field name for the quest-giver.
pub const NPC_FIELD: &str = "AssociatedNpc";
/// Older spelling of [`NPC_FIELD`], still accepted on input.
pub const LEGACY_NPC_FIELD: &str = "AssociatedNPC";

/// Difficulty bucket of a quest. Written as the bare integer 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuestTier {
    One = 1,
    Two = 2,
    Three = 3,
}

impl QuestTier {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }
}

impl fmt::Display for QuestTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for QuestTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// A validated quest. The NPC is always held under its canonical name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quest {
    pub associated_npc: Npc,
    pub tier: QuestTier,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_hours: Option<f64>,
    pub reward_pool: Vec<Reward>,
    pub conditions: Vec<Condition>,
}

impl Quest {
    /// Validate an untyped quest, accepting either NPC field spelling.
    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut report = Report::new();
        let quest = Self::check(raw, &FieldPath::root(), &mut report);
        report.finish(quest)
    }

    /// Re-run validation over this value's own JSON form.
    pub fn revalidate(&self) -> Result<Self, ValidationErrors> {
        Self::validate(&self.to_value())
    }

    pub fn to_value(&self) -> Value {
        // Plain data with string keys; serialization can't fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Conditions ordered by their sequence index, ties keeping input order.
    pub fn conditions_in_sequence(&self) -> Vec<&Condition> {
        let mut ordered: Vec<&Condition> = self.conditions.iter().collect();
        ordered.sort_by_key(|c| c.sequence_index());
        ordered
    }

    pub(crate) fn check(value: &Value, path: &FieldPath, report: &mut Report) -> Option<Self> {
        let mark = report.mark();
        let fields = Fields::open(value, path, report)?;

        let associated_npc = resolve_npc(&fields, report);
        let tier = fields.required("Tier", report, check_tier);
        let title = fields.required("Title", report, non_empty_string);
        let description = fields.required("Description", report, non_empty_string);
        let time_limit_hours = fields.optional("TimeLimitHours", report, positive_number);
        let reward_pool = fields.required("RewardPool", report, |v, p, r| {
            array(v, p, r, 1, Reward::check)
        });
        let conditions = fields.required("Conditions", report, |v, p, r| {
            array(v, p, r, 1, Condition::check)
        });

        if !report.clean_since(mark) {
            return None;
        }
        Some(Quest {
            associated_npc: associated_npc?,
            tier: tier?,
            title: title?,
            description: description?,
            time_limit_hours,
            reward_pool: reward_pool?,
            conditions: conditions?,
        })
    }
}

/// Input adapter for the two NPC spellings. Issues name the field as it
/// was written; the canonical spelling wins when both are present.
fn resolve_npc(fields: &Fields<'_>, report: &mut Report) -> Option<Npc> {
    if !fields.has(NPC_FIELD) && !fields.has(LEGACY_NPC_FIELD) {
        report.push(
            fields.path(),
            format!("Either {} or {} is required", NPC_FIELD, LEGACY_NPC_FIELD),
        );
        return None;
    }
    let canonical = fields.optional(NPC_FIELD, report, variant::<Npc>);
    let legacy = fields.optional(LEGACY_NPC_FIELD, report, variant::<Npc>);
    canonical.or(legacy)
}

fn check_tier(value: &Value, path: &FieldPath, report: &mut Report) -> Option<QuestTier> {
    let n = integer(value, path, report)?;
    let tier = QuestTier::from_value(n);
    if tier.is_none() {
        report.push(path, "Invalid literal value, expected 1 | 2 | 3");
    }
    tier
}
