/// Quest builder: scalar setters plus nested condition and reward
/// builders, validated as a whole by the quest schema.
use serde::Serialize;
use serde_json::Value;

use crate::core::condition_builder::{BuilderError, ConditionBuilder, ConditionDraft};
use crate::core::reward_builder::{RewardBuilder, RewardDraft};
use crate::core::validation::{ValidationErrors, ValidationOutcome};
use crate::schema::condition::ConditionKind;
use crate::schema::enums::Npc;
use crate::schema::quest::Quest;

/// Partial quest. Unset fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_npc: Option<Npc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_hours: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reward_pool: Vec<RewardDraft>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionDraft>,
}

impl QuestDraft {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestBuilder {
    draft: QuestDraft,
}

impl QuestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.draft.associated_npc = Some(npc);
        self
    }

    /// Tier is range-checked by [`QuestBuilder::validate`] and
    /// [`QuestBuilder::build`], not here.
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.draft.tier = Some(tier);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.draft.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.draft.description = Some(description.into());
        self
    }

    pub fn with_time_limit(mut self, hours: f64) -> Self {
        self.draft.time_limit_hours = Some(hours);
        self
    }

    /// Append a condition. `configure` gets a fresh builder with no
    /// variant selected and must select one.
    pub fn add_condition<F>(self, configure: F) -> Result<Self, BuilderError>
    where
        F: FnOnce(ConditionBuilder) -> Result<ConditionBuilder, BuilderError>,
    {
        self.push_condition(ConditionBuilder::new(), configure)
    }

    pub fn add_fetch_condition<F>(self, configure: F) -> Result<Self, BuilderError>
    where
        F: FnOnce(ConditionBuilder) -> Result<ConditionBuilder, BuilderError>,
    {
        self.push_condition(ConditionBuilder::new().as_kind(ConditionKind::Fetch), configure)
    }

    pub fn add_elimination_condition<F>(self, configure: F) -> Result<Self, BuilderError>
    where
        F: FnOnce(ConditionBuilder) -> Result<ConditionBuilder, BuilderError>,
    {
        self.push_condition(
            ConditionBuilder::new().as_kind(ConditionKind::Elimination),
            configure,
        )
    }

    pub fn add_interaction_condition<F>(self, configure: F) -> Result<Self, BuilderError>
    where
        F: FnOnce(ConditionBuilder) -> Result<ConditionBuilder, BuilderError>,
    {
        self.push_condition(
            ConditionBuilder::new().as_kind(ConditionKind::Interaction),
            configure,
        )
    }

    fn push_condition<F>(mut self, start: ConditionBuilder, configure: F) -> Result<Self, BuilderError>
    where
        F: FnOnce(ConditionBuilder) -> Result<ConditionBuilder, BuilderError>,
    {
        let draft = configure(start)?.build()?;
        self.draft.conditions.push(draft);
        Ok(self)
    }

    pub fn add_reward<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(RewardBuilder) -> RewardBuilder,
    {
        self.draft.reward_pool.push(configure(RewardBuilder::new()).build());
        self
    }

    /// Shorthand for a reward holding only currency.
    pub fn add_currency_reward(self, normal: u64, gold: Option<u64>, fame: Option<u64>) -> Self {
        self.add_reward(|reward| reward.currency(Some(normal), gold, fame))
    }

    pub fn draft(&self) -> &QuestDraft {
        &self.draft
    }

    /// Current partial state as JSON, without validation.
    pub fn preview(&self) -> Value {
        self.draft.to_value()
    }

    /// Validate the current state without failing.
    pub fn validate(&self) -> ValidationOutcome {
        ValidationOutcome::from(&Quest::validate(&self.preview()))
    }

    pub fn build(&self) -> Result<Quest, ValidationErrors> {
        Quest::validate(&self.preview())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::enums::Skill;
    use crate::schema::quest::QuestTier;
    use crate::schema::reward::TradeDeal;

    fn apple_quest() -> Result<QuestBuilder, BuilderError> {
        QuestBuilder::new()
            .with_npc(Npc::Bartender)
            .with_tier(1)
            .with_title("Apple Collection")
            .with_description("Collect some apples for the bartender")
            .with_time_limit(24.0)
            .add_fetch_condition(|c| {
                c.with_sequence_index(0)
                    .with_caption("Collect 3 apples")
                    .require_items(["Apple"], 3)?
                    .keep_items(true)
            })
            .map(|b| b.add_currency_reward(100, Some(1), Some(10)))
    }

    #[test]
    fn builds_simple_fetch_quest() {
        let quest = apple_quest().unwrap().build().unwrap();
        assert_eq!(quest.associated_npc, Npc::Bartender);
        assert_eq!(quest.tier, QuestTier::One);
        assert_eq!(quest.conditions.len(), 1);
        assert_eq!(quest.reward_pool[0].currency_normal, Some(100));
    }

    #[test]
    fn preview_omits_unset_fields() {
        let builder = QuestBuilder::new()
            .with_npc(Npc::Bartender)
            .with_title("Preview Test");
        let preview = builder.preview();
        assert_eq!(preview["AssociatedNpc"], "Bartender");
        assert_eq!(preview["Title"], "Preview Test");
        assert!(preview.get("Tier").is_none());
        assert!(preview.get("Conditions").is_none());
    }

    #[test]
    fn validate_reports_without_failing() {
        let outcome = QuestBuilder::new()
            .with_npc(Npc::Bartender)
            .with_title("Incomplete Quest")
            .validate();
        assert!(!outcome.success);
        let paths: Vec<String> = outcome.issues.iter().map(|i| i.path.to_string()).collect();
        assert!(paths.contains(&"Tier".to_string()));
        assert!(paths.contains(&"Description".to_string()));
        assert!(paths.contains(&"RewardPool".to_string()));
        assert!(paths.contains(&"Conditions".to_string()));
    }

    #[test]
    fn build_errors_match_validate() {
        let builder = apple_quest().unwrap().with_tier(7);
        let outcome = builder.validate();
        let errors = builder.build().unwrap_err();
        assert_eq!(outcome.issues, errors.issues());
    }

    #[test]
    fn wrong_variant_fails_at_call_site() {
        let err = QuestBuilder::new()
            .add_elimination_condition(|c| c.require_items(["Apple"], 3))
            .unwrap_err();
        assert!(matches!(err, BuilderError::WrongVariant { method: "require_items", .. }));
    }

    #[test]
    fn generic_condition_must_select_variant() {
        let err = QuestBuilder::new()
            .add_condition(|c| Ok(c.with_sequence_index(0)))
            .unwrap_err();
        assert_eq!(err, BuilderError::VariantNotSelected { method: "build" });
    }

    #[test]
    fn slot_budget_checked_at_build() {
        let builder = apple_quest().unwrap().add_reward(|r| {
            r.currency(Some(1), None, None)
                .add_skill(Skill::Cooking, 10)
                .add_skill(Skill::Running, 10)
                .add_trade_deal(TradeDeal::new("Pineapple"))
                .add_trade_deal(TradeDeal::new("Apple"))
        });
        let errors = builder.build().unwrap_err();
        assert!(errors.has_issue_at("RewardPool.1"));
    }

    #[test]
    fn builders_do_not_share_state() {
        let a = QuestBuilder::new().with_title("A");
        let b = QuestBuilder::new().with_title("B");
        assert_eq!(a.draft().title.as_deref(), Some("A"));
        assert_eq!(b.draft().title.as_deref(), Some("B"));
    }
}
