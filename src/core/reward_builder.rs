/// Fluent construction of reward bundles. The slot budget is not checked
/// here; it is enforced when the owning quest is validated.
use serde::Serialize;

use crate::schema::enums::Skill;
use crate::schema::reward::{currency_granted, slot_cost, SkillReward, TradeDeal};

/// Unvalidated reward as assembled by a [`RewardBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RewardDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_normal: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_gold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fame: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<SkillReward>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trade_deals: Vec<TradeDeal>,
}

impl RewardDraft {
    /// Editor starting point: all three currencies at zero.
    pub fn empty() -> Self {
        Self {
            currency_normal: Some(0),
            currency_gold: Some(0),
            fame: Some(0),
            ..Self::default()
        }
    }

    /// Slots this draft would take once validated.
    pub fn slot_count(&self) -> usize {
        let has_currency = currency_granted(self.currency_normal, self.currency_gold, self.fame);
        slot_cost(has_currency, self.skills.len(), self.trade_deals.len())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewardBuilder {
    draft: RewardDraft,
}

impl RewardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set any of the currency fields; `None` leaves a field untouched.
    pub fn currency(mut self, normal: Option<u64>, gold: Option<u64>, fame: Option<u64>) -> Self {
        if normal.is_some() {
            self.draft.currency_normal = normal;
        }
        if gold.is_some() {
            self.draft.currency_gold = gold;
        }
        if fame.is_some() {
            self.draft.fame = fame;
        }
        self
    }

    pub fn add_skill(mut self, skill: Skill, experience: u64) -> Self {
        self.draft.skills.push(SkillReward { skill, experience });
        self
    }

    pub fn add_trade_deal(mut self, deal: TradeDeal) -> Self {
        self.draft.trade_deals.push(deal);
        self
    }

    pub fn build(self) -> RewardDraft {
        self.draft
    }
}
