use serde::Serialize;
use serde_json::Value;

use super::enums::Skill;
use crate::core::validation::{
    array, boolean, non_empty_string, unsigned, variant, FieldPath, Fields, Report,
    ValidationErrors,
};

/// Reward slots available to a single reward bundle in-game.
pub const MAX_REWARD_SLOTS: usize = 5;

/// Experience granted to one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillReward {
    pub skill: Skill,
    pub experience: u64,
}

/// Unlocks buying an item from the quest-giver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeDeal {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_excluded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fame: Option<u64>,
}

impl TradeDeal {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            price: None,
            amount: None,
            allow_excluded: None,
            fame: None,
        }
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn allow_excluded(mut self, allow: bool) -> Self {
        self.allow_excluded = Some(allow);
        self
    }

    pub fn with_fame(mut self, fame: u64) -> Self {
        self.fame = Some(fame);
        self
    }
}

/// A validated reward bundle. Its slot cost never exceeds
/// [`MAX_REWARD_SLOTS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reward {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_normal: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_gold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fame: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillReward>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_deals: Option<Vec<TradeDeal>>,
}

/// Slots taken by a reward: the currency group shares one slot, every
/// skill takes one, the first trade deal takes two and each further
/// deal one more.
pub fn slot_cost(has_currency: bool, skills: usize, trade_deals: usize) -> usize {
    let currency = usize::from(has_currency);
    let deals = if trade_deals == 0 { 0 } else { trade_deals + 1 };
    currency + skills + deals
}

pub(crate) fn currency_granted(normal: Option<u64>, gold: Option<u64>, fame: Option<u64>) -> bool {
    [normal, gold, fame].iter().any(|amount| amount.is_some_and(|n| n > 0))
}

impl Reward {
    /// True when any currency field grants something. Zero amounts are free.
    pub fn has_currency(&self) -> bool {
        currency_granted(self.currency_normal, self.currency_gold, self.fame)
    }

    pub fn slot_count(&self) -> usize {
        slot_cost(
            self.has_currency(),
            self.skills.as_ref().map_or(0, Vec::len),
            self.trade_deals.as_ref().map_or(0, Vec::len),
        )
    }

    /// Validate an untyped reward.
    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut report = Report::new();
        let reward = Self::check(raw, &FieldPath::root(), &mut report);
        report.finish(reward)
    }

    pub(crate) fn check(value: &Value, path: &FieldPath, report: &mut Report) -> Option<Self> {
        let mark = report.mark();
        let fields = Fields::open(value, path, report)?;

        let count = |v: &Value, p: &FieldPath, r: &mut Report| unsigned(v, p, r, 0, None);
        let currency_normal = fields.optional("CurrencyNormal", report, count);
        let currency_gold = fields.optional("CurrencyGold", report, count);
        let fame = fields.optional("Fame", report, count);
        let skills = fields.optional("Skills", report, |v, p, r| {
            array(v, p, r, 0, check_skill)
        });
        let trade_deals = fields.optional("TradeDeals", report, |v, p, r| {
            array(v, p, r, 1, check_trade_deal)
        });

        if !report.clean_since(mark) {
            return None;
        }

        let reward = Reward {
            currency_normal,
            currency_gold,
            fame,
            skills,
            trade_deals,
        };
        if reward.slot_count() > MAX_REWARD_SLOTS {
            report.push(
                path,
                format!(
                    "Total slots for currency, skills, and trade deals must be less than or equal to {}",
                    MAX_REWARD_SLOTS
                ),
            );
            return None;
        }
        Some(reward)
    }
}

fn check_skill(value: &Value, path: &FieldPath, report: &mut Report) -> Option<SkillReward> {
    let fields = Fields::open(value, path, report)?;
    let skill = fields.required("Skill", report, variant::<Skill>);
    let experience = fields.required("Experience", report, |v, p, r| unsigned(v, p, r, 1, None));
    Some(SkillReward {
        skill: skill?,
        experience: experience?,
    })
}

fn check_trade_deal(value: &Value, path: &FieldPath, report: &mut Report) -> Option<TradeDeal> {
    let fields = Fields::open(value, path, report)?;
    let item = fields.required("Item", report, non_empty_string);
    let price = fields.optional("Price", report, |v, p, r| unsigned(v, p, r, 1, None));
    let amount = fields.optional("Amount", report, |v, p, r| unsigned(v, p, r, 1, None));
    let allow_excluded = fields.optional("AllowExcluded", report, boolean);
    let fame = fields.optional("Fame", report, |v, p, r| unsigned(v, p, r, 0, None));
    Some(TradeDeal {
        item: item?,
        price,
        amount,
        allow_excluded,
        fame,
    })
}
