//! Quest Kit: the data format for custom game quests.
//!
//! Validates untyped quest JSON into typed [`Quest`] values, builds quests
//! fluently with per-variant checks, and keeps a collection of quests plus
//! the blocked-quest list on disk in the folder layout the game loads.

pub mod core;
pub mod schema;

pub use crate::core::collection::{CollectionError, CollectionOptions, QuestCollection};
pub use crate::core::condition_builder::{BuilderError, ConditionBuilder};
pub use crate::core::io::{parse_quest_from_str, safe_parse_quest, ParseError};
pub use crate::core::quest_builder::QuestBuilder;
pub use crate::core::reward_builder::RewardBuilder;
pub use crate::core::validation::{Issue, ValidationErrors, ValidationOutcome};
pub use crate::schema::blocked::BlockedQuests;
pub use crate::schema::condition::{Condition, ConditionKind};
pub use crate::schema::enums::{CookLevel, CookQuality, Npc, Skill};
pub use crate::schema::quest::{Quest, QuestTier};
pub use crate::schema::reward::{Reward, TradeDeal};
