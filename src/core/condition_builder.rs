/// Fluent construction of quest conditions.
///
/// A builder starts without a variant. Common setters work at any time;
/// variant-specific setters check the selected variant and return
/// [`BuilderError`] straight away when called on the wrong one.
use serde::Serialize;
use thiserror::Error;

use crate::schema::condition::{
    ConditionKind, InteractionLocation, ItemRequirement, MapLocation, MapMarker, Vec3,
    DEFAULT_SIZE_FACTOR, DEFAULT_WORLD_MARKERS_SHOW_DISTANCE,
};
use crate::schema::enums::{CookLevel, CookQuality};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("{method}() can only be used with {expected} conditions (builder is configured as {actual})")]
    WrongVariant {
        method: &'static str,
        expected: ConditionKind,
        actual: ConditionKind,
    },
    #[error("{method}() requires a condition type; call as_fetch(), as_elimination() or as_interaction() first")]
    VariantNotSelected { method: &'static str },
}

/// Quality gates for [`ConditionBuilder::require_items_with_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementOptions {
    pub min_health: Option<u64>,
    pub min_mass: Option<u64>,
    pub min_uses: Option<u64>,
    pub min_cook_level: Option<CookLevel>,
    pub max_cook_level: Option<CookLevel>,
    pub cook_quality: Option<CookQuality>,
    pub resource_ratio: Option<u64>,
    pub resource_amount: Option<u64>,
    pub random_additional: Option<u64>,
}

/// Unvalidated condition as assembled by a builder. Serializes to the
/// same JSON shape the condition schema reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionDraft {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConditionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_be_auto_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_index: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations_shown_on_map: Vec<MapMarker>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_purchase_of_required_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_keeps_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_items: Option<Vec<ItemRequirement>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_characters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_weapons: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<InteractionLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_needed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_needed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_only_needed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_markers_show_distance: Option<u64>,
}

impl ConditionDraft {
    /// Editor starting point for `kind`, with every defaulted field spelled
    /// out. Not valid until the required lists are filled in.
    pub fn empty(kind: ConditionKind) -> Self {
        let mut draft = Self {
            kind: Some(kind),
            can_be_auto_completed: Some(false),
            sequence_index: Some(0),
            ..Self::default()
        };
        match kind {
            ConditionKind::Fetch => {
                draft.disable_purchase_of_required_items = Some(false);
                draft.player_keeps_items = Some(false);
                draft.required_items = Some(Vec::new());
            }
            ConditionKind::Elimination => {
                draft.target_characters = Some(Vec::new());
                draft.amount = Some(1);
            }
            ConditionKind::Interaction => {
                draft.locations = Some(Vec::new());
                draft.min_needed = Some(1);
                draft.max_needed = Some(1);
                draft.spawn_only_needed = Some(true);
                draft.world_markers_show_distance = Some(DEFAULT_WORLD_MARKERS_SHOW_DISTANCE);
            }
        }
        draft
    }

    fn clear_variant_fields(&mut self) {
        *self = Self {
            kind: self.kind,
            can_be_auto_completed: self.can_be_auto_completed,
            tracking_caption: self.tracking_caption.take(),
            sequence_index: self.sequence_index,
            locations_shown_on_map: std::mem::take(&mut self.locations_shown_on_map),
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConditionBuilder {
    draft: ConditionDraft,
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<ConditionKind> {
        self.draft.kind
    }

    /// Select the variant. Switching to a different variant drops fields
    /// that belonged to the previous one.
    pub fn as_kind(mut self, kind: ConditionKind) -> Self {
        if self.draft.kind != Some(kind) {
            self.draft.kind = Some(kind);
            self.draft.clear_variant_fields();
        }
        self
    }

    pub fn as_fetch(self) -> Self {
        self.as_kind(ConditionKind::Fetch)
    }

    pub fn as_elimination(self) -> Self {
        self.as_kind(ConditionKind::Elimination)
    }

    pub fn as_interaction(self) -> Self {
        self.as_kind(ConditionKind::Interaction)
    }

    fn require(&self, method: &'static str, expected: ConditionKind) -> Result<(), BuilderError> {
        match self.draft.kind {
            Some(kind) if kind == expected => Ok(()),
            Some(actual) => Err(BuilderError::WrongVariant {
                method,
                expected,
                actual,
            }),
            None => Err(BuilderError::VariantNotSelected { method }),
        }
    }

    // Common fields

    pub fn with_sequence_index(mut self, index: u64) -> Self {
        self.draft.sequence_index = Some(index);
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.draft.tracking_caption = Some(caption.into());
        self
    }

    pub fn auto_complete(mut self, auto: bool) -> Self {
        self.draft.can_be_auto_completed = Some(auto);
        self
    }

    pub fn add_map_location(mut self, x: f64, y: f64, z: f64, size_factor: f64) -> Self {
        self.draft.locations_shown_on_map.push(MapMarker {
            location: MapLocation::Coordinates(Vec3 { x, y, z }),
            size_factor,
        });
        self
    }

    pub fn add_map_anchor(mut self, anchor: impl Into<String>, size_factor: Option<f64>) -> Self {
        self.draft.locations_shown_on_map.push(MapMarker {
            location: MapLocation::Anchor(anchor.into()),
            size_factor: size_factor.unwrap_or(DEFAULT_SIZE_FACTOR),
        });
        self
    }

    // Fetch

    pub fn require_items<I, S>(self, items: I, count: u64) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require("require_items", ConditionKind::Fetch)?;
        Ok(self.push_requirement(ItemRequirement::new(items, count)))
    }

    pub fn require_items_with_options<I, S>(
        self,
        items: I,
        count: u64,
        options: RequirementOptions,
    ) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require("require_items_with_options", ConditionKind::Fetch)?;
        let requirement = ItemRequirement {
            random_additional_required_num: options.random_additional,
            min_accepted_item_uses: options.min_uses,
            min_accepted_cook_level: options.min_cook_level,
            max_accepted_cook_level: options.max_cook_level,
            min_accepted_cook_quality: options.cook_quality,
            min_accepted_item_mass: options.min_mass,
            min_accepted_item_health: options.min_health,
            min_accepted_item_resource_ratio: options.resource_ratio,
            min_accepted_item_resource_amount: options.resource_amount,
            ..ItemRequirement::new(items, count)
        };
        Ok(self.push_requirement(requirement))
    }

    pub fn require_items_with_health<I, S>(
        self,
        items: I,
        count: u64,
        min_health: u64,
    ) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require("require_items_with_health", ConditionKind::Fetch)?;
        let requirement = ItemRequirement {
            min_accepted_item_health: Some(min_health),
            ..ItemRequirement::new(items, count)
        };
        Ok(self.push_requirement(requirement))
    }

    fn push_requirement(mut self, requirement: ItemRequirement) -> Self {
        self.draft
            .required_items
            .get_or_insert_with(Vec::new)
            .push(requirement);
        self
    }

    pub fn keep_items(mut self, keep: bool) -> Result<Self, BuilderError> {
        self.require("keep_items", ConditionKind::Fetch)?;
        self.draft.player_keeps_items = Some(keep);
        Ok(self)
    }

    pub fn disable_purchase(mut self, disable: bool) -> Result<Self, BuilderError> {
        self.require("disable_purchase", ConditionKind::Fetch)?;
        self.draft.disable_purchase_of_required_items = Some(disable);
        Ok(self)
    }

    // Elimination

    pub fn eliminate_targets<I, S>(mut self, targets: I, count: u64) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require("eliminate_targets", ConditionKind::Elimination)?;
        self.draft.target_characters = Some(targets.into_iter().map(Into::into).collect());
        self.draft.amount = Some(count);
        Ok(self)
    }

    pub fn with_weapons<I, S>(mut self, weapons: I) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require("with_weapons", ConditionKind::Elimination)?;
        self.draft.allowed_weapons = Some(weapons.into_iter().map(Into::into).collect());
        Ok(self)
    }

    // Interaction

    pub fn add_interaction_location(
        mut self,
        location: InteractionLocation,
    ) -> Result<Self, BuilderError> {
        self.require("add_interaction_location", ConditionKind::Interaction)?;
        self.draft
            .locations
            .get_or_insert_with(Vec::new)
            .push(location);
        Ok(self)
    }

    pub fn needed(mut self, min: u64, max: u64) -> Result<Self, BuilderError> {
        self.require("needed", ConditionKind::Interaction)?;
        self.draft.min_needed = Some(min);
        self.draft.max_needed = Some(max);
        Ok(self)
    }

    pub fn spawn_only_needed(mut self, only_needed: bool) -> Result<Self, BuilderError> {
        self.require("spawn_only_needed", ConditionKind::Interaction)?;
        self.draft.spawn_only_needed = Some(only_needed);
        Ok(self)
    }

    pub fn world_markers_show_distance(mut self, distance: u64) -> Result<Self, BuilderError> {
        self.require("world_markers_show_distance", ConditionKind::Interaction)?;
        self.draft.world_markers_show_distance = Some(distance);
        Ok(self)
    }

    /// Finish the draft. Schema rules are checked later, when the quest
    /// is built; only a missing variant fails here.
    pub fn build(self) -> Result<ConditionDraft, BuilderError> {
        if self.draft.kind.is_none() {
            return Err(BuilderError::VariantNotSelected { method: "build" });
        }
        Ok(self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::condition::Condition;

    #[test]
    fn fetch_methods_rejected_on_elimination() {
        let err = ConditionBuilder::new()
            .as_elimination()
            .require_items(["Apple"], 3)
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::WrongVariant {
                method: "require_items",
                expected: ConditionKind::Fetch,
                actual: ConditionKind::Elimination,
            }
        );
        assert!(err
            .to_string()
            .starts_with("require_items() can only be used with Fetch conditions"));
    }

    #[test]
    fn variant_methods_rejected_before_selection() {
        let err = ConditionBuilder::new().with_weapons(["M1911"]).unwrap_err();
        assert_eq!(err, BuilderError::VariantNotSelected { method: "with_weapons" });
        let err = ConditionBuilder::new().needed(1, 1).unwrap_err();
        assert_eq!(err, BuilderError::VariantNotSelected { method: "needed" });
    }

    #[test]
    fn build_requires_variant() {
        let err = ConditionBuilder::new().with_sequence_index(0).build().unwrap_err();
        assert_eq!(err, BuilderError::VariantNotSelected { method: "build" });
    }

    #[test]
    fn common_methods_work_on_any_variant() {
        let draft = ConditionBuilder::new()
            .with_caption("Find it")
            .with_sequence_index(2)
            .auto_complete(true)
            .as_interaction()
            .build()
            .unwrap();
        assert_eq!(draft.sequence_index, Some(2));
        assert_eq!(draft.tracking_caption.as_deref(), Some("Find it"));
        assert_eq!(draft.can_be_auto_completed, Some(true));
    }

    #[test]
    fn switching_variant_drops_old_fields() {
        let draft = ConditionBuilder::new()
            .as_fetch()
            .with_sequence_index(1)
            .require_items(["Apple"], 1)
            .unwrap()
            .as_elimination()
            .build()
            .unwrap();
        assert_eq!(draft.kind, Some(ConditionKind::Elimination));
        assert!(draft.required_items.is_none());
        assert_eq!(draft.sequence_index, Some(1));
    }

    #[test]
    fn fetch_draft_validates() -> Result<(), BuilderError> {
        let draft = ConditionBuilder::new()
            .as_fetch()
            .with_sequence_index(0)
            .with_caption("Gather apples")
            .require_items_with_health(["Apple_2"], 3, 50)?
            .require_items_with_options(
                ["Steak"],
                1,
                RequirementOptions {
                    min_cook_level: Some(CookLevel::Cooked),
                    cook_quality: Some(CookQuality::Good),
                    ..Default::default()
                },
            )?
            .keep_items(true)?
            .disable_purchase(false)?
            .add_map_location(1000.0, 2000.0, 50.0, 1.0)
            .build()?;
        let condition = Condition::validate(&serde_json::to_value(&draft).unwrap()).unwrap();
        match condition {
            Condition::Fetch(fetch) => {
                assert!(fetch.player_keeps_items);
                assert_eq!(fetch.required_items.len(), 2);
                assert_eq!(fetch.required_items[0].min_accepted_item_health, Some(50));
                assert_eq!(
                    fetch.required_items[1].min_accepted_cook_level,
                    Some(CookLevel::Cooked)
                );
            }
            other => panic!("expected fetch, got {:?}", other.kind()),
        }
        Ok(())
    }

    #[test]
    fn interaction_draft_validates() -> Result<(), BuilderError> {
        let draft = ConditionBuilder::new()
            .as_interaction()
            .with_sequence_index(0)
            .add_interaction_location(InteractionLocation::new("SM_Radio"))?
            .add_interaction_location(InteractionLocation::new("SM_Generator"))?
            .needed(1, 2)?
            .world_markers_show_distance(75)?
            .build()?;
        let condition = Condition::validate(&serde_json::to_value(&draft).unwrap()).unwrap();
        assert_eq!(condition.interaction_objects(), vec!["SM_Radio", "SM_Generator"]);
        Ok(())
    }

    #[test]
    fn empty_templates_carry_defaults() {
        let draft = ConditionDraft::empty(ConditionKind::Interaction);
        assert_eq!(draft.world_markers_show_distance, Some(50));
        assert_eq!(draft.spawn_only_needed, Some(true));
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["Type"], "Interaction");
        // Empty location list is still below the schema minimum.
        assert!(Condition::validate(&value).is_err());
    }
}
