/// Quest conditions: a union of Fetch, Elimination and Interaction
/// objectives keyed by the `Type` field.
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::enums::{CookLevel, CookQuality, Named, UnknownName};
use crate::core::validation::{
    array, boolean, integer, non_empty_string, number, positive_number, string, string_list,
    unsigned, variant, FieldPath, Fields, Report, ValidationErrors,
};

/// Discriminator of the [`Condition`] union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionKind {
    Fetch,
    Elimination,
    Interaction,
}

impl Named for ConditionKind {
    const ALL: &'static [Self] = &[Self::Fetch, Self::Elimination, Self::Interaction];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "Fetch",
            Self::Elimination => "Elimination",
            Self::Interaction => "Interaction",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownName {
            kind: "ConditionKind",
            name: s.to_string(),
        })
    }
}

/// A world-space point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Where a map marker points: explicit coordinates or a named anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MapLocation {
    Coordinates(Vec3),
    Anchor(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapMarker {
    pub location: MapLocation,
    pub size_factor: f64,
}

/// Fields shared by every condition variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionCommon {
    pub can_be_auto_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_caption: Option<String>,
    pub sequence_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations_shown_on_map: Option<Vec<MapMarker>>,
}

/// One line of a fetch objective. Any of `accepted_items` satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemRequirement {
    pub accepted_items: Vec<String>,
    pub required_num: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_additional_required_num: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_item_uses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_cook_level: Option<CookLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_accepted_cook_level: Option<CookLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_cook_quality: Option<CookQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_item_mass: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_item_health: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_item_resource_ratio: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_accepted_item_resource_amount: Option<u64>,
}

impl ItemRequirement {
    pub fn new<I, S>(items: I, count: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted_items: items.into_iter().map(Into::into).collect(),
            required_num: count,
            random_additional_required_num: None,
            min_accepted_item_uses: None,
            min_accepted_cook_level: None,
            max_accepted_cook_level: None,
            min_accepted_cook_quality: None,
            min_accepted_item_mass: None,
            min_accepted_item_health: None,
            min_accepted_item_resource_ratio: None,
            min_accepted_item_resource_amount: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchCondition {
    #[serde(flatten)]
    pub common: ConditionCommon,
    pub disable_purchase_of_required_items: bool,
    pub player_keeps_items: bool,
    pub required_items: Vec<ItemRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EliminationCondition {
    #[serde(flatten)]
    pub common: ConditionCommon,
    pub target_characters: Vec<String>,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_weapons: Option<Vec<String>>,
}

/// A world object the player has to interact with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InteractionLocation {
    pub anchor_mesh: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_mesh: Option<String>,
}

impl InteractionLocation {
    pub fn new(anchor_mesh: impl Into<String>) -> Self {
        Self {
            anchor_mesh: anchor_mesh.into(),
            instance: None,
            fallback_transform: None,
            visible_mesh: None,
        }
    }
}

/// Invariant: `min_needed <= max_needed <= locations.len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InteractionCondition {
    #[serde(flatten)]
    pub common: ConditionCommon,
    pub locations: Vec<InteractionLocation>,
    pub min_needed: u64,
    pub max_needed: u64,
    pub spawn_only_needed: bool,
    pub world_markers_show_distance: u64,
}

/// A validated quest objective.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum Condition {
    Fetch(FetchCondition),
    Elimination(EliminationCondition),
    Interaction(InteractionCondition),
}

pub const DEFAULT_SIZE_FACTOR: f64 = 1.0;
pub const DEFAULT_WORLD_MARKERS_SHOW_DISTANCE: u64 = 50;

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Self::Fetch(_) => ConditionKind::Fetch,
            Self::Elimination(_) => ConditionKind::Elimination,
            Self::Interaction(_) => ConditionKind::Interaction,
        }
    }

    pub fn common(&self) -> &ConditionCommon {
        match self {
            Self::Fetch(c) => &c.common,
            Self::Elimination(c) => &c.common,
            Self::Interaction(c) => &c.common,
        }
    }

    pub fn sequence_index(&self) -> u64 {
        self.common().sequence_index
    }

    /// Item or character identifiers this condition refers to.
    pub fn referenced_items(&self) -> Vec<&str> {
        match self {
            Self::Fetch(c) => c
                .required_items
                .iter()
                .flat_map(|req| req.accepted_items.iter().map(String::as_str))
                .collect(),
            Self::Elimination(c) => c.target_characters.iter().map(String::as_str).collect(),
            Self::Interaction(_) => Vec::new(),
        }
    }

    /// Anchor meshes of an interaction condition.
    pub fn interaction_objects(&self) -> Vec<&str> {
        match self {
            Self::Interaction(c) => c.locations.iter().map(|l| l.anchor_mesh.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Validate an untyped condition.
    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut report = Report::new();
        let condition = Self::check(raw, &FieldPath::root(), &mut report);
        report.finish(condition)
    }

    pub(crate) fn check(value: &Value, path: &FieldPath, report: &mut Report) -> Option<Self> {
        let mark = report.mark();
        let fields = Fields::open(value, path, report)?;

        let kind = match fields
            .raw("Type")
            .and_then(Value::as_str)
            .and_then(ConditionKind::from_name)
        {
            Some(kind) => kind,
            None => {
                report.push(
                    &path.key("Type"),
                    "Invalid discriminator value. Expected 'Fetch' | 'Elimination' | 'Interaction'",
                );
                return None;
            }
        };

        let common = check_common(&fields, report);
        let condition = match kind {
            ConditionKind::Fetch => check_fetch(&fields, report)
                .zip(common)
                .map(|(build, common)| Self::Fetch(build(common))),
            ConditionKind::Elimination => check_elimination(&fields, report)
                .zip(common)
                .map(|(build, common)| Self::Elimination(build(common))),
            ConditionKind::Interaction => check_interaction(&fields, report)
                .zip(common)
                .map(|(build, common)| Self::Interaction(build(common))),
        };
        if !report.clean_since(mark) {
            return None;
        }
        let condition = condition?;

        // Cross-field rules only apply to structurally valid input.
        if let Self::Interaction(c) = &condition {
            if c.min_needed > c.max_needed {
                report.push(path, "MinNeeded must be less than or equal to MaxNeeded");
            }
            if c.max_needed > c.locations.len() as u64 {
                report.push(
                    path,
                    "MaxNeeded must be less than or equal to the number of locations",
                );
            }
        }
        report.clean_since(mark).then_some(condition)
    }
}

fn check_common(fields: &Fields<'_>, report: &mut Report) -> Option<ConditionCommon> {
    let can_be_auto_completed = fields.defaulted("CanBeAutoCompleted", false, report, boolean);
    let tracking_caption = fields.optional("TrackingCaption", report, string);
    let sequence_index = fields.required("SequenceIndex", report, |v, p, r| unsigned(v, p, r, 0, None));
    let locations_shown_on_map = fields.optional("LocationsShownOnMap", report, |v, p, r| {
        array(v, p, r, 0, check_map_marker)
    });
    Some(ConditionCommon {
        can_be_auto_completed: can_be_auto_completed?,
        tracking_caption,
        sequence_index: sequence_index?,
        locations_shown_on_map,
    })
}

fn check_map_marker(value: &Value, path: &FieldPath, report: &mut Report) -> Option<MapMarker> {
    let fields = Fields::open(value, path, report)?;
    let location = fields.required("Location", report, check_map_location);
    let size_factor = fields.defaulted("SizeFactor", DEFAULT_SIZE_FACTOR, report, positive_number);
    Some(MapMarker {
        location: location?,
        size_factor: size_factor?,
    })
}

fn check_map_location(value: &Value, path: &FieldPath, report: &mut Report) -> Option<MapLocation> {
    match value {
        Value::String(anchor) => Some(MapLocation::Anchor(anchor.clone())),
        Value::Object(_) => {
            let fields = Fields::open(value, path, report)?;
            let x = fields.required("X", report, number);
            let y = fields.required("Y", report, number);
            let z = fields.required("Z", report, number);
            Some(MapLocation::Coordinates(Vec3 {
                x: x?,
                y: y?,
                z: z?,
            }))
        }
        _ => {
            report.push(path, "Expected a {X, Y, Z} coordinate or an anchor name");
            None
        }
    }
}

fn at_least(min: u64) -> impl Fn(&Value, &FieldPath, &mut Report) -> Option<u64> {
    move |v, p, r| unsigned(v, p, r, min, None)
}

fn check_item_requirement(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
) -> Option<ItemRequirement> {
    let fields = Fields::open(value, path, report)?;
    let percent = |v: &Value, p: &FieldPath, r: &mut Report| unsigned(v, p, r, 0, Some(100));

    let accepted_items = fields.required("AcceptedItems", report, |v, p, r| string_list(v, p, r, 1));
    let required_num = fields.required("RequiredNum", report, at_least(1));
    let requirement = ItemRequirement {
        random_additional_required_num: fields.optional("RandomAdditionalRequiredNum", report, at_least(0)),
        min_accepted_item_uses: fields.optional("MinAcceptedItemUses", report, at_least(0)),
        min_accepted_cook_level: fields.optional("MinAcceptedCookLevel", report, variant::<CookLevel>),
        max_accepted_cook_level: fields.optional("MaxAcceptedCookLevel", report, variant::<CookLevel>),
        min_accepted_cook_quality: fields.optional("MinAcceptedCookQuality", report, variant::<CookQuality>),
        min_accepted_item_mass: fields.optional("MinAcceptedItemMass", report, at_least(0)),
        min_accepted_item_health: fields.optional("MinAcceptedItemHealth", report, percent),
        min_accepted_item_resource_ratio: fields.optional("MinAcceptedItemResourceRatio", report, percent),
        min_accepted_item_resource_amount: fields.optional("MinAcceptedItemResourceAmount", report, at_least(0)),
        ..ItemRequirement::new(accepted_items?, required_num?)
    };
    Some(requirement)
}

fn check_fetch(
    fields: &Fields<'_>,
    report: &mut Report,
) -> Option<impl FnOnce(ConditionCommon) -> FetchCondition> {
    let disable_purchase = fields.defaulted("DisablePurchaseOfRequiredItems", false, report, boolean);
    let player_keeps_items = fields.defaulted("PlayerKeepsItems", false, report, boolean);
    let required_items = fields.required("RequiredItems", report, |v, p, r| {
        array(v, p, r, 1, check_item_requirement)
    });
    let (disable_purchase, player_keeps_items, required_items) =
        (disable_purchase?, player_keeps_items?, required_items?);
    Some(move |common| FetchCondition {
        common,
        disable_purchase_of_required_items: disable_purchase,
        player_keeps_items,
        required_items,
    })
}

fn check_elimination(
    fields: &Fields<'_>,
    report: &mut Report,
) -> Option<impl FnOnce(ConditionCommon) -> EliminationCondition> {
    let target_characters = fields.required("TargetCharacters", report, |v, p, r| string_list(v, p, r, 1));
    let amount = fields.required("Amount", report, |v, p, r| unsigned(v, p, r, 1, None));
    let allowed_weapons = fields.optional("AllowedWeapons", report, |v, p, r| string_list(v, p, r, 0));
    let (target_characters, amount) = (target_characters?, amount?);
    Some(move |common| EliminationCondition {
        common,
        target_characters,
        amount,
        allowed_weapons,
    })
}

fn check_interaction_location(
    value: &Value,
    path: &FieldPath,
    report: &mut Report,
) -> Option<InteractionLocation> {
    let fields = Fields::open(value, path, report)?;
    let anchor_mesh = fields.required("AnchorMesh", report, non_empty_string);
    let instance = fields.optional("Instance", report, integer);
    let fallback_transform = fields.optional("FallbackTransform", report, string);
    let visible_mesh = fields.optional("VisibleMesh", report, string);
    Some(InteractionLocation {
        anchor_mesh: anchor_mesh?,
        instance,
        fallback_transform,
        visible_mesh,
    })
}

fn check_interaction(
    fields: &Fields<'_>,
    report: &mut Report,
) -> Option<impl FnOnce(ConditionCommon) -> InteractionCondition> {
    let needed = |v: &Value, p: &FieldPath, r: &mut Report| unsigned(v, p, r, 1, None);
    let locations = fields.required("Locations", report, |v, p, r| {
        array(v, p, r, 1, check_interaction_location)
    });
    let min_needed = fields.required("MinNeeded", report, needed);
    let max_needed = fields.required("MaxNeeded", report, needed);
    let spawn_only_needed = fields.defaulted("SpawnOnlyNeeded", true, report, boolean);
    let world_markers_show_distance = fields.defaulted(
        "WorldMarkersShowDistance",
        DEFAULT_WORLD_MARKERS_SHOW_DISTANCE,
        report,
        |v, p, r| unsigned(v, p, r, 0, None),
    );
    let (locations, min_needed, max_needed, spawn_only_needed, world_markers_show_distance) = (
        locations?,
        min_needed?,
        max_needed?,
        spawn_only_needed?,
        world_markers_show_distance?,
    );
    Some(move |common| InteractionCondition {
        common,
        locations,
        min_needed,
        max_needed,
        spawn_only_needed,
        world_markers_show_distance,
    })
}
