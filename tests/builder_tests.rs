/// Builder integration tests: quests assembled fluently must match the
/// sample files and fail in the same places validation would.
use quest_kit::core::condition_builder::RequirementOptions;
use quest_kit::core::io::parse_quest_from_file;
use quest_kit::schema::condition::{Condition, InteractionLocation};
use quest_kit::{
    BuilderError, ConditionKind, CookLevel, CookQuality, Npc, QuestBuilder, Skill, TradeDeal,
};
use std::path::Path;

#[test]
fn rebuilds_general_goods_sample() {
    let built = QuestBuilder::new()
        .with_npc(Npc::GeneralGoods)
        .with_tier(1)
        .with_title("General Goods trader's Special")
        .with_description("Collect apples for the General Goods trader and get a small reward.")
        .with_time_limit(24.0)
        .add_fetch_condition(|c| {
            c.with_sequence_index(0)
                .with_caption("Gather apples")
                .auto_complete(false)
                .add_map_location(-42104.0, 110632.0, 1000.0, 2.0)
                .require_items_with_health(["Apple_2"], 3, 50)?
                .keep_items(true)
        })
        .unwrap()
        .add_reward(|r| {
            r.currency(Some(100), None, Some(5))
                .add_skill(Skill::Cooking, 20)
                .add_trade_deal(TradeDeal::new("Pineapple").with_price(50).with_amount(1).with_fame(0))
        })
        .build()
        .unwrap();

    let sample =
        parse_quest_from_file(Path::new("tests/fixtures/Override/general-goods-quest.json")).unwrap();
    assert_eq!(built, sample);
}

#[test]
fn mixed_condition_quest() {
    let quest = QuestBuilder::new()
        .with_npc(Npc::Fischerman)
        .with_tier(2)
        .with_title("Harbor Duty")
        .with_description("Clear the docks, then fix the lights.")
        .add_elimination_condition(|c| {
            c.with_sequence_index(0)
                .eliminate_targets(["BP_Wolf"], 3)?
                .with_weapons(["Weapon_Bow"])
        })
        .unwrap()
        .add_interaction_condition(|c| {
            c.with_sequence_index(1)
                .add_interaction_location(InteractionLocation::new("Dock_Light_01"))?
                .add_interaction_location(InteractionLocation::new("Dock_Light_02"))?
                .needed(1, 2)
        })
        .unwrap()
        .add_fetch_condition(|c| {
            c.with_sequence_index(2).require_items_with_options(
                ["Fish_Tuna"],
                2,
                RequirementOptions {
                    min_cook_level: Some(CookLevel::Cooked),
                    cook_quality: Some(CookQuality::Excellent),
                    ..RequirementOptions::default()
                },
            )
        })
        .unwrap()
        .add_currency_reward(400, None, Some(10))
        .build()
        .unwrap();

    let kinds: Vec<ConditionKind> = quest.conditions.iter().map(Condition::kind).collect();
    assert_eq!(
        kinds,
        vec![ConditionKind::Elimination, ConditionKind::Interaction, ConditionKind::Fetch]
    );
    let Condition::Interaction(interact) = &quest.conditions[1] else {
        panic!("expected an interaction condition");
    };
    assert!(interact.spawn_only_needed);
    assert_eq!(interact.world_markers_show_distance, 50);
}

#[test]
fn interaction_bounds_checked_at_build() {
    let errors = QuestBuilder::new()
        .with_npc(Npc::Doctor)
        .with_tier(1)
        .with_title("Rounds")
        .with_description("Visit the beds.")
        .add_interaction_condition(|c| {
            c.with_sequence_index(0)
                .add_interaction_location(InteractionLocation::new("Bed_01"))?
                .needed(2, 3)
        })
        .unwrap()
        .add_currency_reward(50, None, None)
        .build()
        .unwrap_err();
    let messages = errors.messages();
    assert_eq!(messages.len(), 1, "{:?}", messages);
    assert!(messages[0].starts_with("Conditions.0: "));
    assert!(messages[0].ends_with("MaxNeeded must be less than or equal to the number of locations"));
}

#[test]
fn variant_switch_discards_old_fields() {
    let quest = QuestBuilder::new()
        .with_npc(Npc::Barber)
        .with_tier(1)
        .with_title("Trim")
        .with_description("A quick job.")
        .add_condition(|c| {
            c.as_fetch()
                .require_items(["Scissors"], 1)?
                .as_elimination()
                .with_sequence_index(0)
                .eliminate_targets(["BP_Rat"], 1)
        })
        .unwrap()
        .add_currency_reward(10, None, None)
        .build()
        .unwrap();
    assert!(quest.conditions[0].referenced_items() == vec!["BP_Rat"]);
    let value = quest.to_value();
    assert!(value["Conditions"][0].get("RequiredItems").is_none());
}

#[test]
fn wrong_variant_error_names_the_method() {
    let err = QuestBuilder::new()
        .add_fetch_condition(|c| c.needed(1, 1))
        .unwrap_err();
    assert_eq!(
        err,
        BuilderError::WrongVariant {
            method: "needed",
            expected: ConditionKind::Interaction,
            actual: ConditionKind::Fetch,
        }
    );
    assert_eq!(
        err.to_string(),
        "needed() can only be used with Interaction conditions (builder is configured as Fetch)"
    );
}
