pub mod collection;
pub mod condition_builder;
pub mod io;
pub mod lint;
pub mod quest_builder;
pub mod reward_builder;
pub mod validation;
