pub mod blocked;
pub mod condition;
pub mod enums;
pub mod quest;
pub mod reward;
