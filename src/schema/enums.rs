/// Closed value sets referenced by quests: NPC identities, skills
/// and the cooking gates used by fetch requirements.
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A closed enumeration whose members are written by exact name in JSON.
pub trait Named: Sized + Copy + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl Named for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s).ok_or_else(|| UnknownName {
                    kind: stringify!($name),
                    name: s.to_string(),
                })
            }
        }
    };
}

named_enum! {
    /// Quest-giving traders. `Fischerman` is the game's own spelling.
    Npc {
        Armorer,
        Banker,
        Barber,
        Bartender,
        Doctor,
        Fischerman,
        GeneralGoods,
        Mechanic,
    }
}

named_enum! {
    /// Skills that can receive experience from a reward.
    Skill {
        Archery,
        Aviation,
        Awareness,
        Boxing,
        Camouflage,
        Cooking,
        Demolition,
        Diving,
        Endurance,
        Engineering,
        Farming,
        Handgun,
        Medical,
        MeleeWeapons,
        Motorcycle,
        Rifles,
        Running,
        Sniping,
        Stealth,
        Survival,
        Tactics,
        Thievery,
    }
}

named_enum! {
    /// How far a food item has been cooked, least to most.
    CookLevel {
        Raw,
        Undercooked,
        Cooked,
        Overcooked,
        Burned,
    }
}

named_enum! {
    /// Quality of a cooked item, worst to best.
    CookQuality {
        Ruined,
        Bad,
        Poor,
        Good,
        Excellent,
        Perfect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npc_names_round_trip() {
        for npc in Npc::ALL {
            assert_eq!(npc.as_str().parse::<Npc>().unwrap(), *npc);
        }
        assert_eq!(Npc::ALL.len(), 8);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("bartender".parse::<Npc>().is_err());
        assert!("Fisherman".parse::<Npc>().is_err());
        let err = "Juggling".parse::<Skill>().unwrap_err();
        assert_eq!(err.to_string(), "unknown Skill 'Juggling'");
    }

    #[test]
    fn skill_set_is_complete() {
        assert_eq!(Skill::ALL.len(), 22);
        assert_eq!(Skill::from_name("MeleeWeapons"), Some(Skill::MeleeWeapons));
    }

    #[test]
    fn cook_levels_are_ordered() {
        assert!(CookLevel::Raw < CookLevel::Cooked);
        assert!(CookQuality::Ruined < CookQuality::Perfect);
        assert_eq!(CookQuality::ALL.len(), 6);
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&Npc::GeneralGoods).unwrap();
        assert_eq!(json, "\"GeneralGoods\"");
    }
}
