#![doc = include_str!("../docs/game.md")]
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

pub mod clock;
pub mod defense;
pub mod drive;
pub mod engine;
pub mod event;
pub mod formation;
pub mod injury;
pub mod narrative;
pub mod penalty;
pub mod play;
pub mod state;
pub mod stats;
pub mod tables;
pub mod turnover;

/// # `GameType` enum
///
/// The kind of game being simulated. Only the overtime driver cares:
/// regular-season overtime may end in a tie, playoff overtime cannot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Regular,
    WildCard,
    Divisional,
    ConferenceChampionship,
    SuperBowl,
}

impl GameType {
    /// Get whether this game type follows playoff overtime rules
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::GameType;
    ///
    /// assert!(!GameType::Regular.is_playoff());
    /// assert!(GameType::SuperBowl.is_playoff());
    /// ```
    pub fn is_playoff(&self) -> bool {
        !matches!(self, GameType::Regular)
    }
}

impl std::str::FromStr for GameType {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(GameType::Regular),
            "wild_card" => Ok(GameType::WildCard),
            "divisional" => Ok(GameType::Divisional),
            "conference_championship" => Ok(GameType::ConferenceChampionship),
            "super_bowl" => Ok(GameType::SuperBowl),
            other => Err(SimulationError::UnsupportedGameType(String::from(other))),
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GameType::Regular => "regular",
            GameType::WildCard => "wild_card",
            GameType::Divisional => "divisional",
            GameType::ConferenceChampionship => "conference_championship",
            GameType::SuperBowl => "super_bowl",
        };
        f.write_str(label)
    }
}
