#![doc = include_str!("../../docs/game/injury.md")]
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::game::play::result::{PlayResult, PlayType};
use crate::game::tables::{
    HIGH_IMPACT_INJURY_MULTIPLIER, INJURY_RATE_PER_PLAY, MAX_INJURIES_PER_GAME,
};
use crate::player::{PlayerRef, Position, Squad, TeamSide};
use crate::rng::ProvablyFairRng;

// Injury-prone players get hurt twice as often
const INJURY_PRONE_MULTIPLIER: f64 = 2.0_f64;

// Questionable/out severity split
const P_QUESTIONABLE: f64 = 0.70_f64;

lazy_static! {
    static ref INJURY_DESCRIPTIONS: Vec<&'static str> = vec![
        "shaken up on the play",
        "limps off with help from the trainers",
        "grabbing at a hamstring on the way to the bench",
        "slow to get up after the hit",
        "taken to the medical tent for evaluation",
        "favoring his shoulder as he jogs off",
    ];
}

/// Relative injury likelihood by position
fn position_injury_weight(position: Position) -> f64 {
    match position {
        Position::RB => 1.5,
        Position::WR => 1.2,
        Position::TE => 1.1,
        Position::LB => 1.1,
        Position::OL | Position::DL | Position::CB | Position::S => 1.0,
        Position::QB => 0.8,
        Position::K | Position::P => 0.2,
    }
}

/// # `InjurySeverity` enum
///
/// How bad it looks. `Out` removes the player for the rest of the game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    Questionable,
    Out,
}

/// # `InjuryResult` struct
///
/// One injury event: who, how bad, and the trainers'-report line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InjuryResult {
    pub player: PlayerRef,
    pub severity: InjurySeverity,
    pub description: String,
}

/// # `InjuryTracker` struct
///
/// Owned by the engine; rolls once per play under a hard per-game cap and
/// tracks which roster indices are out.
///
/// Draw order on a live roll: the injury roll, the victim choice, the
/// severity roll, the description choice. A capped game consumes no
/// draws.
#[derive(Clone, Debug, Default)]
pub struct InjuryTracker {
    injuries: Vec<InjuryResult>,
    home_out: Vec<usize>,
    away_out: Vec<usize>,
}

impl InjuryTracker {
    /// Initialize a new injury tracker
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::injury::InjuryTracker;
    ///
    /// let my_tracker = InjuryTracker::new();
    /// assert!(my_tracker.injuries().is_empty());
    /// ```
    pub fn new() -> InjuryTracker {
        InjuryTracker::default()
    }

    /// Get every injury recorded so far
    pub fn injuries(&self) -> &[InjuryResult] {
        &self.injuries
    }

    /// Get the roster indices ruled out for a side
    pub fn out_for(&self, side: TeamSide) -> &[usize] {
        match side {
            TeamSide::Home => &self.home_out,
            TeamSide::Away => &self.away_out,
        }
    }

    /// Whether a play carries elevated injury risk
    fn is_high_impact(play: &PlayResult) -> bool {
        play.play_type() == PlayType::Sack
            || play.turnover().is_some()
            || (matches!(play.play_type(), PlayType::Run | PlayType::Scramble)
                && play.yards_gained().abs() >= 10)
    }

    /// Roll for an injury after a play
    ///
    /// Candidates come from both sides' available players, weighted by
    /// position and the injury-prone flag.
    pub fn roll(
        &mut self,
        play: &PlayResult,
        home: &Squad,
        away: &Squad,
        rng: &mut ProvablyFairRng,
    ) -> Result<Option<InjuryResult>, SimulationError> {
        if self.injuries.len() >= MAX_INJURIES_PER_GAME {
            return Ok(None);
        }
        let mut rate = INJURY_RATE_PER_PLAY;
        if Self::is_high_impact(play) {
            rate *= HIGH_IMPACT_INJURY_MULTIPLIER;
        }
        if !rng.probability(rate) {
            return Ok(None);
        }

        let all_positions = [
            Position::QB,
            Position::RB,
            Position::WR,
            Position::TE,
            Position::OL,
            Position::DL,
            Position::LB,
            Position::CB,
            Position::S,
            Position::K,
            Position::P,
        ];
        let mut candidates: Vec<(PlayerRef, f64)> = Vec::new();
        for squad in [home, away] {
            for (index, player) in squad.available_at(&all_positions) {
                let mut weight = position_injury_weight(player.position());
                if player.injury_prone() {
                    weight *= INJURY_PRONE_MULTIPLIER;
                }
                candidates.push((squad.reference(index), weight));
            }
        }
        if candidates.is_empty() {
            return Ok(None);
        }
        let victim = *rng.weighted_choice(&candidates)?;

        let severity = if rng.probability(P_QUESTIONABLE) {
            InjurySeverity::Questionable
        } else {
            InjurySeverity::Out
        };
        let description = INJURY_DESCRIPTIONS
            [rng.random_int(0, INJURY_DESCRIPTIONS.len() as i32 - 1) as usize];

        let injury = InjuryResult {
            player: victim,
            severity,
            description: String::from(description),
        };
        if severity == InjurySeverity::Out {
            match victim.side {
                TeamSide::Home => self.home_out.push(victim.index),
                TeamSide::Away => self.away_out.push(victim.index),
            }
        }
        self.injuries.push(injury.clone());
        Ok(Some(injury))
    }
}
