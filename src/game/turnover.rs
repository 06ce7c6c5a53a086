#![doc = include_str!("../../docs/game/turnover.md")]
use serde::{Deserialize, Serialize};

use crate::game::state::GameState;
use crate::game::tables::PICK_SIX_RATE;
use crate::player::TeamSide;
use crate::rng::ProvablyFairRng;

// Interception return profile
const INT_RETURN_MEAN: f64 = 12.0_f64;
const INT_RETURN_STD: f64 = 10.0_f64;
const INT_RETURN_MAX: f64 = 80.0_f64;

/// # `TurnoverKind` enum
///
/// How the ball changed hands (or nearly did: an offensive fumble
/// recovery keeps possession but is still recorded)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverKind {
    Fumble,
    Interception,
    FumbleRecovery,
    TurnoverOnDowns,
    MuffedPunt,
}

/// # `TurnoverResult` struct
///
/// A change-of-possession record: what kind, who ended up with the ball,
/// and what the recovery return produced
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnoverResult {
    pub kind: TurnoverKind,
    pub recovered_by: TeamSide,
    pub return_yards: i32,
    pub returned_for_td: bool,
}

impl TurnoverResult {
    /// Build a turnover record
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::turnover::{TurnoverKind, TurnoverResult};
    /// use gridiron_core::player::TeamSide;
    ///
    /// let my_turnover = TurnoverResult::new(
    ///     TurnoverKind::Interception, TeamSide::Away, 12, false,
    /// );
    /// assert!(my_turnover.return_yards == 12);
    /// ```
    pub fn new(
        kind: TurnoverKind,
        recovered_by: TeamSide,
        return_yards: i32,
        returned_for_td: bool,
    ) -> TurnoverResult {
        TurnoverResult {
            kind,
            recovered_by,
            return_yards,
            returned_for_td,
        }
    }

    /// Get whether this record actually flips possession
    pub fn changes_possession(&self, possession: TeamSide) -> bool {
        self.recovered_by != possession
    }

    /// The new ball position from the recovering team's perspective
    ///
    /// The frame flips: `100 - spot + return`, clamped to the legal range.
    /// A return touchdown reaches 100 and is handled by the caller via
    /// `returned_for_td`. Muffed punts and turnovers on downs keep the
    /// spot (zero return) and only flip the frame.
    pub fn spot_after(&self, ball_position: u32) -> u32 {
        let flipped = 100_i32 - ball_position as i32 + self.return_yards;
        GameState::clamp_ball(flipped)
    }
}

impl std::fmt::Display for TurnoverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind_str = match self.kind {
            TurnoverKind::Fumble => "FUMBLE, recovered by the defense",
            TurnoverKind::Interception => "INTERCEPTED",
            TurnoverKind::FumbleRecovery => "FUMBLE, recovered by the offense",
            TurnoverKind::TurnoverOnDowns => "turnover on downs",
            TurnoverKind::MuffedPunt => "MUFFED, recovered by the kicking team",
        };
        if self.returned_for_td {
            write!(f, "{}, returned {} yards for a TOUCHDOWN", kind_str, self.return_yards)
        } else if self.return_yards > 0 {
            write!(f, "{}, returned {} yards", kind_str, self.return_yards)
        } else {
            f.write_str(kind_str)
        }
    }
}

/// Sample an interception's return: yards from a clamped normal, then the
/// pick-six roll
///
/// Draw order: return yards (two draws, Box-Muller), pick-six (one draw).
pub fn interception_return(rng: &mut ProvablyFairRng) -> (i32, bool) {
    let return_yards = rng
        .gaussian(INT_RETURN_MEAN, INT_RETURN_STD, Some(0.0), Some(INT_RETURN_MAX))
        .round() as i32;
    let pick_six = rng.probability(PICK_SIX_RATE);
    (return_yards, pick_six)
}
