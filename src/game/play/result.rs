#![doc = include_str!("../../../docs/game/play/result.md")]
use serde::{Deserialize, Serialize};

pub mod conversion;
pub mod fieldgoal;
pub mod kickoff;
pub mod pass;
pub mod punt;
pub mod run;

use crate::game::defense::DefensiveCall;
use crate::game::formation::FormationCall;
use crate::game::injury::InjuryResult;
use crate::game::penalty::PenaltyResult;
use crate::game::play::call::PlayCall;
use crate::game::state::GameState;
use crate::game::turnover::TurnoverResult;
use crate::player::{PlayerRef, Squad};

/// # `PlayType` enum
///
/// The observed outcome family of a play, which can differ from the call
/// (a called pass can resolve as a sack or a scramble)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Kickoff,
    OnsideKick,
    Run,
    Scramble,
    PassComplete,
    PassIncomplete,
    Sack,
    Punt,
    FieldGoalGood,
    FieldGoalMissed,
    ExtraPointGood,
    ExtraPointMissed,
    TwoPointSuccess,
    TwoPointFailure,
    Kneel,
    Spike,
    PenaltyNoPlay,
}

impl PlayType {
    /// Get whether the outcome was a dropback pass of some kind
    pub fn is_pass_play(&self) -> bool {
        matches!(
            self,
            PlayType::PassComplete | PlayType::PassIncomplete | PlayType::Sack
        )
    }

    /// Get whether the outcome was a scoring kick attempt or kick exchange
    pub fn is_special_teams(&self) -> bool {
        matches!(
            self,
            PlayType::Kickoff
                | PlayType::OnsideKick
                | PlayType::Punt
                | PlayType::FieldGoalGood
                | PlayType::FieldGoalMissed
                | PlayType::ExtraPointGood
                | PlayType::ExtraPointMissed
        )
    }
}

/// # `ScoringKind` enum
///
/// Enumerates the ways points go on the board
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringKind {
    Touchdown,
    FieldGoal,
    ExtraPoint,
    TwoPointConversion,
    Safety,
    PickSix,
    FumbleRecoveryTd,
}

impl ScoringKind {
    /// Get the point value of the score
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::ScoringKind;
    ///
    /// assert!(ScoringKind::Touchdown.points() == 6);
    /// assert!(ScoringKind::Safety.points() == 2);
    /// ```
    pub fn points(&self) -> u32 {
        match self {
            ScoringKind::Touchdown | ScoringKind::PickSix | ScoringKind::FumbleRecoveryTd => 6,
            ScoringKind::FieldGoal => 3,
            ScoringKind::ExtraPoint => 1,
            ScoringKind::TwoPointConversion | ScoringKind::Safety => 2,
        }
    }
}

/// # `ScoringResult` struct
///
/// Points awarded on a play: what kind, to which side, by whom
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub kind: ScoringKind,
    pub team: crate::player::TeamSide,
    pub points: u32,
    pub scorer: Option<PlayerRef>,
}

impl ScoringResult {
    /// Build a scoring result, deriving the point value from the kind
    pub fn new(
        kind: ScoringKind,
        team: crate::player::TeamSide,
        scorer: Option<PlayerRef>,
    ) -> ScoringResult {
        ScoringResult {
            kind,
            team,
            points: kind.points(),
            scorer,
        }
    }
}

/// # `KickResult` struct
///
/// The explicit placement record for a kicked ball (kickoff, onside,
/// punt, missed field goal). `landing_spot` is measured from the
/// receiving team's perspective; a recovery by the kicking team
/// (`recovered_by_kicking_team`) keeps the kicking-team frame instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KickResult {
    pub landing_spot: u32,
    pub touchback: bool,
    pub out_of_bounds: bool,
    pub fair_catch: bool,
    pub muffed: bool,
    pub recovered_by_kicking_team: bool,
    pub return_yards: i32,
}

impl Default for KickResult {
    fn default() -> Self {
        KickResult {
            landing_spot: 25,
            touchback: false,
            out_of_bounds: false,
            fair_catch: false,
            muffed: false,
            recovered_by_kicking_team: false,
            return_yards: 0,
        }
    }
}

/// # `ResolutionContext` struct
///
/// Everything a play resolver reads: the situation snapshot, both squads,
/// the team overalls, normalized momentum, and the pre-snap packages.
/// Momentum is in `[-1, 1]`, positive favoring the offense.
pub struct ResolutionContext<'a> {
    pub state: &'a GameState,
    pub offense: &'a Squad<'a>,
    pub defense: &'a Squad<'a>,
    pub offense_rating: u32,
    pub defense_rating: u32,
    pub momentum: f64,
    pub formation: FormationCall,
    pub defensive_call: DefensiveCall,
    pub hurry_up: bool,
}

impl<'a> ResolutionContext<'a> {
    /// The momentum term applied to sampled yardage
    pub fn momentum_factor(&self, scale: f64) -> f64 {
        1.0 + self.momentum * scale
    }

    /// The offense-vs-defense team rating differential, -29..=29
    pub fn rating_diff(&self) -> f64 {
        self.offense_rating as f64 - self.defense_rating as f64
    }
}

/// # `PlayResult` struct
///
/// The fully resolved outcome of one play: what happened, to whom, how far
/// the ball moved, what it cost on the clock, and any attached turnover,
/// penalty, injury, or scoring sub-results. Frozen once the engine archives
/// it in an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub(crate) play_type: PlayType,
    pub(crate) call: PlayCall,
    pub(crate) description: String,
    pub(crate) yards_gained: i32,
    pub(crate) passer: Option<PlayerRef>,
    pub(crate) rusher: Option<PlayerRef>,
    pub(crate) receiver: Option<PlayerRef>,
    pub(crate) defender: Option<PlayerRef>,
    pub(crate) kicker: Option<PlayerRef>,
    pub(crate) kick: Option<KickResult>,
    pub(crate) turnover: Option<TurnoverResult>,
    pub(crate) penalty: Option<PenaltyResult>,
    pub(crate) injury: Option<InjuryResult>,
    pub(crate) scoring: Option<ScoringResult>,
    pub(crate) clock_elapsed: u32,
    pub(crate) is_clock_stopped: bool,
    pub(crate) is_first_down: bool,
    pub(crate) is_touchdown: bool,
    pub(crate) is_safety: bool,
}

impl PlayResult {
    /// Get the observed outcome family
    pub fn play_type(&self) -> PlayType {
        self.play_type
    }

    /// Get the original play call
    pub fn call(&self) -> PlayCall {
        self.call
    }

    /// Get the human description of the play
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the net yards gained (negative for losses)
    pub fn yards_gained(&self) -> i32 {
        self.yards_gained
    }

    /// Get the passer on the play, if any
    pub fn passer(&self) -> Option<PlayerRef> {
        self.passer
    }

    /// Get the ball carrier on the play, if any
    pub fn rusher(&self) -> Option<PlayerRef> {
        self.rusher
    }

    /// Get the targeted receiver on the play, if any
    pub fn receiver(&self) -> Option<PlayerRef> {
        self.receiver
    }

    /// Get the defender credited on the play, if any
    pub fn defender(&self) -> Option<PlayerRef> {
        self.defender
    }

    /// Get the kicker or punter on the play, if any
    pub fn kicker(&self) -> Option<PlayerRef> {
        self.kicker
    }

    /// Get the kick placement record, if any
    pub fn kick(&self) -> Option<&KickResult> {
        self.kick.as_ref()
    }

    /// Get the attached turnover, if any
    pub fn turnover(&self) -> Option<&TurnoverResult> {
        self.turnover.as_ref()
    }

    /// Get the attached penalty, if any
    pub fn penalty(&self) -> Option<&PenaltyResult> {
        self.penalty.as_ref()
    }

    /// Get the attached injury, if any
    pub fn injury(&self) -> Option<&InjuryResult> {
        self.injury.as_ref()
    }

    /// Get the attached score, if any
    pub fn scoring(&self) -> Option<&ScoringResult> {
        self.scoring.as_ref()
    }

    /// Get the game-clock seconds the play consumed
    pub fn clock_elapsed(&self) -> u32 {
        self.clock_elapsed
    }

    /// Get whether the play stops the clock
    pub fn is_clock_stopped(&self) -> bool {
        self.is_clock_stopped
    }

    /// Get whether the play gained the line to make
    pub fn is_first_down(&self) -> bool {
        self.is_first_down
    }

    /// Get whether the play scored a touchdown
    pub fn is_touchdown(&self) -> bool {
        self.is_touchdown
    }

    /// Get whether the play ended in a safety
    pub fn is_safety(&self) -> bool {
        self.is_safety
    }

    /// Get whether possession changes hands because of this play
    pub fn changes_possession(&self) -> bool {
        self.turnover.is_some()
            || matches!(
                self.play_type,
                PlayType::Punt | PlayType::Kickoff | PlayType::OnsideKick
            )
    }
}

impl std::fmt::Display for PlayResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// # `PlayResultBuilder` struct
///
/// Builder for assembling a `PlayResult` field by field; the resolvers and
/// the tests both construct results through it
#[derive(Clone, Debug)]
pub struct PlayResultBuilder {
    result: PlayResult,
}

impl PlayResultBuilder {
    /// Start a builder from the outcome family and the originating call
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::call::PlayCall;
    /// use gridiron_core::game::play::result::{PlayResultBuilder, PlayType};
    ///
    /// let my_result = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
    ///     .yards_gained(7)
    ///     .description("off tackle for 7")
    ///     .build();
    /// assert!(my_result.yards_gained() == 7);
    /// ```
    pub fn new(play_type: PlayType, call: PlayCall) -> PlayResultBuilder {
        PlayResultBuilder {
            result: PlayResult {
                play_type,
                call,
                description: String::new(),
                yards_gained: 0,
                passer: None,
                rusher: None,
                receiver: None,
                defender: None,
                kicker: None,
                kick: None,
                turnover: None,
                penalty: None,
                injury: None,
                scoring: None,
                clock_elapsed: 0,
                is_clock_stopped: false,
                is_first_down: false,
                is_touchdown: false,
                is_safety: false,
            },
        }
    }

    /// Set the human description
    pub fn description(mut self, description: &str) -> Self {
        self.result.description = String::from(description);
        self
    }

    /// Set the net yards gained
    pub fn yards_gained(mut self, yards_gained: i32) -> Self {
        self.result.yards_gained = yards_gained;
        self
    }

    /// Set the passer reference
    pub fn passer(mut self, passer: PlayerRef) -> Self {
        self.result.passer = Some(passer);
        self
    }

    /// Set the ball-carrier reference
    pub fn rusher(mut self, rusher: PlayerRef) -> Self {
        self.result.rusher = Some(rusher);
        self
    }

    /// Set the receiver reference
    pub fn receiver(mut self, receiver: PlayerRef) -> Self {
        self.result.receiver = Some(receiver);
        self
    }

    /// Set the defender reference
    pub fn defender(mut self, defender: PlayerRef) -> Self {
        self.result.defender = Some(defender);
        self
    }

    /// Set the kicker reference
    pub fn kicker(mut self, kicker: PlayerRef) -> Self {
        self.result.kicker = Some(kicker);
        self
    }

    /// Attach a kick placement record
    pub fn kick(mut self, kick: KickResult) -> Self {
        self.result.kick = Some(kick);
        self
    }

    /// Attach a turnover
    pub fn turnover(mut self, turnover: TurnoverResult) -> Self {
        self.result.turnover = Some(turnover);
        self
    }

    /// Attach a penalty
    pub fn penalty(mut self, penalty: PenaltyResult) -> Self {
        self.result.penalty = Some(penalty);
        self
    }

    /// Attach a score
    pub fn scoring(mut self, scoring: ScoringResult) -> Self {
        self.result.scoring = Some(scoring);
        self
    }

    /// Set the clock seconds consumed
    pub fn clock_elapsed(mut self, clock_elapsed: u32) -> Self {
        self.result.clock_elapsed = clock_elapsed;
        self
    }

    /// Set whether the play stops the clock
    pub fn clock_stopped(mut self, is_clock_stopped: bool) -> Self {
        self.result.is_clock_stopped = is_clock_stopped;
        self
    }

    /// Set whether the play moved the chains
    pub fn first_down(mut self, is_first_down: bool) -> Self {
        self.result.is_first_down = is_first_down;
        self
    }

    /// Set whether the play scored a touchdown
    pub fn touchdown(mut self, is_touchdown: bool) -> Self {
        self.result.is_touchdown = is_touchdown;
        self
    }

    /// Set whether the play ended in a safety
    pub fn safety(mut self, is_safety: bool) -> Self {
        self.result.is_safety = is_safety;
        self
    }

    /// Finish the build
    pub fn build(self) -> PlayResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_points_derived_from_kind() {
        let score = ScoringResult::new(ScoringKind::PickSix, crate::player::TeamSide::Away, None);
        assert_eq!(score.points, 6);
        let score = ScoringResult::new(
            ScoringKind::TwoPointConversion,
            crate::player::TeamSide::Home,
            None,
        );
        assert_eq!(score.points, 2);
    }

    #[test]
    fn test_builder_round_trip() {
        let result = PlayResultBuilder::new(PlayType::PassComplete, PlayCall::PassMedium)
            .yards_gained(18)
            .first_down(true)
            .clock_elapsed(31)
            .description("crossing route, first down")
            .build();
        assert_eq!(result.play_type(), PlayType::PassComplete);
        assert_eq!(result.call(), PlayCall::PassMedium);
        assert!(result.is_first_down());
        assert_eq!(result.clock_elapsed(), 31);
        assert!(!result.changes_possession());
    }

    #[test]
    fn test_special_teams_classification() {
        assert!(PlayType::Punt.is_special_teams());
        assert!(PlayType::FieldGoalMissed.is_special_teams());
        assert!(!PlayType::Sack.is_special_teams());
        assert!(PlayType::Sack.is_pass_play());
        assert!(!PlayType::Scramble.is_pass_play());
    }
}
