#![doc = include_str!("../../docs/game/penalty.md")]
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::game::play::result::PlayResult;
use crate::game::state::GameState;
use crate::game::tables::PENALTY_RATE;
use crate::player::{PlayerRef, Position, Squad, TeamSide};
use crate::rng::ProvablyFairRng;

// Chance an accepted flag is answered by one on the other side and the
// fouls offset
const OFFSETTING_RATE: f64 = 0.05_f64;

// Estimated downfield foul spot for defensive pass interference
const SPOT_FOUL_DEPTH: u32 = 15;

/// # `PenaltyKind` enum
///
/// The penalty table. Each kind carries metadata: base yardage, automatic
/// first down, pre-snap, spot foul, loss of down, and a frequency weight
/// for the table roll.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    FalseStart,
    DelayOfGame,
    IllegalFormation,
    IllegalShift,
    IllegalMotion,
    OffensiveHolding,
    OffensivePassInterference,
    IntentionalGrounding,
    IneligibleReceiverDownfield,
    ChopBlock,
    IllegalBlockInTheBack,
    Tripping,
    Offsides,
    Encroachment,
    NeutralZoneInfraction,
    TooManyMen,
    DefensiveHolding,
    IllegalContact,
    DefensivePassInterference,
    RoughingThePasser,
    RoughingTheKicker,
    Facemask,
    UnnecessaryRoughness,
    UnsportsmanlikeConduct,
}

/// # `PenaltyMetadata` struct
///
/// The static facts about a penalty kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenaltyMetadata {
    pub yards: u32,
    pub is_auto_first_down: bool,
    pub is_pre_snap: bool,
    pub is_spot_foul: bool,
    pub loss_of_down: bool,
    pub frequency_weight: f64,
}

/// Which side of the ball a kind is charged to. Ambiguous kinds carry a
/// biased coin weight for the defense.
#[derive(Clone, Copy, Debug, PartialEq)]
enum SideClass {
    Offense,
    Defense,
    Either { defense_bias: f64 },
}

impl PenaltyKind {
    /// Get the static metadata for this kind
    pub fn metadata(&self) -> PenaltyMetadata {
        let (yards, auto_fd, pre_snap, spot, lod, freq) = match self {
            PenaltyKind::FalseStart => (5, false, true, false, false, 9.0),
            PenaltyKind::DelayOfGame => (5, false, true, false, false, 6.0),
            PenaltyKind::IllegalFormation => (5, false, true, false, false, 3.0),
            PenaltyKind::IllegalShift => (5, false, true, false, false, 2.0),
            PenaltyKind::IllegalMotion => (5, false, true, false, false, 2.0),
            PenaltyKind::OffensiveHolding => (10, false, false, false, false, 10.0),
            PenaltyKind::OffensivePassInterference => (10, false, false, false, false, 3.0),
            PenaltyKind::IntentionalGrounding => (10, false, false, true, true, 2.0),
            PenaltyKind::IneligibleReceiverDownfield => (5, false, false, false, false, 2.0),
            PenaltyKind::ChopBlock => (15, false, false, false, false, 1.0),
            PenaltyKind::IllegalBlockInTheBack => (10, false, false, false, false, 4.0),
            PenaltyKind::Tripping => (10, false, false, false, false, 1.0),
            PenaltyKind::Offsides => (5, false, true, false, false, 6.0),
            PenaltyKind::Encroachment => (5, false, true, false, false, 3.0),
            PenaltyKind::NeutralZoneInfraction => (5, false, true, false, false, 3.0),
            PenaltyKind::TooManyMen => (5, false, true, false, false, 2.0),
            PenaltyKind::DefensiveHolding => (5, true, false, false, false, 5.0),
            PenaltyKind::IllegalContact => (5, true, false, false, false, 3.0),
            PenaltyKind::DefensivePassInterference => (0, true, false, true, false, 5.0),
            PenaltyKind::RoughingThePasser => (15, true, false, false, false, 3.0),
            PenaltyKind::RoughingTheKicker => (15, true, false, false, false, 1.0),
            PenaltyKind::Facemask => (15, true, false, false, false, 3.0),
            PenaltyKind::UnnecessaryRoughness => (15, true, false, false, false, 3.0),
            PenaltyKind::UnsportsmanlikeConduct => (15, false, false, false, false, 2.0),
        };
        PenaltyMetadata {
            yards,
            is_auto_first_down: auto_fd,
            is_pre_snap: pre_snap,
            is_spot_foul: spot,
            loss_of_down: lod,
            frequency_weight: freq,
        }
    }

    /// Get whether this kind can only be flagged on a pass play
    pub fn requires_pass(&self) -> bool {
        matches!(
            self,
            PenaltyKind::OffensivePassInterference
                | PenaltyKind::IntentionalGrounding
                | PenaltyKind::IneligibleReceiverDownfield
                | PenaltyKind::DefensiveHolding
                | PenaltyKind::IllegalContact
                | PenaltyKind::DefensivePassInterference
                | PenaltyKind::RoughingThePasser
        )
    }

    fn side_class(&self) -> SideClass {
        match self {
            PenaltyKind::FalseStart
            | PenaltyKind::DelayOfGame
            | PenaltyKind::IllegalFormation
            | PenaltyKind::IllegalShift
            | PenaltyKind::IllegalMotion
            | PenaltyKind::OffensiveHolding
            | PenaltyKind::OffensivePassInterference
            | PenaltyKind::IntentionalGrounding
            | PenaltyKind::IneligibleReceiverDownfield
            | PenaltyKind::ChopBlock
            | PenaltyKind::Tripping => SideClass::Offense,
            PenaltyKind::Offsides
            | PenaltyKind::Encroachment
            | PenaltyKind::NeutralZoneInfraction
            | PenaltyKind::DefensiveHolding
            | PenaltyKind::IllegalContact
            | PenaltyKind::DefensivePassInterference
            | PenaltyKind::RoughingThePasser
            | PenaltyKind::RoughingTheKicker => SideClass::Defense,
            PenaltyKind::IllegalBlockInTheBack => SideClass::Either { defense_bias: 0.75 },
            PenaltyKind::TooManyMen => SideClass::Either { defense_bias: 0.7 },
            PenaltyKind::Facemask => SideClass::Either { defense_bias: 0.6 },
            PenaltyKind::UnnecessaryRoughness => SideClass::Either { defense_bias: 0.55 },
            PenaltyKind::UnsportsmanlikeConduct => SideClass::Either { defense_bias: 0.5 },
        }
    }

    /// Get the flag announcement label
    pub fn label(&self) -> &'static str {
        match self {
            PenaltyKind::FalseStart => "False start",
            PenaltyKind::DelayOfGame => "Delay of game",
            PenaltyKind::IllegalFormation => "Illegal formation",
            PenaltyKind::IllegalShift => "Illegal shift",
            PenaltyKind::IllegalMotion => "Illegal motion",
            PenaltyKind::OffensiveHolding => "Holding",
            PenaltyKind::OffensivePassInterference => "Offensive pass interference",
            PenaltyKind::IntentionalGrounding => "Intentional grounding",
            PenaltyKind::IneligibleReceiverDownfield => "Ineligible receiver downfield",
            PenaltyKind::ChopBlock => "Chop block",
            PenaltyKind::IllegalBlockInTheBack => "Illegal block in the back",
            PenaltyKind::Tripping => "Tripping",
            PenaltyKind::Offsides => "Offsides",
            PenaltyKind::Encroachment => "Encroachment",
            PenaltyKind::NeutralZoneInfraction => "Neutral zone infraction",
            PenaltyKind::TooManyMen => "Too many men on the field",
            PenaltyKind::DefensiveHolding => "Defensive holding",
            PenaltyKind::IllegalContact => "Illegal contact",
            PenaltyKind::DefensivePassInterference => "Defensive pass interference",
            PenaltyKind::RoughingThePasser => "Roughing the passer",
            PenaltyKind::RoughingTheKicker => "Roughing the kicker",
            PenaltyKind::Facemask => "Facemask",
            PenaltyKind::UnnecessaryRoughness => "Unnecessary roughness",
            PenaltyKind::UnsportsmanlikeConduct => "Unsportsmanlike conduct",
        }
    }

    /// The positional weights a flag on this kind is attributed over
    fn attribution_weights(&self, on_defense: bool) -> Vec<(Position, f64)> {
        match self {
            PenaltyKind::DelayOfGame | PenaltyKind::IntentionalGrounding => {
                vec![(Position::QB, 10.0)]
            }
            PenaltyKind::OffensivePassInterference => {
                vec![(Position::WR, 8.0), (Position::TE, 2.0)]
            }
            PenaltyKind::IneligibleReceiverDownfield => {
                vec![(Position::OL, 9.0), (Position::TE, 1.0)]
            }
            PenaltyKind::OffensiveHolding | PenaltyKind::ChopBlock => {
                vec![(Position::OL, 8.0), (Position::TE, 2.0)]
            }
            PenaltyKind::FalseStart
            | PenaltyKind::IllegalFormation
            | PenaltyKind::IllegalShift
            | PenaltyKind::IllegalMotion => vec![
                (Position::OL, 7.0),
                (Position::TE, 1.5),
                (Position::WR, 1.5),
            ],
            PenaltyKind::Offsides
            | PenaltyKind::Encroachment
            | PenaltyKind::NeutralZoneInfraction => {
                vec![(Position::DL, 8.0), (Position::LB, 2.0)]
            }
            PenaltyKind::DefensiveHolding
            | PenaltyKind::IllegalContact
            | PenaltyKind::DefensivePassInterference => {
                vec![(Position::CB, 7.0), (Position::S, 3.0)]
            }
            PenaltyKind::RoughingThePasser => vec![(Position::DL, 7.0), (Position::LB, 3.0)],
            PenaltyKind::RoughingTheKicker => vec![(Position::DL, 6.0), (Position::LB, 4.0)],
            _ if on_defense => vec![
                (Position::LB, 3.0),
                (Position::S, 3.0),
                (Position::DL, 2.0),
                (Position::CB, 2.0),
            ],
            _ => vec![
                (Position::OL, 4.0),
                (Position::TE, 3.0),
                (Position::RB, 3.0),
            ],
        }
    }
}

lazy_static! {
    // Every kind, in table order
    static ref FULL_TABLE: Vec<PenaltyKind> = vec![
        PenaltyKind::FalseStart,
        PenaltyKind::DelayOfGame,
        PenaltyKind::IllegalFormation,
        PenaltyKind::IllegalShift,
        PenaltyKind::IllegalMotion,
        PenaltyKind::OffensiveHolding,
        PenaltyKind::OffensivePassInterference,
        PenaltyKind::IntentionalGrounding,
        PenaltyKind::IneligibleReceiverDownfield,
        PenaltyKind::ChopBlock,
        PenaltyKind::IllegalBlockInTheBack,
        PenaltyKind::Tripping,
        PenaltyKind::Offsides,
        PenaltyKind::Encroachment,
        PenaltyKind::NeutralZoneInfraction,
        PenaltyKind::TooManyMen,
        PenaltyKind::DefensiveHolding,
        PenaltyKind::IllegalContact,
        PenaltyKind::DefensivePassInterference,
        PenaltyKind::RoughingThePasser,
        PenaltyKind::RoughingTheKicker,
        PenaltyKind::Facemask,
        PenaltyKind::UnnecessaryRoughness,
        PenaltyKind::UnsportsmanlikeConduct,
    ];

    // The subset that can be flagged on a punt or field-goal play
    static ref SPECIAL_TEAMS_TABLE: Vec<PenaltyKind> = vec![
        PenaltyKind::OffensiveHolding,
        PenaltyKind::IllegalBlockInTheBack,
        PenaltyKind::Tripping,
        PenaltyKind::Offsides,
        PenaltyKind::TooManyMen,
        PenaltyKind::RoughingTheKicker,
        PenaltyKind::Facemask,
        PenaltyKind::UnnecessaryRoughness,
        PenaltyKind::UnsportsmanlikeConduct,
    ];
}

/// # `PenaltyResult` struct
///
/// A flag thrown on a play: the kind, the charged side and player, the
/// assessed yardage (half-the-distance already applied), and the
/// accept/decline outcome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenaltyResult {
    pub kind: PenaltyKind,
    pub side: TeamSide,
    pub player: Option<PlayerRef>,
    pub yards: u32,
    pub is_auto_first_down: bool,
    pub is_spot_foul: bool,
    pub declined: bool,
    pub offsetting: bool,
    pub description: String,
}

impl PenaltyResult {
    /// Get whether the flag is on the possessing team
    pub fn on_offense(&self, possession: TeamSide) -> bool {
        self.side == possession
    }

    /// Get whether the flag changes the ball at all
    pub fn is_enforced(&self) -> bool {
        !self.declined && !self.offsetting
    }

    /// Get whether the flag is a pre-snap foul
    pub fn is_pre_snap(&self) -> bool {
        self.kind.metadata().is_pre_snap
    }
}

impl std::fmt::Display for PenaltyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// # `PenaltyEnforcement` struct
///
/// Where the ball, down, and distance land once a flag is walked off.
/// `nullify_play` means the play's yardage and effects are wiped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenaltyEnforcement {
    pub ball_position: u32,
    pub down: u32,
    pub yards_to_go: u32,
    pub nullify_play: bool,
    pub automatic_first_down: bool,
}

/// # `PenaltySimulator` struct
///
/// Rolls for a flag after a post-snap play, picks the kind from the
/// context-filtered table, charges a side and player, decides
/// accept/decline from the wronged coach's perspective, and computes
/// enforcement.
///
/// Draw order: flag roll, kind choice, side coin (ambiguous kinds only),
/// player choice (when candidates exist), offsetting roll (post-snap
/// kinds only).
#[derive(Clone, Debug, Default)]
pub struct PenaltySimulator {}

impl PenaltySimulator {
    /// Initialize a new penalty simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::penalty::PenaltySimulator;
    ///
    /// let my_sim = PenaltySimulator::new();
    /// ```
    pub fn new() -> PenaltySimulator {
        PenaltySimulator::default()
    }

    /// The assessed yardage for a kind at a line of scrimmage, with the
    /// half-the-distance rule and spot-foul estimates baked in
    fn assessed_yards(&self, kind: PenaltyKind, on_offense: bool, scrimmage: u32) -> u32 {
        let meta = kind.metadata();
        if kind == PenaltyKind::DefensivePassInterference {
            // Estimated foul spot: fifteen downfield, clamped short of the
            // goal line
            return SPOT_FOUL_DEPTH.min((100 - scrimmage).saturating_sub(1));
        }
        if on_offense {
            meta.yards.min(scrimmage / 2)
        } else {
            meta.yards.min((100 - scrimmage) / 2)
        }
    }

    /// Decide accept/decline from the perspective of the side that was
    /// fouled
    fn accept(&self, penalty: &PenaltyResult, play: &PlayResult, state: &GameState) -> bool {
        let on_offense = penalty.side == state.possession();
        let decider = penalty.side.opponent();

        // A pre-snap offensive foul kills the play before it starts
        if penalty.is_pre_snap() && on_offense {
            return true;
        }

        // Keep a turnover over any yardage
        if let Some(turnover) = play.turnover() {
            if turnover.recovered_by == decider {
                return false;
            }
        }

        if on_offense {
            // Defense declines when the play already lost more than the
            // flag would, or ended in a safety
            if play.is_safety() {
                return false;
            }
            play.is_touchdown()
                || play.is_first_down()
                || play.yards_gained() > -(penalty.yards as i32)
        } else {
            // Offense keeps a touchdown over any flag
            if play.is_touchdown() {
                return false;
            }
            (penalty.is_auto_first_down && !play.is_first_down())
                || penalty.yards as i32 > play.yards_gained()
        }
    }

    /// Roll for and resolve a flag on a post-snap play
    ///
    /// Returns `None` on the common no-flag path. The play passed in is
    /// the penalty-free resolution; the caller attaches the returned flag
    /// and re-enforces.
    pub fn sim(
        &self,
        state: &GameState,
        play: &PlayResult,
        offense: &Squad,
        defense: &Squad,
        rng: &mut ProvablyFairRng,
    ) -> Result<Option<PenaltyResult>, SimulationError> {
        if !rng.probability(PENALTY_RATE) {
            return Ok(None);
        }

        // Filter the table by context
        let special_teams = play.play_type().is_special_teams();
        let is_pass = play.play_type().is_pass_play();
        let table: Vec<PenaltyKind> = if special_teams {
            SPECIAL_TEAMS_TABLE.clone()
        } else {
            FULL_TABLE
                .iter()
                .copied()
                .filter(|kind| is_pass || !kind.requires_pass())
                .collect()
        };
        let options: Vec<(PenaltyKind, f64)> = table
            .into_iter()
            .map(|kind| (kind, kind.metadata().frequency_weight))
            .collect();
        let kind = *rng.weighted_choice(&options)?;

        // Charge a side
        let side = match kind.side_class() {
            SideClass::Offense => state.possession(),
            SideClass::Defense => state.possession().opponent(),
            SideClass::Either { defense_bias } => {
                if rng.probability(defense_bias) {
                    state.possession().opponent()
                } else {
                    state.possession()
                }
            }
        };
        let on_offense = side == state.possession();

        // Charge a player by the kind's positional weight map
        let squad = if side == offense.side() { offense } else { defense };
        let weights = kind.attribution_weights(!on_offense);
        let positions: Vec<Position> = weights.iter().map(|(p, _)| *p).collect();
        let mut candidates: Vec<(usize, f64)> = squad
            .available_at(&positions)
            .into_iter()
            .map(|(i, p)| {
                let w = weights
                    .iter()
                    .find(|(pos, _)| *pos == p.position())
                    .map(|(_, w)| *w)
                    .unwrap_or(1.0);
                (i, w)
            })
            .collect();
        if candidates.is_empty() {
            candidates = squad
                .available_at(&[
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
                ])
                .into_iter()
                .map(|(i, _)| (i, 1.0))
                .collect();
        }
        let player = if candidates.is_empty() {
            None
        } else {
            Some(squad.reference(*rng.weighted_choice(&candidates)?))
        };

        let meta = kind.metadata();
        let yards = self.assessed_yards(kind, on_offense, state.ball_position());

        // Post-snap flags can draw an answering flag and offset
        let offsetting = !meta.is_pre_snap && rng.probability(OFFSETTING_RATE);

        let mut penalty = PenaltyResult {
            kind,
            side,
            player,
            yards,
            is_auto_first_down: meta.is_auto_first_down && !on_offense,
            is_spot_foul: meta.is_spot_foul,
            declined: false,
            offsetting,
            description: String::new(),
        };

        if !offsetting {
            penalty.declined = !self.accept(&penalty, play, state);
        }

        let side_str = if on_offense { "offense" } else { "defense" };
        penalty.description = if penalty.offsetting {
            format!("{} against the {}, offsetting penalties, replay the down", kind.label(), side_str)
        } else if penalty.declined {
            format!("{} against the {}, declined", kind.label(), side_str)
        } else if penalty.is_auto_first_down {
            format!(
                "{} against the {}, {} yards and an automatic first down",
                kind.label(),
                side_str,
                penalty.yards
            )
        } else {
            format!(
                "{} against the {}, {} yards",
                kind.label(),
                side_str,
                penalty.yards
            )
        };
        Ok(Some(penalty))
    }

    /// Walk off an accepted (or offsetting) flag against the pre-play
    /// state
    pub fn enforce(&self, state: &GameState, penalty: &PenaltyResult) -> PenaltyEnforcement {
        let scrimmage = state.ball_position();
        if penalty.offsetting {
            // Offsetting fouls wipe the play and replay the down in place
            return PenaltyEnforcement {
                ball_position: scrimmage,
                down: state.down(),
                yards_to_go: state.yards_to_go(),
                nullify_play: true,
                automatic_first_down: false,
            };
        }

        let meta = penalty.kind.metadata();
        if penalty.on_offense(state.possession()) {
            let ball_position = GameState::clamp_ball(scrimmage as i32 - penalty.yards as i32);
            let yards_to_go = state.yards_to_go() + (scrimmage - ball_position);
            // Loss-of-down fouls burn the down; everything else replays it
            let down = if meta.loss_of_down {
                state.down() + 1
            } else {
                state.down()
            };
            PenaltyEnforcement {
                ball_position,
                down,
                yards_to_go,
                nullify_play: true,
                automatic_first_down: false,
            }
        } else {
            let ball_position = GameState::clamp_ball(scrimmage as i32 + penalty.yards as i32);
            let gained = ball_position - scrimmage;
            if penalty.is_auto_first_down || gained >= state.yards_to_go() {
                PenaltyEnforcement {
                    ball_position,
                    down: 1,
                    yards_to_go: 10.min(100 - ball_position),
                    nullify_play: true,
                    automatic_first_down: true,
                }
            } else {
                PenaltyEnforcement {
                    ball_position,
                    down: state.down(),
                    yards_to_go: state.yards_to_go() - gained,
                    nullify_play: true,
                    automatic_first_down: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play::call::PlayCall;
    use crate::game::play::result::{PlayResultBuilder, PlayType};
    use crate::player::Player;

    fn penalty(kind: PenaltyKind, side: TeamSide, yards: u32) -> PenaltyResult {
        let meta = kind.metadata();
        PenaltyResult {
            kind,
            side,
            player: None,
            yards,
            is_auto_first_down: meta.is_auto_first_down && side == TeamSide::Away,
            is_spot_foul: meta.is_spot_foul,
            declined: false,
            offsetting: false,
            description: String::new(),
        }
    }

    #[test]
    fn test_table_has_twenty_four_kinds() {
        assert_eq!(FULL_TABLE.len(), 24);
        assert_eq!(SPECIAL_TEAMS_TABLE.len(), 9);
    }

    #[test]
    fn test_metadata_yards_nonnegative() {
        for kind in FULL_TABLE.iter() {
            let meta = kind.metadata();
            assert!(meta.frequency_weight > 0.0);
            // Spot fouls may carry zero base yardage; everything else walks
            if !meta.is_spot_foul {
                assert!(meta.yards >= 5);
            }
        }
    }

    #[test]
    fn test_offensive_holding_enforcement() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 40;
        state.down = 2;
        state.yards_to_go = 7;
        let flag = penalty(PenaltyKind::OffensiveHolding, TeamSide::Home, 10);
        let enforcement = sim.enforce(&state, &flag);
        assert_eq!(enforcement.ball_position, 30);
        assert_eq!(enforcement.down, 2);
        assert_eq!(enforcement.yards_to_go, 17);
        assert!(enforcement.nullify_play);
    }

    #[test]
    fn test_half_the_distance_backed_up() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 4;
        state.down = 1;
        state.yards_to_go = 10;
        // Assessed yards are computed against the scrimmage spot
        let yards = sim.assessed_yards(PenaltyKind::OffensiveHolding, true, 4);
        assert_eq!(yards, 2);
        let flag = penalty(PenaltyKind::OffensiveHolding, TeamSide::Home, yards);
        let enforcement = sim.enforce(&state, &flag);
        assert_eq!(enforcement.ball_position, 2);
        assert_eq!(enforcement.yards_to_go, 12);
    }

    #[test]
    fn test_defensive_auto_first_down() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 60;
        state.down = 3;
        state.yards_to_go = 9;
        let flag = penalty(PenaltyKind::RoughingThePasser, TeamSide::Away, 15);
        let enforcement = sim.enforce(&state, &flag);
        assert_eq!(enforcement.ball_position, 75);
        assert_eq!(enforcement.down, 1);
        assert_eq!(enforcement.yards_to_go, 10);
        assert!(enforcement.automatic_first_down);
    }

    #[test]
    fn test_dpi_spot_foul_estimate() {
        let sim = PenaltySimulator::new();
        assert_eq!(
            sim.assessed_yards(PenaltyKind::DefensivePassInterference, false, 50),
            15
        );
        // Clamped one short of the goal line inside the fifteen
        assert_eq!(
            sim.assessed_yards(PenaltyKind::DefensivePassInterference, false, 92),
            7
        );
    }

    #[test]
    fn test_intentional_grounding_costs_the_down() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 50;
        state.down = 2;
        state.yards_to_go = 10;
        let flag = penalty(PenaltyKind::IntentionalGrounding, TeamSide::Home, 10);
        let enforcement = sim.enforce(&state, &flag);
        assert_eq!(enforcement.ball_position, 40);
        assert_eq!(enforcement.down, 3);
        assert_eq!(enforcement.yards_to_go, 20);
    }

    #[test]
    fn test_defense_declines_when_play_lost_more() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        // Sack for -12 beats a 10-yard holding walk-off
        let flag = penalty(PenaltyKind::OffensiveHolding, TeamSide::Home, 10);
        let play = PlayResultBuilder::new(PlayType::Sack, PlayCall::PassMedium)
            .yards_gained(-12)
            .build();
        assert!(!sim.accept(&flag, &play, &state));
    }

    #[test]
    fn test_offense_declines_flag_on_its_own_touchdown() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        let flag = penalty(PenaltyKind::Facemask, TeamSide::Away, 15);
        let play = PlayResultBuilder::new(PlayType::Run, PlayCall::RunOutside)
            .yards_gained(35)
            .touchdown(true)
            .build();
        assert!(!sim.accept(&flag, &play, &state));
    }

    #[test]
    fn test_sim_rate_roughly_matches_knob() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        let home: Vec<Player> = test_roster();
        let away: Vec<Player> = test_roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let play = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
            .yards_gained(4)
            .build();
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut flags = 0;
        for _ in 0..400 {
            if sim
                .sim(&state, &play, &offense, &defense, &mut rng)
                .unwrap()
                .is_some()
            {
                flags += 1;
            }
        }
        // 7.5% of 400 is 30; allow generous slack
        assert!(flags > 10 && flags < 60, "flags = {}", flags);
    }

    #[test]
    fn test_pass_only_kinds_filtered_on_runs() {
        let sim = PenaltySimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        let home: Vec<Player> = test_roster();
        let away: Vec<Player> = test_roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let play = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
            .yards_gained(3)
            .build();
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        for _ in 0..400 {
            if let Some(flag) = sim
                .sim(&state, &play, &offense, &defense, &mut rng)
                .unwrap()
            {
                assert!(!flag.kind.requires_pass(), "{:?} on a run", flag.kind);
            }
        }
    }

    fn test_roster() -> Vec<Player> {
        let mut players = Vec::new();
        let mut id = 1;
        for (position, count) in [
            (Position::QB, 1),
            (Position::RB, 2),
            (Position::WR, 3),
            (Position::TE, 1),
            (Position::OL, 5),
            (Position::DL, 4),
            (Position::LB, 3),
            (Position::CB, 3),
            (Position::S, 2),
            (Position::K, 1),
            (Position::P, 1),
        ] {
            for n in 0..count {
                players.push(
                    Player::from_properties(
                        id,
                        &format!("{:?} {}", position, n + 1),
                        position,
                        id % 100,
                        80,
                        75,
                        75,
                        75,
                        75,
                        false,
                    )
                    .unwrap(),
                );
                id += 1;
            }
        }
        players
    }
}
