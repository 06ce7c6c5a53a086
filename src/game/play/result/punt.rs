#![doc = include_str!("../../../../docs/game/play/result/punt.md")]
use crate::error::SimulationError;
use crate::game::clock::{ClockManager, ElapsedKey};
use crate::game::play::call::PlayCall;
use crate::game::play::result::{
    KickResult, PlayResult, PlayResultBuilder, PlayType, ResolutionContext,
};
use crate::game::state::GameState;
use crate::game::tables::{PUNT_FAIR_CATCH_RATE, PUNT_MUFF_RATE};
use crate::game::turnover::{TurnoverKind, TurnoverResult};
use crate::player::Position;
use crate::rng::ProvablyFairRng;

// Punt distance and return profiles
const PUNT_MEAN: f64 = 45.0_f64;
const PUNT_STD: f64 = 6.0_f64;
const PUNT_MIN: f64 = 25.0_f64;
const PUNT_MAX: f64 = 70.0_f64;
const RETURN_MEAN: f64 = 9.0_f64;
const RETURN_STD: f64 = 5.0_f64;
const RETURN_MIN: f64 = 0.0_f64;
const RETURN_MAX: f64 = 40.0_f64;

// A punt into the end zone comes out to the receiving 20
const TOUCHBACK_SPOT: u32 = 20;

/// # `PuntResultSimulator` struct
///
/// Resolves punts: distance, the muff, the fair catch, and the return.
///
/// Draw order: distance (two draws), muff roll, fair-catch roll (clean
/// catches only), return yards (two draws on a live return), elapsed
/// time.
#[derive(Clone, Debug, Default)]
pub struct PuntResultSimulator {}

impl PuntResultSimulator {
    /// Initialize a new punt result simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::punt::PuntResultSimulator;
    ///
    /// let my_sim = PuntResultSimulator::new();
    /// ```
    pub fn new() -> PuntResultSimulator {
        PuntResultSimulator::default()
    }

    /// Resolve a punt
    pub fn sim(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let (punter_index, punter) = ctx.offense.best_at_or_emergency(Position::P);
        let distance = rng
            .gaussian(PUNT_MEAN, PUNT_STD, Some(PUNT_MIN), Some(PUNT_MAX))
            .round() as i32;
        let catch_spot = state.ball_position() as i32 + distance;

        let mut builder = PlayResultBuilder::new(PlayType::Punt, PlayCall::Punt)
            .clock_stopped(true)
            .yards_gained(0);
        if let Some(i) = punter_index {
            builder = builder.kicker(ctx.offense.reference(i));
        }

        // Into the end zone: touchback, no muff to roll
        if catch_spot >= 100 {
            let kick = KickResult {
                landing_spot: TOUCHBACK_SPOT,
                touchback: true,
                ..KickResult::default()
            };
            return Ok(builder
                .kick(kick)
                .description(&format!(
                    "{} punts {} yards into the end zone, touchback",
                    punter.name(),
                    distance
                ))
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::Punt,
                    ctx.hurry_up,
                    rng,
                ))
                .build());
        }

        if rng.probability(PUNT_MUFF_RATE) {
            // The returner puts it on the turf and the kicking team falls
            // on it at the catch spot
            let kick = KickResult {
                landing_spot: GameState::clamp_ball(catch_spot),
                muffed: true,
                recovered_by_kicking_team: true,
                ..KickResult::default()
            };
            let turnover = TurnoverResult::new(
                TurnoverKind::MuffedPunt,
                state.possession(),
                0,
                false,
            );
            return Ok(builder
                .kick(kick)
                .turnover(turnover)
                .description(&format!(
                    "{}'s punt is MUFFED and the kicking team recovers",
                    punter.name()
                ))
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::Punt,
                    ctx.hurry_up,
                    rng,
                ))
                .build());
        }

        let receiving_spot = 100 - catch_spot;
        let (kick, description) = if rng.probability(PUNT_FAIR_CATCH_RATE) {
            (
                KickResult {
                    landing_spot: GameState::clamp_ball(receiving_spot),
                    fair_catch: true,
                    ..KickResult::default()
                },
                format!(
                    "{} punts {} yards, fair catch",
                    punter.name(),
                    distance
                ),
            )
        } else {
            let return_yards = rng
                .gaussian(RETURN_MEAN, RETURN_STD, Some(RETURN_MIN), Some(RETURN_MAX))
                .round() as i32;
            (
                KickResult {
                    landing_spot: GameState::clamp_ball(receiving_spot + return_yards),
                    return_yards,
                    ..KickResult::default()
                },
                format!(
                    "{} punts {} yards, returned {} yard{}",
                    punter.name(),
                    distance,
                    return_yards,
                    if return_yards == 1 { "" } else { "s" }
                ),
            )
        };
        Ok(builder
            .kick(kick)
            .description(&description)
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::Punt,
                ctx.hurry_up,
                rng,
            ))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::defense::{
        BlitzPackage, CoverageShell, DefensiveCall, DefensivePersonnel,
    };
    use crate::game::formation::{
        FormationCall, FormationVariant, OffensiveFormation, PersonnelGroup,
    };
    use crate::player::{Player, Squad, TeamSide};

    fn roster() -> Vec<Player> {
        vec![
            Player::from_properties(1, "Boomer", Position::P, 4, 84, 60, 60, 70, 70, false)
                .unwrap(),
            Player::from_properties(2, "Gunner", Position::WR, 14, 76, 88, 70, 72, 70, false)
                .unwrap(),
        ]
    }

    #[test]
    fn test_punt_placements_are_legal() {
        let sim = PuntResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 30;
        state.down = 4;
        let formation = FormationCall {
            formation: OffensiveFormation::Singleback,
            personnel: PersonnelGroup::Posse11,
            variant: FormationVariant::None,
        };
        let call = DefensiveCall {
            personnel: DefensivePersonnel::Base43,
            coverage: CoverageShell::Cover3,
            blitz: BlitzPackage::None,
        };
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut muffs = 0;
        let mut touchbacks = 0;
        for _ in 0..256 {
            let ctx = ResolutionContext {
                state: &state,
                offense: &offense,
                defense: &defense,
                offense_rating: 85,
                defense_rating: 85,
                momentum: 0.0,
                formation,
                defensive_call: call,
                hurry_up: false,
            };
            let result = sim.sim(&ctx, &mut rng).unwrap();
            let kick = result.kick().unwrap();
            assert!((1..=99).contains(&kick.landing_spot));
            assert!(result.is_clock_stopped());
            if kick.muffed {
                muffs += 1;
                let turnover = result.turnover().unwrap();
                assert_eq!(turnover.kind, TurnoverKind::MuffedPunt);
                assert_eq!(turnover.recovered_by, TeamSide::Home);
                assert!(kick.recovered_by_kicking_team);
            }
            if kick.touchback {
                touchbacks += 1;
                assert_eq!(kick.landing_spot, TOUCHBACK_SPOT);
            }
        }
        assert!(muffs < 30);
        // From the 30 a 70-yard boot is needed to reach the end zone
        assert!(touchbacks < 128);
    }
}
