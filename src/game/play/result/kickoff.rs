#![doc = include_str!("../../../../docs/game/play/result/kickoff.md")]
use crate::error::SimulationError;
use crate::game::clock::{ClockManager, ElapsedKey};
use crate::game::play::call::PlayCall;
use crate::game::play::result::{
    KickResult, PlayResult, PlayResultBuilder, PlayType, ResolutionContext,
};
use crate::game::tables::{
    KICKOFF_FAIR_CATCH_RATE, KICKOFF_OOB_RATE, ONSIDE_RECOVERY_RATE, TOUCHBACK_RATE,
};
use crate::player::Position;
use crate::rng::ProvablyFairRng;

// Spots under the dynamic kickoff rule
const TOUCHBACK_SPOT: u32 = 35;
const FAIR_CATCH_SPOT: u32 = 25;
const OOB_SPOT: u32 = 40;

// Return landing profile, measured from the receiving goal line
const RETURN_MEAN: f64 = 27.0_f64;
const RETURN_STD: f64 = 8.0_f64;
const RETURN_MIN: f64 = 10.0_f64;
const RETURN_MAX: f64 = 50.0_f64;

// An onside kick must travel ten; it rarely travels much further
const ONSIDE_TRAVEL_MIN: i32 = 10;
const ONSIDE_TRAVEL_MAX: i32 = 15;

/// # `KickoffResultSimulator` struct
///
/// Resolves kickoffs and onside kicks. The engine reads the attached
/// `KickResult` to flip possession and place the ball.
///
/// Draw order on a normal kickoff: touchback, out-of-bounds, fair catch,
/// return spot (two draws), elapsed time. Each roll short-circuits the
/// ones after it. Onside: travel distance, recovery, elapsed time.
#[derive(Clone, Debug, Default)]
pub struct KickoffResultSimulator {}

impl KickoffResultSimulator {
    /// Initialize a new kickoff result simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::kickoff::KickoffResultSimulator;
    ///
    /// let my_sim = KickoffResultSimulator::new();
    /// ```
    pub fn new() -> KickoffResultSimulator {
        KickoffResultSimulator::default()
    }

    /// Resolve a normal kickoff
    pub fn sim(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (kicker_index, kicker) = ctx.offense.best_at_or_emergency(Position::K);
        let mut builder = PlayResultBuilder::new(PlayType::Kickoff, PlayCall::KickoffNormal)
            .clock_stopped(true);
        if let Some(i) = kicker_index {
            builder = builder.kicker(ctx.offense.reference(i));
        }

        let (kick, description) = if rng.probability(TOUCHBACK_RATE) {
            (
                KickResult {
                    landing_spot: TOUCHBACK_SPOT,
                    touchback: true,
                    ..KickResult::default()
                },
                format!(
                    "{} boots it through the end zone, touchback",
                    kicker.name()
                ),
            )
        } else if rng.probability(KICKOFF_OOB_RATE) {
            (
                KickResult {
                    landing_spot: OOB_SPOT,
                    out_of_bounds: true,
                    ..KickResult::default()
                },
                String::from("the kickoff rolls out of bounds, spotted at the 40"),
            )
        } else if rng.probability(KICKOFF_FAIR_CATCH_RATE) {
            (
                KickResult {
                    landing_spot: FAIR_CATCH_SPOT,
                    fair_catch: true,
                    ..KickResult::default()
                },
                String::from("fair catch on the kickoff"),
            )
        } else {
            let spot = rng
                .gaussian(RETURN_MEAN, RETURN_STD, Some(RETURN_MIN), Some(RETURN_MAX))
                .round() as u32;
            (
                KickResult {
                    landing_spot: spot,
                    ..KickResult::default()
                },
                format!("the return is brought out to the {}", spot),
            )
        };
        Ok(builder
            .kick(kick)
            .description(&description)
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::Kickoff,
                ctx.hurry_up,
                rng,
            ))
            .build())
    }

    /// Resolve an onside attempt
    ///
    /// A recovery leaves the ball with the kicking team at the spot the
    /// kick travelled to; there is no return, so a recovery can never
    /// score.
    pub fn sim_onside(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (kicker_index, kicker) = ctx.offense.best_at_or_emergency(Position::K);
        let travel = rng.random_int(ONSIDE_TRAVEL_MIN, ONSIDE_TRAVEL_MAX);
        let spot = ctx.state.ball_position() as i32 + travel;
        let recovered = rng.probability(ONSIDE_RECOVERY_RATE);
        let kick = KickResult {
            // Kicking-team frame on a recovery, receiving frame otherwise
            landing_spot: if recovered {
                crate::game::state::GameState::clamp_ball(spot)
            } else {
                crate::game::state::GameState::clamp_ball(100 - spot)
            },
            recovered_by_kicking_team: recovered,
            ..KickResult::default()
        };
        let description = if recovered {
            format!(
                "ONSIDE KICK by {} and the kicking team recovers!",
                kicker.name()
            )
        } else {
            format!("onside attempt by {} is smothered by the hands team", kicker.name())
        };
        let mut builder = PlayResultBuilder::new(PlayType::OnsideKick, PlayCall::OnsideKick)
            .clock_stopped(true)
            .kick(kick)
            .description(&description);
        if let Some(i) = kicker_index {
            builder = builder.kicker(ctx.offense.reference(i));
        }
        Ok(builder
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::Kickoff,
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
    use crate::game::state::GameState;
    use crate::player::{Player, Squad, TeamSide};

    fn kicking_roster() -> Vec<Player> {
        vec![
            Player::from_properties(1, "Leg One", Position::K, 3, 85, 60, 60, 70, 80, false)
                .unwrap(),
            Player::from_properties(2, "Cover One", Position::LB, 52, 78, 80, 78, 72, 70, false)
                .unwrap(),
        ]
    }

    fn ctx_parts() -> (GameState, FormationCall, DefensiveCall) {
        let state = GameState::new();
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
        (state, formation, call)
    }

    #[test]
    fn test_kickoff_spots_are_legal() {
        let sim = KickoffResultSimulator::new();
        let home = kicking_roster();
        let away = kicking_roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let (state, formation, call) = ctx_parts();
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut touchbacks = 0;
        for _ in 0..128 {
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
            assert!((1..=50).contains(&kick.landing_spot));
            assert!(result.is_clock_stopped());
            if kick.touchback {
                touchbacks += 1;
                assert_eq!(kick.landing_spot, TOUCHBACK_SPOT);
            }
        }
        // 62% touchback rate should dominate
        assert!(touchbacks > 50);
    }

    #[test]
    fn test_onside_recovery_never_scores() {
        let sim = KickoffResultSimulator::new();
        let home = kicking_roster();
        let away = kicking_roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let (state, formation, call) = ctx_parts();
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut recoveries = 0;
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
            let result = sim.sim_onside(&ctx, &mut rng).unwrap();
            assert!(result.scoring().is_none());
            assert!(!result.is_touchdown());
            let kick = result.kick().unwrap();
            assert_eq!(kick.return_yards, 0);
            if kick.recovered_by_kicking_team {
                recoveries += 1;
                // The kicking team takes over just past its own 45
                assert!((45..=50).contains(&kick.landing_spot));
            } else {
                assert!((50..=55).contains(&kick.landing_spot));
            }
        }
        assert!(recoveries > 5 && recoveries < 80);
    }
}
