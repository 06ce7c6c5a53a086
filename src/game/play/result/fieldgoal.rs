#![doc = include_str!("../../../../docs/game/play/result/fieldgoal.md")]
use crate::error::SimulationError;
use crate::game::clock::{ClockManager, ElapsedKey};
use crate::game::play::call::PlayCall;
use crate::game::play::result::{
    KickResult, PlayResult, PlayResultBuilder, PlayType, ResolutionContext, ScoringKind,
    ScoringResult,
};
use crate::game::tables::PAT_BASE_RATE;
use crate::player::{Player, Position};
use crate::rng::ProvablyFairRng;

// Make-probability table by attempt distance, interpolated linearly
// inside each band
const ACCURACY_BANDS: [(u32, f64); 6] = [
    (20, 0.99),
    (30, 0.96),
    (40, 0.86),
    (50, 0.65),
    (60, 0.30),
    (70, 0.05),
];

// Yards added to the distance to goal: seven for the hold plus the depth
// of the end zone
const SNAP_AND_ENDZONE: u32 = 17;

// A miss comes back to at least the receiving 20
const MISS_FLOOR: u32 = 20;

// The kicker's rating moves the needle at most this much either way
const KICKER_NUDGE: f64 = 0.04_f64;

/// # `FieldGoalResultSimulator` struct
///
/// Resolves field goals and extra points against the distance table with
/// a kicker-rating nudge.
///
/// Draw order: the make roll, then elapsed time (field goals only; tries
/// are untimed).
#[derive(Clone, Debug, Default)]
pub struct FieldGoalResultSimulator {}

impl FieldGoalResultSimulator {
    /// Initialize a new field goal result simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::fieldgoal::FieldGoalResultSimulator;
    ///
    /// let my_sim = FieldGoalResultSimulator::new();
    /// ```
    pub fn new() -> FieldGoalResultSimulator {
        FieldGoalResultSimulator::default()
    }

    /// The make probability for an attempt distance, interpolated inside
    /// the table's bands
    fn accuracy_at(&self, distance: u32) -> f64 {
        let (first_distance, first_rate) = ACCURACY_BANDS[0];
        if distance <= first_distance {
            return first_rate;
        }
        for window in ACCURACY_BANDS.windows(2) {
            let (lo_d, lo_r) = window[0];
            let (hi_d, hi_r) = window[1];
            if distance <= hi_d {
                let t = (distance - lo_d) as f64 / (hi_d - lo_d) as f64;
                return lo_r + (hi_r - lo_r) * t;
            }
        }
        let (_, last_rate) = ACCURACY_BANDS[ACCURACY_BANDS.len() - 1];
        last_rate
    }

    /// The rating nudge for a kicker, bounded either way
    fn kicker_nudge(&self, kicker: &Player) -> f64 {
        (((kicker.overall() as f64 - 75.0) / 25.0) * KICKER_NUDGE)
            .clamp(-KICKER_NUDGE, KICKER_NUDGE)
    }

    /// Resolve a field goal attempt
    pub fn sim(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let (kicker_index, kicker) = ctx.offense.best_at_or_emergency(Position::K);
        let kicker_ref = kicker_index.map(|i| ctx.offense.reference(i));
        let distance = (100 - state.ball_position()) + SNAP_AND_ENDZONE;
        let p = (self.accuracy_at(distance) + self.kicker_nudge(&kicker)).clamp(0.01, 0.99);
        let good = rng.probability(p);

        let mut builder = if good {
            PlayResultBuilder::new(PlayType::FieldGoalGood, PlayCall::FieldGoal)
                .scoring(ScoringResult::new(
                    ScoringKind::FieldGoal,
                    state.possession(),
                    kicker_ref,
                ))
                .description(&format!(
                    "{}'s {}-yard field goal is GOOD",
                    kicker.name(),
                    distance
                ))
        } else {
            // The defense takes over at the spot of the kick, never inside
            // its own 20
            let takeover = (100 - state.ball_position()).max(MISS_FLOOR);
            PlayResultBuilder::new(PlayType::FieldGoalMissed, PlayCall::FieldGoal)
                .kick(KickResult {
                    landing_spot: takeover,
                    ..KickResult::default()
                })
                .description(&format!(
                    "{}'s {}-yard field goal is no good",
                    kicker.name(),
                    distance
                ))
        };
        if let Some(r) = kicker_ref {
            builder = builder.kicker(r);
        }
        Ok(builder
            .clock_stopped(true)
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::FieldGoal,
                ctx.hurry_up,
                rng,
            ))
            .build())
    }

    /// Resolve an extra point try (untimed)
    pub fn sim_extra_point(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let (kicker_index, kicker) = ctx.offense.best_at_or_emergency(Position::K);
        let kicker_ref = kicker_index.map(|i| ctx.offense.reference(i));
        let p = (PAT_BASE_RATE + self.kicker_nudge(&kicker)).clamp(0.01, 0.995);
        let good = rng.probability(p);

        let mut builder = if good {
            PlayResultBuilder::new(PlayType::ExtraPointGood, PlayCall::ExtraPoint)
                .scoring(ScoringResult::new(
                    ScoringKind::ExtraPoint,
                    state.possession(),
                    kicker_ref,
                ))
                .description(&format!("{}'s extra point is good", kicker.name()))
        } else {
            PlayResultBuilder::new(PlayType::ExtraPointMissed, PlayCall::ExtraPoint)
                .description(&format!("{} pushes the extra point wide", kicker.name()))
        };
        if let Some(r) = kicker_ref {
            builder = builder.kicker(r);
        }
        Ok(builder.clock_stopped(true).clock_elapsed(0).build())
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
    use crate::player::{Squad, TeamSide};

    fn kicker(overall: u32) -> Vec<Player> {
        vec![Player::from_properties(
            1, "Iron Leg", Position::K, 2, overall, 60, 60, 70, 88, false,
        )
        .unwrap()]
    }

    #[test]
    fn test_accuracy_interpolates_between_bands() {
        let sim = FieldGoalResultSimulator::new();
        assert!((sim.accuracy_at(20) - 0.99).abs() < 1e-9);
        assert!((sim.accuracy_at(70) - 0.05).abs() < 1e-9);
        // Midpoint of the 40-50 band
        let mid = sim.accuracy_at(45);
        assert!((mid - 0.755).abs() < 1e-9);
        // Monotone decreasing across the table
        assert!(sim.accuracy_at(25) > sim.accuracy_at(35));
        assert!(sim.accuracy_at(55) > sim.accuracy_at(65));
        // Beyond the table floors out
        assert!((sim.accuracy_at(80) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_chip_shots_almost_always_good() {
        let sim = FieldGoalResultSimulator::new();
        let home = kicker(90);
        let away = kicker(80);
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 90;
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
        let mut made = 0;
        for _ in 0..64 {
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
            if result.play_type() == PlayType::FieldGoalGood {
                made += 1;
                let score = result.scoring().unwrap();
                assert_eq!(score.kind, ScoringKind::FieldGoal);
                assert_eq!(score.points, 3);
            } else {
                // A miss from the 90 hands the ball over no deeper than
                // the receiving 20
                assert_eq!(result.kick().unwrap().landing_spot, 20);
            }
        }
        assert!(made > 55);
    }

    #[test]
    fn test_extra_point_is_untimed() {
        let sim = FieldGoalResultSimulator::new();
        let home = kicker(85);
        let away = kicker(85);
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.pat_attempt = true;
        assert!(state.validate().is_ok());
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
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let result = sim.sim_extra_point(&ctx, &mut rng).unwrap();
        assert_eq!(result.clock_elapsed(), 0);
        assert!(matches!(
            result.play_type(),
            PlayType::ExtraPointGood | PlayType::ExtraPointMissed
        ));
    }
}
