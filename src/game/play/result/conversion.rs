#![doc = include_str!("../../../../docs/game/play/result/conversion.md")]
use crate::error::SimulationError;
use crate::game::play::call::PlayCall;
use crate::game::play::result::{
    PlayResult, PlayResultBuilder, PlayType, ResolutionContext, ScoringKind, ScoringResult,
};
use crate::game::tables::{TWO_POINT_PASS_RATE, TWO_POINT_RUN_RATE};
use crate::player::Position;
use crate::rng::ProvablyFairRng;

/// # `ConversionResultSimulator` struct
///
/// Resolves two-point tries. Untimed, one success roll; a successful try
/// consumes one more draw to pick the scorer on a pass.
#[derive(Clone, Debug, Default)]
pub struct ConversionResultSimulator {}

impl ConversionResultSimulator {
    /// Initialize a new conversion result simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::conversion::ConversionResultSimulator;
    ///
    /// let my_sim = ConversionResultSimulator::new();
    /// ```
    pub fn new() -> ConversionResultSimulator {
        ConversionResultSimulator::default()
    }

    /// Resolve a two-point try
    pub fn sim(
        &self,
        call: PlayCall,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let is_run = call == PlayCall::TwoPointRun;
        let rate = if is_run {
            TWO_POINT_RUN_RATE
        } else {
            TWO_POINT_PASS_RATE
        };
        let good = rng.probability(rate);

        if !good {
            let description = if is_run {
                "the two-point run is stuffed at the line"
            } else {
                "the two-point pass falls incomplete"
            };
            return Ok(PlayResultBuilder::new(PlayType::TwoPointFailure, call)
                .clock_stopped(true)
                .description(description)
                .build());
        }

        let (scorer_ref, scorer_name) = if is_run {
            let (index, carrier) = match ctx.offense.best_at(Position::RB) {
                Some((i, p)) => (Some(i), p.clone()),
                None => {
                    let (i, p) = ctx.offense.best_at_or_emergency(Position::QB);
                    (i, p)
                }
            };
            (
                index.map(|i| ctx.offense.reference(i)),
                carrier.name().to_string(),
            )
        } else {
            match ctx.offense.select_receiver(rng)? {
                Some((i, p)) => (Some(ctx.offense.reference(i)), p.name().to_string()),
                None => (None, String::from("the tight end")),
            }
        };

        let mut builder = PlayResultBuilder::new(PlayType::TwoPointSuccess, call)
            .yards_gained(100_i32 - state.ball_position() as i32)
            .clock_stopped(true)
            .scoring(ScoringResult::new(
                ScoringKind::TwoPointConversion,
                state.possession(),
                scorer_ref,
            ))
            .description(&format!(
                "{} converts the two-point try{}",
                scorer_name,
                if is_run { " on the ground" } else { " through the air" }
            ));
        if let Some(r) = scorer_ref {
            builder = if is_run {
                builder.rusher(r)
            } else {
                builder.receiver(r)
            };
        }
        Ok(builder.build())
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

    fn roster() -> Vec<Player> {
        vec![
            Player::from_properties(1, "QB One", Position::QB, 7, 88, 70, 65, 85, 80, false)
                .unwrap(),
            Player::from_properties(2, "RB One", Position::RB, 22, 86, 90, 80, 70, 75, false)
                .unwrap(),
            Player::from_properties(3, "WR One", Position::WR, 81, 88, 93, 65, 75, 78, false)
                .unwrap(),
        ]
    }

    #[test]
    fn test_two_point_try_is_untimed_and_worth_two() {
        let sim = ConversionResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.pat_attempt = true;
        state.ball_position = 98;
        let formation = FormationCall {
            formation: OffensiveFormation::GoalLine,
            personnel: PersonnelGroup::Jumbo23,
            variant: FormationVariant::None,
        };
        let call = DefensiveCall {
            personnel: DefensivePersonnel::GoalLine,
            coverage: CoverageShell::Cover0,
            blitz: BlitzPackage::None,
        };
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut successes = 0;
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
            let result = sim.sim(PlayCall::TwoPointRun, &ctx, &mut rng).unwrap();
            assert_eq!(result.clock_elapsed(), 0);
            if result.play_type() == PlayType::TwoPointSuccess {
                successes += 1;
                let score = result.scoring().unwrap();
                assert_eq!(score.kind, ScoringKind::TwoPointConversion);
                assert_eq!(score.points, 2);
                assert_eq!(score.team, TeamSide::Home);
            } else {
                assert!(result.scoring().is_none());
            }
        }
        // Ground tries land around the 55% knob
        assert!(successes > 45 && successes < 100);
    }
}
