#![doc = include_str!("../../../../docs/game/play/result/run.md")]
use crate::error::SimulationError;
use crate::game::clock::{ClockManager, ElapsedKey};
use crate::game::play::call::PlayCall;
use crate::game::play::result::{
    PlayResult, PlayResultBuilder, PlayType, ResolutionContext, ScoringKind, ScoringResult,
};
use crate::game::tables::{
    BIG_PLAY_BONUS_MAX, BIG_PLAY_BONUS_MIN, BIG_PLAY_RATE, CARRIER_RATING_YARD_FACTOR,
    FUMBLE_RATE, FUMBLE_RECOVERY_DEFENSE, FUMBLE_TD_RATE, LINE_DIFF_YARD_FACTOR,
    MOMENTUM_YARD_FACTOR, OUT_OF_BOUNDS_RATE, RUN_FUMBLE_MULTIPLIER,
    SHORT_YARDAGE_STRENGTH_BONUS, TEAM_RATING_YARD_FACTOR,
};
use crate::game::turnover::{TurnoverKind, TurnoverResult};
use crate::player::{Player, Position};
use crate::rng::ProvablyFairRng;

// Gaussian yardage profiles per run flavor
const INSIDE_MEAN: f64 = 4.0_f64;
const INSIDE_STD: f64 = 3.5_f64;
const OUTSIDE_MEAN: f64 = 4.3_f64;
const OUTSIDE_STD: f64 = 5.0_f64;
const SCRAMBLE_MEAN: f64 = 5.0_f64;
const SCRAMBLE_STD: f64 = 4.5_f64;

// Worst case on a stuffed run before clamping against the goal line
const RUN_FLOOR: f64 = -5.0_f64;

// Neutral baseline a carrier's overall rating is measured against
const CARRIER_BASELINE: f64 = 75.0_f64;

/// # `RunResultSimulator` struct
///
/// Resolves designed runs, quarterback scrambles, and kneel-downs into a
/// `PlayResult`.
///
/// Draw order on a run: base yards (two), big-play roll (one, plus one
/// bonus draw on a hit), fumble roll (one on non-scoring outcomes, plus
/// recovery and return-TD draws when live), out-of-bounds (one on
/// non-scoring outcomes), elapsed time (one).
#[derive(Clone, Debug, Default)]
pub struct RunResultSimulator {}

impl RunResultSimulator {
    /// Initialize a new run result simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::run::RunResultSimulator;
    ///
    /// let my_sim = RunResultSimulator::new();
    /// ```
    pub fn new() -> RunResultSimulator {
        RunResultSimulator::default()
    }

    /// Apply the multiplicative modifier cascade to a sampled base gain
    fn modified_yards(
        &self,
        base: f64,
        ctx: &ResolutionContext,
        carrier: &Player,
    ) -> f64 {
        let mut yards = base;
        yards *= ctx.momentum_factor(MOMENTUM_YARD_FACTOR);
        yards *= 1.0 + ctx.rating_diff() / 100.0 * TEAM_RATING_YARD_FACTOR;
        yards *= 1.0
            + (carrier.overall() as f64 - CARRIER_BASELINE) / 100.0 * CARRIER_RATING_YARD_FACTOR;
        let line_diff = ctx.offense.average_rating(&[Position::OL])
            - ctx.defense.average_rating(&[Position::DL, Position::LB]);
        yards *= 1.0 + line_diff / 100.0 * LINE_DIFF_YARD_FACTOR;
        yards += ctx.formation.modifiers().run_yard_bonus;
        yards *= ctx.defensive_call.modifiers().run_yard_multiplier;
        if ctx.state.yards_to_go() <= 3 {
            yards += SHORT_YARDAGE_STRENGTH_BONUS * ((carrier.strength() as f64 - 60.0) / 40.0);
        }
        yards
    }

    /// Shared carry resolution used by designed runs and scrambles
    fn resolve_carry(
        &self,
        call: PlayCall,
        play_type: PlayType,
        mean: f64,
        std_dev: f64,
        ctx: &ResolutionContext,
        carrier_index: Option<usize>,
        carrier: &Player,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let base = rng.gaussian(mean, std_dev, None, None);
        let mut yards = self.modified_yards(base, ctx, carrier);
        if rng.probability(BIG_PLAY_RATE) {
            yards += rng.random_int(BIG_PLAY_BONUS_MIN, BIG_PLAY_BONUS_MAX) as f64;
        }
        let ceiling = (100 - state.ball_position()) as i32;
        let yards = (yards.round() as i32).clamp(RUN_FLOOR as i32, ceiling);
        let new_position = state.ball_position() as i32 + yards;

        let carrier_ref = carrier_index.map(|i| ctx.offense.reference(i));
        let mut builder = PlayResultBuilder::new(play_type, call).yards_gained(yards);
        if let Some(r) = carrier_ref {
            builder = builder.rusher(r);
        }

        let verb = match play_type {
            PlayType::Scramble => "scrambles",
            _ if call == PlayCall::RunOutside => "sweeps wide",
            _ => "runs up the middle",
        };

        if new_position >= 100 {
            let result = builder
                .touchdown(true)
                .first_down(true)
                .clock_stopped(true)
                .scoring(ScoringResult::new(
                    ScoringKind::Touchdown,
                    state.possession(),
                    carrier_ref,
                ))
                .description(&format!(
                    "{} {} {} yards for a TOUCHDOWN",
                    carrier.name(),
                    verb,
                    yards
                ))
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::RunNormal,
                    ctx.hurry_up,
                    rng,
                ))
                .build();
            return Ok(result);
        }
        if new_position <= 0 {
            let result = builder
                .safety(true)
                .clock_stopped(true)
                .scoring(ScoringResult::new(
                    ScoringKind::Safety,
                    state.possession().opponent(),
                    None,
                ))
                .description(&format!(
                    "{} is swarmed in the end zone, SAFETY",
                    carrier.name()
                ))
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::RunNormal,
                    ctx.hurry_up,
                    rng,
                ))
                .build();
            return Ok(result);
        }

        // Ball security, then the sideline
        let mut turnover: Option<TurnoverResult> = None;
        if rng.probability(FUMBLE_RATE * RUN_FUMBLE_MULTIPLIER) {
            if rng.probability(FUMBLE_RECOVERY_DEFENSE) {
                let returned_for_td = rng.probability(FUMBLE_TD_RATE);
                turnover = Some(TurnoverResult::new(
                    TurnoverKind::Fumble,
                    state.possession().opponent(),
                    0,
                    returned_for_td,
                ));
            } else {
                turnover = Some(TurnoverResult::new(
                    TurnoverKind::FumbleRecovery,
                    state.possession(),
                    0,
                    false,
                ));
            }
        }
        let out_of_bounds = rng.probability(OUT_OF_BOUNDS_RATE);
        let first_down = yards >= state.yards_to_go() as i32 && turnover.is_none();

        let mut description = format!(
            "{} {} for {} yard{}",
            carrier.name(),
            verb,
            yards,
            if yards.abs() == 1 { "" } else { "s" }
        );
        if let Some(t) = turnover {
            description = format!("{}. {}", description, t);
        } else if first_down {
            description.push_str(", enough for the first down");
        }

        let mut builder = builder
            .yards_gained(yards)
            .first_down(first_down)
            .clock_stopped(out_of_bounds || turnover.is_some())
            .description(&description);
        if let Some(t) = turnover {
            builder = builder.turnover(t);
            if t.returned_for_td {
                builder = builder.scoring(ScoringResult::new(
                    ScoringKind::FumbleRecoveryTd,
                    state.possession().opponent(),
                    None,
                ));
            }
        }
        let elapsed_key = if play_type == PlayType::Scramble {
            ElapsedKey::Scramble
        } else {
            ElapsedKey::RunNormal
        };
        Ok(builder
            .clock_elapsed(ClockManager::new().sample_elapsed(elapsed_key, ctx.hurry_up, rng))
            .build())
    }

    /// Resolve a designed run
    pub fn sim(
        &self,
        call: PlayCall,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (carrier_index, carrier) = match ctx.offense.best_at(Position::RB) {
            Some((i, p)) => (Some(i), p.clone()),
            None => {
                let (i, p) = ctx.offense.best_at_or_emergency(Position::QB);
                (i, p)
            }
        };
        let (mean, std_dev) = if call == PlayCall::RunOutside {
            (OUTSIDE_MEAN, OUTSIDE_STD)
        } else {
            (INSIDE_MEAN, INSIDE_STD)
        };
        self.resolve_carry(
            call,
            PlayType::Run,
            mean,
            std_dev,
            ctx,
            carrier_index,
            &carrier,
            rng,
        )
    }

    /// Resolve a quarterback scramble out of a called pass
    pub fn sim_scramble(
        &self,
        call: PlayCall,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (qb_index, qb) = ctx.offense.best_at_or_emergency(Position::QB);
        self.resolve_carry(
            call,
            PlayType::Scramble,
            SCRAMBLE_MEAN,
            SCRAMBLE_STD,
            ctx,
            qb_index,
            &qb,
            rng,
        )
    }

    /// Resolve a victory-formation kneel: minus one yard, maximum clock
    pub fn sim_kneel(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (qb_index, qb) = ctx.offense.best_at_or_emergency(Position::QB);
        let mut builder = PlayResultBuilder::new(PlayType::Kneel, PlayCall::Kneel)
            .yards_gained(-1)
            .description(&format!("{} takes a knee", qb.name()))
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::Kneel,
                ctx.hurry_up,
                rng,
            ));
        if let Some(i) = qb_index {
            builder = builder.rusher(ctx.offense.reference(i));
        }
        Ok(builder.build())
    }
}
