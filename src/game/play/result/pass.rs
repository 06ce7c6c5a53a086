#![doc = include_str!("../../../../docs/game/play/result/pass.md")]
use lazy_static::lazy_static;

use crate::error::SimulationError;
use crate::game::clock::{ClockManager, ElapsedKey};
use crate::game::defense::CoverageShell;
use crate::game::formation::FormationVariant;
use crate::game::play::call::PlayCall;
use crate::game::play::result::run::RunResultSimulator;
use crate::game::play::result::{
    PlayResult, PlayResultBuilder, PlayType, ResolutionContext, ScoringKind, ScoringResult,
};
use crate::game::tables::{
    base_completion_rate, PassDepth, BIG_PLAY_BONUS_MAX, BIG_PLAY_BONUS_MIN, BIG_PLAY_RATE,
    CATCH_FUMBLE_MULTIPLIER, CHECKDOWN_COMPLETION_BONUS, COMPLETION_CEILING, COMPLETION_FLOOR,
    FUMBLE_RATE, FUMBLE_RECOVERY_DEFENSE, FUMBLE_TD_RATE, INTERCEPTION_RATE,
    MOMENTUM_YARD_FACTOR, OUT_OF_BOUNDS_RATE, SACK_FUMBLE_RATE, SACK_RATE, SACK_RATE_MAX,
    SACK_RATE_MIN, SCRAMBLE_RATE, RPO_KEEP_RATE, TEAM_RATING_YARD_FACTOR,
};
use crate::game::turnover::{interception_return, TurnoverKind, TurnoverResult};
use crate::player::{Player, PlayerRef, Position};
use crate::rng::ProvablyFairRng;

// Chance a short pass out of a quarterback-offset formation carries a
// run-pass option tag
const RPO_TAG_RATE: f64 = 0.20_f64;

// Completion penalty for running an option look from under center
const RPO_FORMATION_PENALTY: f64 = 0.05_f64;

// Play-action completion nudges against aggressive and soft shells
const PLAY_ACTION_VS_PRESSURE: f64 = 0.05_f64;
const PLAY_ACTION_VS_ZONE: f64 = -0.03_f64;

// Sack yardage profile
const SACK_MEAN: f64 = -6.5_f64;
const SACK_STD: f64 = 2.5_f64;
const SACK_FLOOR: f64 = -15.0_f64;
const SACK_CEILING: f64 = -1.0_f64;

// Gaussian air-yard profiles per depth
const SCREEN_MEAN: f64 = 5.0_f64;
const SCREEN_STD: f64 = 6.0_f64;
const SHORT_MEAN: f64 = 6.0_f64;
const SHORT_STD: f64 = 3.0_f64;
const MEDIUM_MEAN: f64 = 12.0_f64;
const MEDIUM_STD: f64 = 5.0_f64;
const DEEP_MEAN: f64 = 26.0_f64;
const DEEP_STD: f64 = 9.0_f64;

// Progression odds: primary and secondary lean on awareness, the
// checkdown is a flat release valve
const PRIMARY_BASE: f64 = 0.45_f64;
const PRIMARY_AWARENESS_SCALE: f64 = 0.3_f64;
const SECONDARY_BASE: f64 = 0.50_f64;
const SECONDARY_AWARENESS_SCALE: f64 = 0.2_f64;
const CHECKDOWN_ODDS: f64 = 0.70_f64;

lazy_static! {
    static ref INCOMPLETE_DESCRIPTIONS: Vec<&'static str> = vec![
        "the pass sails out of reach",
        "batted down at the line",
        "dropped at the catch point",
        "overthrown down the sideline",
        "thrown behind the receiver and incomplete",
        "broken up at the last moment",
    ];
}

/// # `PassResultSimulator` struct
///
/// Resolves called passes: option keeps, scrambles, sacks, the
/// progression read, the completion roll, and interceptions.
///
/// Draw order: RPO tag (short passes from gun/pistol only), RPO keep,
/// scramble roll, sack roll; on a stand-and-throw: progression reads (up
/// to three), completion roll, then either the completion branch (yards,
/// big play, fumble, out-of-bounds, elapsed) or the incompletion branch
/// (interception, return, defender, description, elapsed).
#[derive(Clone, Debug, Default)]
pub struct PassResultSimulator {}

impl PassResultSimulator {
    /// Initialize a new pass result simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::result::pass::PassResultSimulator;
    ///
    /// let my_sim = PassResultSimulator::new();
    /// ```
    pub fn new() -> PassResultSimulator {
        PassResultSimulator::default()
    }

    /// The live sack probability after every adjustment
    fn sack_probability(&self, ctx: &ResolutionContext, qb: &Player) -> f64 {
        let formation = ctx.formation.modifiers();
        let defensive = ctx.defensive_call.modifiers();
        let mut p = SACK_RATE - ctx.rating_diff() / 100.0 * 0.03;
        p -= (qb.awareness() as f64 - 75.0) / 100.0 * 0.05;
        p *= formation.sack_rate_multiplier;
        p -= formation.quick_release_bonus;
        p *= defensive.sack_rate_multiplier;
        p += defensive.extra_rushers as f64 * 0.01;
        p.clamp(SACK_RATE_MIN, SACK_RATE_MAX)
    }

    /// Walk the progression: primary, secondary, checkdown, throwaway
    ///
    /// Receivers are ranked by overall rating; each read consumes one
    /// draw until a target sticks.
    fn progression(
        &self,
        ctx: &ResolutionContext,
        qb: &Player,
        rng: &mut ProvablyFairRng,
    ) -> Option<(usize, Player, bool)> {
        let awareness = qb.awareness() as f64 / 100.0;
        let mut receivers = ctx
            .offense
            .available_at(&[Position::WR, Position::TE]);
        receivers.sort_by(|(ai, a), (bi, b)| {
            b.overall().cmp(&a.overall()).then(ai.cmp(bi))
        });
        if let Some((index, primary)) = receivers.first() {
            if rng.probability(PRIMARY_BASE + awareness * PRIMARY_AWARENESS_SCALE) {
                return Some((*index, (*primary).clone(), false));
            }
        }
        if let Some((index, secondary)) = receivers.get(1) {
            if rng.probability(SECONDARY_BASE + awareness * SECONDARY_AWARENESS_SCALE) {
                return Some((*index, (*secondary).clone(), false));
            }
        }
        let checkdowns = ctx.offense.available_at(&[Position::RB, Position::TE]);
        if let Some((index, checkdown)) = checkdowns.first() {
            if rng.probability(CHECKDOWN_ODDS) {
                return Some((*index, (*checkdown).clone(), true));
            }
        }
        None
    }

    /// The completion probability for a throw, clamped to the model's
    /// floor and ceiling
    fn completion_probability(
        &self,
        ctx: &ResolutionContext,
        depth: PassDepth,
        qb: &Player,
        target: &Player,
        is_checkdown: bool,
        is_rpo: bool,
    ) -> f64 {
        let formation = ctx.formation.modifiers();
        let defensive = ctx.defensive_call.modifiers();
        let mut p = base_completion_rate(depth);
        p += (qb.overall() as f64 - 75.0) / 100.0 * 0.20;
        p += (target.overall() as f64 - 75.0) / 100.0 * 0.15;
        let db = ctx.defense.average_rating(&[Position::CB, Position::S]);
        p -= (db - 75.0) / 100.0 * 0.15;
        p += ctx.momentum * 0.03;
        if ctx.formation.variant == FormationVariant::PlayAction {
            p *= formation.play_action_multiplier;
            p += match ctx.defensive_call.coverage {
                CoverageShell::Cover0 | CoverageShell::Cover1 => PLAY_ACTION_VS_PRESSURE,
                CoverageShell::Cover3 | CoverageShell::Cover4 => PLAY_ACTION_VS_ZONE,
                _ => 0.0,
            };
        }
        if depth == PassDepth::Screen {
            p *= formation.screen_multiplier;
        }
        if depth == PassDepth::Deep {
            p *= formation.deep_pass_multiplier;
        }
        p *= 1.0 + formation.quick_release_bonus;
        p *= defensive.completion_at(depth);
        if is_rpo && !ctx.formation.supports_rpo() {
            p -= RPO_FORMATION_PENALTY;
        }
        if is_checkdown {
            p += CHECKDOWN_COMPLETION_BONUS;
        }
        p.clamp(COMPLETION_FLOOR, COMPLETION_CEILING)
    }

    /// Resolve a sack once the rush gets home
    fn resolve_sack(
        &self,
        call: PlayCall,
        ctx: &ResolutionContext,
        qb_ref: Option<PlayerRef>,
        qb: &Player,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let yards = rng
            .gaussian(SACK_MEAN, SACK_STD, Some(SACK_FLOOR), Some(SACK_CEILING))
            .round() as i32;
        let new_position = state.ball_position() as i32 + yards;
        let defender = ctx.defense.select_defender(rng)?;
        let defender_ref = defender.map(|(i, _)| ctx.defense.reference(i));
        let defender_name = defender
            .map(|(_, p)| p.name().to_string())
            .unwrap_or_else(|| String::from("the defense"));

        let mut builder = PlayResultBuilder::new(PlayType::Sack, call).yards_gained(yards);
        if let Some(r) = qb_ref {
            builder = builder.passer(r);
        }
        if let Some(r) = defender_ref {
            builder = builder.defender(r);
        }

        if new_position <= 0 {
            return Ok(builder
                .yards_gained(-(state.ball_position() as i32))
                .safety(true)
                .clock_stopped(true)
                .scoring(ScoringResult::new(
                    ScoringKind::Safety,
                    state.possession().opponent(),
                    defender_ref,
                ))
                .description(&format!(
                    "{} is dragged down in the end zone by {}, SAFETY",
                    qb.name(),
                    defender_name
                ))
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::Sack,
                    ctx.hurry_up,
                    rng,
                ))
                .build());
        }

        let mut turnover = None;
        if rng.probability(SACK_FUMBLE_RATE) {
            if rng.probability(FUMBLE_RECOVERY_DEFENSE) {
                turnover = Some(TurnoverResult::new(
                    TurnoverKind::Fumble,
                    state.possession().opponent(),
                    0,
                    false,
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
        let mut description = format!(
            "{} is sacked by {} for a loss of {}",
            qb.name(),
            defender_name,
            -yards
        );
        if let Some(t) = turnover {
            description = format!("{}. {}", description, t);
            builder = builder.turnover(t);
        }
        Ok(builder
            .clock_stopped(turnover.is_some())
            .description(&description)
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::Sack,
                ctx.hurry_up,
                rng,
            ))
            .build())
    }

    /// Resolve a caught ball: yardage, big play, ball security, sideline
    #[allow(clippy::too_many_arguments)]
    fn resolve_completion(
        &self,
        call: PlayCall,
        depth: PassDepth,
        ctx: &ResolutionContext,
        qb_ref: Option<PlayerRef>,
        qb: &Player,
        target_index: usize,
        target: &Player,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let (mean, std_dev) = match depth {
            PassDepth::Screen => (SCREEN_MEAN, SCREEN_STD),
            PassDepth::Short => (SHORT_MEAN, SHORT_STD),
            PassDepth::Medium => (MEDIUM_MEAN, MEDIUM_STD),
            PassDepth::Deep => (DEEP_MEAN, DEEP_STD),
        };
        let mut yards = rng.gaussian(mean, std_dev, None, None);
        yards *= ctx.momentum_factor(MOMENTUM_YARD_FACTOR);
        yards *= 1.0 + ctx.rating_diff() / 100.0 * TEAM_RATING_YARD_FACTOR;
        if rng.probability(BIG_PLAY_RATE) {
            yards += rng.random_int(BIG_PLAY_BONUS_MIN, BIG_PLAY_BONUS_MAX) as f64;
        }
        let ceiling = (100 - state.ball_position()) as i32;
        let yards = (yards.round() as i32).clamp(0, ceiling);
        let new_position = state.ball_position() as i32 + yards;
        let target_ref = ctx.offense.reference(target_index);

        let mut builder = PlayResultBuilder::new(PlayType::PassComplete, call)
            .yards_gained(yards)
            .receiver(target_ref);
        if let Some(r) = qb_ref {
            builder = builder.passer(r);
        }

        if new_position >= 100 {
            return Ok(builder
                .touchdown(true)
                .first_down(true)
                .clock_stopped(true)
                .scoring(ScoringResult::new(
                    ScoringKind::Touchdown,
                    state.possession(),
                    Some(target_ref),
                ))
                .description(&format!(
                    "{} hits {} for a {}-yard TOUCHDOWN",
                    qb.name(),
                    target.name(),
                    yards
                ))
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::PassComplete,
                    ctx.hurry_up,
                    rng,
                ))
                .build());
        }

        let mut turnover = None;
        if rng.probability(FUMBLE_RATE * CATCH_FUMBLE_MULTIPLIER) {
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
            "{} finds {} for {} yard{}",
            qb.name(),
            target.name(),
            yards,
            if yards == 1 { "" } else { "s" }
        );
        if let Some(t) = turnover {
            description = format!("{}. {}", description, t);
            builder = builder.turnover(t);
            if t.returned_for_td {
                builder = builder.scoring(ScoringResult::new(
                    ScoringKind::FumbleRecoveryTd,
                    state.possession().opponent(),
                    None,
                ));
            }
        } else if first_down {
            description.push_str(", moving the chains");
        }
        Ok(builder
            .first_down(first_down)
            .clock_stopped(out_of_bounds || turnover.is_some())
            .description(&description)
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::PassComplete,
                ctx.hurry_up,
                rng,
            ))
            .build())
    }

    /// Resolve an incompletion, including the interception branch
    fn resolve_incompletion(
        &self,
        call: PlayCall,
        ctx: &ResolutionContext,
        qb_ref: Option<PlayerRef>,
        qb: &Player,
        target_ref: Option<PlayerRef>,
        intercept_risk: bool,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let state = ctx.state;
        let defensive = ctx.defensive_call.modifiers();
        if intercept_risk
            && rng.probability(INTERCEPTION_RATE * defensive.interception_multiplier)
        {
            let (return_yards, pick_six) = interception_return(rng);
            let defender = ctx.defense.select_defender(rng)?;
            let defender_ref = defender.map(|(i, _)| ctx.defense.reference(i));
            let defender_name = defender
                .map(|(_, p)| p.name().to_string())
                .unwrap_or_else(|| String::from("the defense"));
            let turnover = TurnoverResult::new(
                TurnoverKind::Interception,
                state.possession().opponent(),
                return_yards,
                pick_six,
            );
            let mut builder = PlayResultBuilder::new(PlayType::PassIncomplete, call)
                .turnover(turnover)
                .clock_stopped(true)
                .description(&format!(
                    "{}'s pass is INTERCEPTED by {}{}",
                    qb.name(),
                    defender_name,
                    if pick_six {
                        format!(", returned {} yards for a TOUCHDOWN", return_yards)
                    } else if return_yards > 0 {
                        format!(", returned {} yards", return_yards)
                    } else {
                        String::new()
                    }
                ));
            if let Some(r) = qb_ref {
                builder = builder.passer(r);
            }
            if let Some(r) = target_ref {
                builder = builder.receiver(r);
            }
            if let Some(r) = defender_ref {
                builder = builder.defender(r);
            }
            if pick_six {
                builder = builder.scoring(ScoringResult::new(
                    ScoringKind::PickSix,
                    state.possession().opponent(),
                    defender_ref,
                ));
            }
            return Ok(builder
                .clock_elapsed(ClockManager::new().sample_elapsed(
                    ElapsedKey::PassIncomplete,
                    ctx.hurry_up,
                    rng,
                ))
                .build());
        }

        let flavor = INCOMPLETE_DESCRIPTIONS
            [rng.random_int(0, INCOMPLETE_DESCRIPTIONS.len() as i32 - 1) as usize];
        let mut builder = PlayResultBuilder::new(PlayType::PassIncomplete, call)
            .clock_stopped(true)
            .description(&format!("{} throws, {}", qb.name(), flavor));
        if let Some(r) = qb_ref {
            builder = builder.passer(r);
        }
        if let Some(r) = target_ref {
            builder = builder.receiver(r);
        }
        Ok(builder
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::PassIncomplete,
                ctx.hurry_up,
                rng,
            ))
            .build())
    }

    /// Resolve a called pass
    pub fn sim(
        &self,
        call: PlayCall,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (qb_index, qb) = ctx.offense.best_at_or_emergency(Position::QB);
        let qb_ref = qb_index.map(|i| ctx.offense.reference(i));
        let depth = call.pass_depth().unwrap_or(PassDepth::Short);
        let run_sim = RunResultSimulator::new();

        // Option keep: a tagged short pass from gun or pistol can become a
        // designed keep
        let is_rpo = call == PlayCall::PassShort
            && ctx.formation.supports_rpo()
            && rng.probability(RPO_TAG_RATE);
        if is_rpo && rng.probability(RPO_KEEP_RATE) {
            return run_sim.sim_scramble(call, ctx, rng);
        }

        // Broken-pocket scramble
        let scramble_p = SCRAMBLE_RATE * ctx.formation.modifiers().scramble_multiplier;
        if rng.probability(scramble_p) {
            return run_sim.sim_scramble(call, ctx, rng);
        }

        // The rush
        if rng.probability(self.sack_probability(ctx, &qb)) {
            return self.resolve_sack(call, ctx, qb_ref, &qb, rng);
        }

        // The read
        match self.progression(ctx, &qb, rng) {
            Some((target_index, target, is_checkdown)) => {
                let p = self.completion_probability(ctx, depth, &qb, &target, is_checkdown, is_rpo);
                if rng.probability(p) {
                    self.resolve_completion(
                        call,
                        depth,
                        ctx,
                        qb_ref,
                        &qb,
                        target_index,
                        &target,
                        rng,
                    )
                } else {
                    let target_ref = Some(ctx.offense.reference(target_index));
                    self.resolve_incompletion(call, ctx, qb_ref, &qb, target_ref, true, rng)
                }
            }
            // Nobody open: throw it away, no interception risk
            None => self.resolve_incompletion(call, ctx, qb_ref, &qb, None, false, rng),
        }
    }

    /// Resolve a clock-killing spike
    pub fn sim_spike(
        &self,
        ctx: &ResolutionContext,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayResult, SimulationError> {
        let (qb_index, qb) = ctx.offense.best_at_or_emergency(Position::QB);
        let mut builder = PlayResultBuilder::new(PlayType::Spike, PlayCall::Spike)
            .clock_stopped(true)
            .description(&format!("{} spikes the ball to stop the clock", qb.name()))
            .clock_elapsed(ClockManager::new().sample_elapsed(
                ElapsedKey::Spike,
                ctx.hurry_up,
                rng,
            ));
        if let Some(i) = qb_index {
            builder = builder.passer(ctx.offense.reference(i));
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
        FormationCall, OffensiveFormation, PersonnelGroup,
    };
    use crate::game::state::GameState;
    use crate::player::{Squad, TeamSide};

    fn roster() -> Vec<Player> {
        let mut players = Vec::new();
        let mut id = 1;
        for (position, count, overall) in [
            (Position::QB, 1, 90),
            (Position::RB, 2, 84),
            (Position::WR, 3, 86),
            (Position::TE, 1, 80),
            (Position::OL, 5, 82),
            (Position::DL, 4, 83),
            (Position::LB, 3, 81),
            (Position::CB, 3, 82),
            (Position::S, 2, 80),
            (Position::K, 1, 78),
            (Position::P, 1, 76),
        ] {
            for n in 0..count {
                players.push(
                    Player::from_properties(
                        id,
                        &format!("{:?} {}", position, n + 1),
                        position,
                        (id % 99) + 1,
                        overall,
                        78,
                        78,
                        80,
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

    fn formation() -> FormationCall {
        FormationCall {
            formation: OffensiveFormation::Shotgun,
            personnel: PersonnelGroup::Posse11,
            variant: FormationVariant::None,
        }
    }

    fn defensive_call() -> DefensiveCall {
        DefensiveCall {
            personnel: DefensivePersonnel::Nickel,
            coverage: CoverageShell::Cover3,
            blitz: BlitzPackage::None,
        }
    }

    #[test]
    fn test_completion_probability_clamped() {
        let sim = PassResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        let ctx = ResolutionContext {
            state: &state,
            offense: &offense,
            defense: &defense,
            offense_rating: 99,
            defense_rating: 70,
            momentum: 1.0,
            formation: formation(),
            defensive_call: defensive_call(),
            hurry_up: false,
        };
        let qb = &home[0];
        let wr = &home[3];
        let p = sim.completion_probability(&ctx, PassDepth::Screen, qb, wr, true, false);
        assert!(p <= COMPLETION_CEILING);
        let weak_ctx = ResolutionContext {
            offense_rating: 70,
            defense_rating: 99,
            momentum: -1.0,
            ..ctx
        };
        let p = sim.completion_probability(&weak_ctx, PassDepth::Deep, qb, wr, false, false);
        assert!(p >= COMPLETION_FLOOR);
    }

    #[test]
    fn test_pass_outcomes_are_well_formed() {
        let sim = PassResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 50;
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut completions = 0;
        let mut incompletions = 0;
        let mut sacks = 0;
        for _ in 0..256 {
            let ctx = ResolutionContext {
                state: &state,
                offense: &offense,
                defense: &defense,
                offense_rating: 85,
                defense_rating: 85,
                momentum: 0.0,
                formation: formation(),
                defensive_call: defensive_call(),
                hurry_up: false,
            };
            let result = sim.sim(PlayCall::PassMedium, &ctx, &mut rng).unwrap();
            match result.play_type() {
                PlayType::PassComplete => {
                    completions += 1;
                    assert!(result.yards_gained() >= 0);
                    assert!(result.receiver().is_some());
                }
                PlayType::PassIncomplete => {
                    incompletions += 1;
                    assert!(result.is_clock_stopped());
                    assert_eq!(result.yards_gained(), 0);
                }
                PlayType::Sack => {
                    sacks += 1;
                    assert!(result.yards_gained() < 0);
                }
                PlayType::Scramble => {}
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert!(completions > 50);
        assert!(incompletions > 10);
        assert!(sacks > 0);
    }

    #[test]
    fn test_sack_at_own_one_is_a_safety() {
        let sim = PassResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 1;
        let ctx = ResolutionContext {
            state: &state,
            offense: &offense,
            defense: &defense,
            offense_rating: 85,
            defense_rating: 85,
            momentum: 0.0,
            formation: formation(),
            defensive_call: defensive_call(),
            hurry_up: false,
        };
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let qb = &home[0];
        let result = sim
            .resolve_sack(PlayCall::PassShort, &ctx, None, qb, &mut rng)
            .unwrap();
        assert!(result.is_safety());
        let score = result.scoring().unwrap();
        assert_eq!(score.kind, ScoringKind::Safety);
        assert_eq!(score.team, TeamSide::Away);
        assert_eq!(result.yards_gained(), -1);
    }

    #[test]
    fn test_interceptions_occur_and_flip_to_the_defense() {
        let sim = PassResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 40;
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let mut interceptions = 0;
        for _ in 0..600 {
            let ctx = ResolutionContext {
                state: &state,
                offense: &offense,
                defense: &defense,
                offense_rating: 85,
                defense_rating: 85,
                momentum: 0.0,
                formation: formation(),
                defensive_call: defensive_call(),
                hurry_up: false,
            };
            let result = sim.sim(PlayCall::PassDeep, &ctx, &mut rng).unwrap();
            if let Some(turnover) = result.turnover() {
                if turnover.kind == TurnoverKind::Interception {
                    interceptions += 1;
                    assert_eq!(turnover.recovered_by, TeamSide::Away);
                    assert!((0..=80).contains(&turnover.return_yards));
                }
            }
        }
        assert!(interceptions > 0);
    }

    #[test]
    fn test_spike_is_an_instant_clock_stop() {
        let sim = PassResultSimulator::new();
        let home = roster();
        let away = roster();
        let offense = Squad::new(TeamSide::Home, &home, &[]);
        let defense = Squad::new(TeamSide::Away, &away, &[]);
        let mut state = GameState::new();
        state.kickoff = false;
        let ctx = ResolutionContext {
            state: &state,
            offense: &offense,
            defense: &defense,
            offense_rating: 85,
            defense_rating: 85,
            momentum: 0.0,
            formation: formation(),
            defensive_call: defensive_call(),
            hurry_up: true,
        };
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        let result = sim.sim_spike(&ctx, &mut rng).unwrap();
        assert_eq!(result.play_type(), PlayType::Spike);
        assert!(result.is_clock_stopped());
        assert!(result.clock_elapsed() <= 2);
    }
}
