#![doc = include_str!("../../docs/game/engine.md")]
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::boxscore::BoxScore;
use crate::error::SimulationError;
use crate::game::clock::{ClockManager, PeriodEnd, PlayClockReset};
use crate::game::defense::{
    BlitzPackage, CoverageShell, DefensiveCall, DefensiveCallSimulator, DefensivePersonnel,
};
use crate::game::drive::DriveResult;
use crate::game::event::{playback_delay, CommentarySimulator, GameEvent};
use crate::game::formation::{
    FormationCall, FormationSimulator, FormationVariant, OffensiveFormation, PersonnelGroup,
};
use crate::game::injury::InjuryTracker;
use crate::game::narrative::NarrativeTracker;
use crate::game::penalty::PenaltySimulator;
use crate::game::play::call::{PlayCall, PlayCallSimulator};
use crate::game::play::result::conversion::ConversionResultSimulator;
use crate::game::play::result::fieldgoal::FieldGoalResultSimulator;
use crate::game::play::result::kickoff::KickoffResultSimulator;
use crate::game::play::result::pass::PassResultSimulator;
use crate::game::play::result::punt::PuntResultSimulator;
use crate::game::play::result::run::RunResultSimulator;
use crate::game::play::result::{
    PlayResult, PlayType, ResolutionContext, ScoringKind,
};
use crate::game::state::{
    GameState, Quarter, FIRST_DOWN_DISTANCE, KICKOFF_SPOT, SAFETY_FREE_KICK_SPOT,
};
use crate::game::stats::{GameStats, MvpResult};
use crate::game::tables::MAX_EVENTS;
use crate::game::turnover::{TurnoverKind, TurnoverResult};
use crate::game::GameType;
use crate::player::{Player, Squad, TeamSide};
use crate::rng::{
    generate_client_seed, generate_server_seed, hash_server_seed, ProvablyFairRng,
};
use crate::team::Team;

// Spot the ball is placed at for a try after a touchdown
const TRY_SPOT: u32 = 98;

/// # `SimulatedGame` struct
///
/// The immutable completed-game record: the full event stream, the final
/// score, the seeds and their published hash, the nonce consumed, the
/// box score, drives, and MVP. A third party holding the seeds can
/// recompute every byte.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulatedGame {
    id: String,
    home_team: Team,
    away_team: Team,
    game_type: GameType,
    events: Vec<GameEvent>,
    home_score: u32,
    away_score: u32,
    server_seed: String,
    server_seed_hash: String,
    client_seed: String,
    nonce: u64,
    total_plays: u64,
    mvp: Option<MvpResult>,
    box_score: BoxScore,
}

impl SimulatedGame {
    /// Get the deterministic game id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the home team record
    pub fn home_team(&self) -> &Team {
        &self.home_team
    }

    /// Get the away team record
    pub fn away_team(&self) -> &Team {
        &self.away_team
    }

    /// Get the game type
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Get the ordered event stream
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Get the home final score
    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    /// Get the away final score
    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    /// Get the revealed server seed
    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    /// Get the hash published before the simulation ran
    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    /// Get the client seed
    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Get the total primitive draws the simulation consumed
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Get the number of plays simulated
    pub fn total_plays(&self) -> u64 {
        self.total_plays
    }

    /// Get the most valuable player
    pub fn mvp(&self) -> Option<&MvpResult> {
        self.mvp.as_ref()
    }

    /// Get the frozen box score
    pub fn box_score(&self) -> &BoxScore {
        &self.box_score
    }

    /// Get the winning side, or `None` for a tie
    pub fn winner(&self) -> Option<TeamSide> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Overtime bookkeeping: who got the first crack, and whether the game
/// has reached answer-for-answer sudden death
#[derive(Clone, Copy, Debug, Default)]
struct OvertimeTracker {
    first_possessor: Option<TeamSide>,
    sudden_death: bool,
}

/// # `GameSimulator` struct
///
/// The orchestrator. Composes the play caller, the package selectors,
/// every resolver, the penalty and injury engines, the clock, the stats
/// accumulator, and the narrative tracker into the synchronous game
/// loop.
pub struct GameSimulator {
    playcall: PlayCallSimulator,
    formation: FormationSimulator,
    defense: DefensiveCallSimulator,
    run: RunResultSimulator,
    pass: PassResultSimulator,
    kickoff: KickoffResultSimulator,
    punt: PuntResultSimulator,
    fieldgoal: FieldGoalResultSimulator,
    conversion: ConversionResultSimulator,
    penalty: PenaltySimulator,
    clock: ClockManager,
    commentary: CommentarySimulator,
}

impl Default for GameSimulator {
    fn default() -> Self {
        GameSimulator {
            playcall: PlayCallSimulator::new(),
            formation: FormationSimulator::new(),
            defense: DefensiveCallSimulator::new(),
            run: RunResultSimulator::new(),
            pass: PassResultSimulator::new(),
            kickoff: KickoffResultSimulator::new(),
            punt: PuntResultSimulator::new(),
            fieldgoal: FieldGoalResultSimulator::new(),
            conversion: ConversionResultSimulator::new(),
            penalty: PenaltySimulator::new(),
            clock: ClockManager::new(),
            commentary: CommentarySimulator::new(),
        }
    }
}

impl GameSimulator {
    /// Initialize a new game simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::engine::GameSimulator;
    ///
    /// let my_sim = GameSimulator::new();
    /// ```
    pub fn new() -> GameSimulator {
        GameSimulator::default()
    }

    /// The neutral package used on plays that never read the pre-snap
    /// chess match (kicks, tries, kneels, spikes)
    fn neutral_packages() -> (FormationCall, DefensiveCall) {
        (
            FormationCall {
                formation: OffensiveFormation::Singleback,
                personnel: PersonnelGroup::Posse11,
                variant: FormationVariant::None,
            },
            DefensiveCall {
                personnel: DefensivePersonnel::Base43,
                coverage: CoverageShell::Cover3,
                blitz: BlitzPackage::None,
            },
        )
    }

    /// Whether the clock keeps running after a play
    fn clock_keeps_running(play: &PlayResult, state: &GameState) -> bool {
        if play.is_clock_stopped()
            || play.scoring().is_some()
            || play.turnover().is_some()
        {
            return false;
        }
        if play
            .penalty()
            .map(|p| p.is_enforced())
            .unwrap_or(false)
        {
            return false;
        }
        if matches!(
            play.play_type(),
            PlayType::PassIncomplete
                | PlayType::Spike
                | PlayType::Punt
                | PlayType::FieldGoalGood
                | PlayType::FieldGoalMissed
                | PlayType::Kickoff
                | PlayType::OnsideKick
                | PlayType::ExtraPointGood
                | PlayType::ExtraPointMissed
                | PlayType::TwoPointSuccess
                | PlayType::TwoPointFailure
                | PlayType::PenaltyNoPlay
        ) {
            return false;
        }
        // An in-bounds first down stops the clock late in either half
        if play.is_first_down() && state.quarter().is_half_end() && state.clock() <= 120 {
            return false;
        }
        true
    }

    /// Simulate one complete game
    ///
    /// Seeds are generated from the OS CSPRNG when not supplied. Input
    /// validation happens here; once the loop starts, only an invariant
    /// violation can abort.
    #[allow(clippy::too_many_arguments)]
    pub fn simulate(
        &self,
        home_team: &Team,
        away_team: &Team,
        home_roster: &[Player],
        away_roster: &[Player],
        game_type: GameType,
        server_seed: Option<&str>,
        client_seed: Option<&str>,
    ) -> Result<SimulatedGame, SimulationError> {
        if home_roster.is_empty() {
            return Err(SimulationError::EmptyRoster(String::from(
                "home roster has no players",
            )));
        }
        if away_roster.is_empty() {
            return Err(SimulationError::EmptyRoster(String::from(
                "away roster has no players",
            )));
        }

        let server_seed = server_seed
            .map(String::from)
            .unwrap_or_else(generate_server_seed);
        let client_seed = client_seed
            .map(String::from)
            .unwrap_or_else(generate_client_seed);
        let server_seed_hash = hash_server_seed(&server_seed);
        let mut rng = ProvablyFairRng::new(&server_seed, &client_seed)?;

        // The game id is derived from the seed pair, so it reproduces too
        let mut hasher = Sha256::new();
        hasher.update(server_seed.as_bytes());
        hasher.update(b":");
        hasher.update(client_seed.as_bytes());
        let id = format!("game-{}", &hex::encode(hasher.finalize())[..16]);

        let mut state = GameState::new();
        let mut stats = GameStats::new();
        let mut injuries = InjuryTracker::new();
        let rivalry = home_team.conference() == away_team.conference()
            && home_team.division() == away_team.division();
        let mut narrative = NarrativeTracker::new(rivalry);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut timestamp_ms: u64 = 0;
        let mut game_over = false;
        let mut overtime = OvertimeTracker::default();
        // Home kicks the opener, so the away side receives the second half
        let second_half_kicker = TeamSide::Away;

        debug!(
            "kickoff: {} vs {} ({})",
            home_team.abbreviation(),
            away_team.abbreviation(),
            game_type
        );

        while !game_over {
            if events.len() >= MAX_EVENTS {
                debug!("event safety cap reached, forcing the final gun");
                break;
            }

            let before = state;
            state.is_halftime = false;

            let home_squad = Squad::new(TeamSide::Home, home_roster, injuries.out_for(TeamSide::Home));
            let away_squad = Squad::new(TeamSide::Away, away_roster, injuries.out_for(TeamSide::Away));
            let (offense, defense, offense_team, defense_team) = match state.possession() {
                TeamSide::Home => (&home_squad, &away_squad, home_team, away_team),
                TeamSide::Away => (&away_squad, &home_squad, away_team, home_team),
            };
            if offense.is_empty() {
                return Err(SimulationError::EmptyRoster(String::from(
                    "offense has no available players",
                )));
            }

            // 1. the call
            let call = self
                .playcall
                .sim(&state, offense_team.play_style(), &mut rng)?;

            // 2. the pre-snap chess match, for plays that read it
            let reads_packages = matches!(
                call,
                PlayCall::RunInside
                    | PlayCall::RunOutside
                    | PlayCall::PassShort
                    | PlayCall::PassMedium
                    | PlayCall::PassDeep
                    | PlayCall::ScreenPass
            );
            let (formation, defensive_call) = if reads_packages {
                let formation = self.formation.sim(call, &state, &mut rng)?;
                let defensive_call = self.defense.sim(
                    &state,
                    &formation,
                    offense_team.play_style(),
                    &mut rng,
                )?;
                (formation, defensive_call)
            } else {
                Self::neutral_packages()
            };

            let ctx = ResolutionContext {
                state: &before,
                offense,
                defense,
                offense_rating: offense_team.offense_rating(),
                defense_rating: defense_team.defense_rating(),
                momentum: narrative.normalized_for(state.possession()),
                formation,
                defensive_call,
                hurry_up: self.clock.in_two_minute_window(&state),
            };

            // 3. the snap
            let mut play = match call {
                PlayCall::KickoffNormal => self.kickoff.sim(&ctx, &mut rng)?,
                PlayCall::OnsideKick => self.kickoff.sim_onside(&ctx, &mut rng)?,
                PlayCall::ExtraPoint => self.fieldgoal.sim_extra_point(&ctx, &mut rng)?,
                PlayCall::TwoPointRun | PlayCall::TwoPointPass => {
                    self.conversion.sim(call, &ctx, &mut rng)?
                }
                PlayCall::Punt => self.punt.sim(&ctx, &mut rng)?,
                PlayCall::FieldGoal => self.fieldgoal.sim(&ctx, &mut rng)?,
                PlayCall::Kneel => self.run.sim_kneel(&ctx, &mut rng)?,
                PlayCall::Spike => self.pass.sim_spike(&ctx, &mut rng)?,
                PlayCall::RunInside | PlayCall::RunOutside => {
                    self.run.sim(call, &ctx, &mut rng)?
                }
                PlayCall::PassShort
                | PlayCall::PassMedium
                | PlayCall::PassDeep
                | PlayCall::ScreenPass => self.pass.sim(call, &ctx, &mut rng)?,
            };

            // 4. the flag. Kickoffs, tries, kneels, and spikes skip it.
            let penalty_eligible = !matches!(
                call,
                PlayCall::KickoffNormal
                    | PlayCall::OnsideKick
                    | PlayCall::ExtraPoint
                    | PlayCall::TwoPointRun
                    | PlayCall::TwoPointPass
                    | PlayCall::Kneel
                    | PlayCall::Spike
            );
            let mut enforcement = None;
            if penalty_eligible {
                if let Some(flag) =
                    self.penalty
                        .sim(&before, &play, offense, defense, &mut rng)?
                {
                    // Accepted and offsetting flags rewrite the spot;
                    // declined flags only annotate the play
                    if !flag.declined {
                        enforcement = Some(self.penalty.enforce(&before, &flag));
                    }
                    let flag_line = flag.description.clone();
                    if !flag.declined {
                        if flag.is_pre_snap() {
                            // The play never happened
                            play = crate::game::play::result::PlayResultBuilder::new(
                                PlayType::PenaltyNoPlay,
                                call,
                            )
                            .clock_stopped(true)
                            .description(&flag_line)
                            .build();
                        } else {
                            // The play is wiped off the books but the time
                            // it took still ran
                            play.yards_gained = 0;
                            play.scoring = None;
                            play.turnover = None;
                            play.is_touchdown = false;
                            play.is_safety = false;
                            play.is_first_down = false;
                            play.description =
                                format!("{}. {}", play.description, flag_line);
                        }
                    } else {
                        play.description = format!("{}. {}", play.description, flag_line);
                    }
                    play.penalty = Some(flag);
                }
            }

            // 5. apply the result
            let mut drive_ended: Option<DriveResult> = None;
            let mut start_drive_for: Option<TeamSide> = None;
            let mut play_clock_reset = PlayClockReset::Normal;

            if let Some(enf) = enforcement {
                play_clock_reset = PlayClockReset::AfterPenalty;
                state.ball_position = enf.ball_position;
                state.yards_to_go = enf.yards_to_go;
                if enf.automatic_first_down {
                    state.down = 1;
                } else if enf.down > 4 {
                    // A loss-of-down foul on fourth: the ball goes over
                    let downs = TurnoverResult::new(
                        TurnoverKind::TurnoverOnDowns,
                        state.possession().opponent(),
                        0,
                        false,
                    );
                    play.turnover = Some(downs);
                    drive_ended = Some(DriveResult::TurnoverOnDowns);
                    state.possession = state.possession().opponent();
                    state.ball_position =
                        GameState::clamp_ball(100 - enf.ball_position as i32);
                    state.down = 1;
                    state.yards_to_go =
                        FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
                    start_drive_for = Some(state.possession());
                } else {
                    state.down = enf.down;
                }
            } else {
                match play.play_type() {
                    PlayType::Kickoff | PlayType::OnsideKick => {
                        let kick = play.kick().copied().unwrap_or_default();
                        if kick.recovered_by_kicking_team {
                            state.ball_position = kick.landing_spot;
                        } else {
                            state.possession = state.possession().opponent();
                            state.ball_position = kick.landing_spot;
                        }
                        state.kickoff = false;
                        state.down = 1;
                        state.yards_to_go =
                            FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
                        if state.quarter() == Quarter::Overtime
                            && overtime.first_possessor.is_none()
                        {
                            overtime.first_possessor = Some(state.possession());
                        }
                        start_drive_for = Some(state.possession());
                    }
                    PlayType::ExtraPointGood
                    | PlayType::ExtraPointMissed
                    | PlayType::TwoPointSuccess
                    | PlayType::TwoPointFailure => {
                        play_clock_reset = PlayClockReset::AfterScore;
                        if let Some(scoring) = play.scoring() {
                            match scoring.team {
                                TeamSide::Home => state.home_score += scoring.points,
                                TeamSide::Away => state.away_score += scoring.points,
                            }
                        }
                        // Tee it up from the 35
                        state.pat_attempt = false;
                        state.kickoff = true;
                        state.ball_position = KICKOFF_SPOT;
                        state.down = 1;
                        state.yards_to_go = FIRST_DOWN_DISTANCE;
                    }
                    PlayType::Punt => {
                        play_clock_reset = PlayClockReset::AfterTurnover;
                        let kick = play.kick().copied().unwrap_or_default();
                        drive_ended = Some(DriveResult::Punt);
                        if kick.recovered_by_kicking_team {
                            // Muffed: the kicking team keeps it, fresh set
                            state.ball_position = kick.landing_spot;
                        } else {
                            state.possession = state.possession().opponent();
                            state.ball_position = kick.landing_spot;
                        }
                        state.down = 1;
                        state.yards_to_go =
                            FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
                        start_drive_for = Some(state.possession());
                    }
                    PlayType::FieldGoalGood => {
                        play_clock_reset = PlayClockReset::AfterScore;
                        if let Some(scoring) = play.scoring() {
                            match scoring.team {
                                TeamSide::Home => state.home_score += scoring.points,
                                TeamSide::Away => state.away_score += scoring.points,
                            }
                        }
                        drive_ended = Some(DriveResult::FieldGoal);
                        state.kickoff = true;
                        state.ball_position = KICKOFF_SPOT;
                        state.down = 1;
                        state.yards_to_go = FIRST_DOWN_DISTANCE;
                    }
                    PlayType::FieldGoalMissed => {
                        play_clock_reset = PlayClockReset::AfterTurnover;
                        let kick = play.kick().copied().unwrap_or_default();
                        drive_ended = Some(DriveResult::TurnoverOnDowns);
                        state.possession = state.possession().opponent();
                        state.ball_position = kick.landing_spot;
                        state.down = 1;
                        state.yards_to_go =
                            FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
                        start_drive_for = Some(state.possession());
                    }
                    _ => {
                        // A play from scrimmage
                        self.apply_scrimmage_play(
                            &mut state,
                            &mut play,
                            &before,
                            &mut drive_ended,
                            &mut start_drive_for,
                            &mut play_clock_reset,
                        );
                    }
                }
            }

            // Sudden-death arming: once anyone but the opening possessor
            // has the ball in overtime, the next lead ends it
            if state.quarter() == Quarter::Overtime {
                if let Some(first) = overtime.first_possessor {
                    if state.possession() != first {
                        overtime.sudden_death = true;
                    }
                }
            }

            // Overtime scoring resolution
            if state.quarter() == Quarter::Overtime
                && state.home_score != state.away_score
                && play.scoring().is_some()
            {
                let decisive = overtime.sudden_death
                    || play
                        .scoring()
                        .map(|s| {
                            matches!(
                                s.kind,
                                ScoringKind::Touchdown
                                    | ScoringKind::PickSix
                                    | ScoringKind::FumbleRecoveryTd
                                    | ScoringKind::Safety
                            )
                        })
                        .unwrap_or(false);
                if decisive {
                    game_over = true;
                }
            }

            // 6. the clock. A play cannot consume more time than remains
            // in the period.
            play.clock_elapsed = play.clock_elapsed.min(state.clock);
            let warning_fired = self.clock.advance(&mut state, play.clock_elapsed());
            if !warning_fired {
                state.is_clock_running = Self::clock_keeps_running(&play, &state);
            }
            state.play_clock = self.clock.play_clock_for(play_clock_reset);

            // A trailing defense burns its timeouts late to stop the bleed
            if state.is_clock_running
                && state.quarter() == Quarter::Fourth
                && state.clock() < 300
                && state.clock() > 0
            {
                let defending = state.possession().opponent();
                let trailing_or_tied =
                    state.score_of(defending) <= state.score_of(state.possession());
                if trailing_or_tied && state.timeouts_of(defending) > 0 {
                    match defending {
                        TeamSide::Home => state.home_timeouts -= 1,
                        TeamSide::Away => state.away_timeouts -= 1,
                    }
                    state.is_clock_running = false;
                    trace!("timeout, defense ({:?})", defending);
                }
            }

            // 7. period bookkeeping
            if state.clock() == 0 && !game_over {
                match self.clock.end_of_period(&mut state, game_type) {
                    PeriodEnd::NextQuarter | PeriodEnd::OvertimePeriod => {}
                    PeriodEnd::Halftime => {
                        debug!("halftime: {}-{}", state.home_score, state.away_score);
                        if drive_ended.is_none() && stats.current_drive().is_some() {
                            drive_ended = Some(DriveResult::EndOfHalf);
                        }
                        start_drive_for = None;
                        state.possession = second_half_kicker;
                        state.kickoff = true;
                        state.pat_attempt = false;
                        state.ball_position = KICKOFF_SPOT;
                        state.down = 1;
                        state.yards_to_go = FIRST_DOWN_DISTANCE;
                        state.is_clock_running = false;
                    }
                    PeriodEnd::GameOver => {
                        if drive_ended.is_none() && stats.current_drive().is_some() {
                            drive_ended = Some(DriveResult::EndOfHalf);
                        }
                        start_drive_for = None;
                        game_over = true;
                    }
                    PeriodEnd::OvertimeStart => {
                        debug!("tied after regulation, overtime");
                        if drive_ended.is_none() && stats.current_drive().is_some() {
                            drive_ended = Some(DriveResult::EndOfHalf);
                        }
                        start_drive_for = None;
                        // Fresh coin flip for the overtime kick
                        let home_kicks = rng.probability(0.5);
                        state.possession = if home_kicks {
                            TeamSide::Home
                        } else {
                            TeamSide::Away
                        };
                        state.kickoff = true;
                        state.pat_attempt = false;
                        state.ball_position = KICKOFF_SPOT;
                        state.down = 1;
                        state.yards_to_go = FIRST_DOWN_DISTANCE;
                        state.is_clock_running = false;
                        overtime = OvertimeTracker::default();
                    }
                }
            }

            // 8. the books, while the play's own drive is still open
            stats.update(&play, &before);
            let closing_drive = stats.current_drive().map(|d| d.number());

            // 9. drives
            if let Some(result) = drive_ended {
                stats.end_drive(result);
                debug!("drive over: {:?}", result);
            }
            if !game_over {
                if let Some(side) = start_drive_for {
                    stats.start_drive(side, &state);
                }
            }

            // 10. injuries ride along on the archived play
            if let Some(injury) =
                injuries.roll(&play, &home_squad, &away_squad, &mut rng)?
            {
                play.injury = Some(injury);
            }

            // 11. the booth
            let event_number = events.len() as u64 + 1;
            let snapshot = narrative.update(
                &play,
                &before,
                &state,
                event_number,
                home_roster,
                away_roster,
            );
            let commentary = self.commentary.sim(&play, &state, &snapshot, &mut rng);
            timestamp_ms += playback_delay(&play, &snapshot);

            if play.scoring().is_some() {
                debug!(
                    "score: {} ({}-{})",
                    play.description(),
                    state.home_score,
                    state.away_score
                );
            }
            trace!("#{} {}", event_number, play.description());

            // 12. the archive. The play that ends a drive still belongs to
            // it; kicks between drives ride with whichever is open.
            let drive_number = closing_drive
                .or_else(|| stats.current_drive().map(|d| d.number()))
                .unwrap_or(stats.drives().len() as u32);
            events.push(GameEvent::new(
                event_number,
                play,
                commentary,
                state,
                snapshot,
                timestamp_ms,
                drive_number,
            ));

            // 13. post-conditions; a failure here is a simulator bug
            if !state.kickoff && !state.pat_attempt {
                state
                    .validate()
                    .map_err(SimulationError::InvariantViolation)?;
            }
        }

        if stats.current_drive().is_some() {
            stats.end_drive(DriveResult::EndOfHalf);
        }

        let winner = match state.home_score.cmp(&state.away_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        };
        let mvp = stats.determine_mvp(home_roster, away_roster, winner);
        let box_score = BoxScore::from_stats(
            &stats,
            home_team,
            away_team,
            home_roster,
            away_roster,
            state.home_score,
            state.away_score,
        );
        debug!(
            "final: {} {} - {} {}",
            home_team.abbreviation(),
            state.home_score,
            away_team.abbreviation(),
            state.away_score
        );

        let total_plays = events.len() as u64;
        Ok(SimulatedGame {
            id,
            home_team: home_team.clone(),
            away_team: away_team.clone(),
            game_type,
            events,
            home_score: state.home_score,
            away_score: state.away_score,
            server_seed,
            server_seed_hash,
            client_seed,
            nonce: rng.nonce(),
            total_plays,
            mvp,
            box_score,
        })
    }

    /// Apply a scrimmage play's effects to the state: ball movement,
    /// scoring transitions, possession flips, down-and-distance
    fn apply_scrimmage_play(
        &self,
        state: &mut GameState,
        play: &mut PlayResult,
        before: &GameState,
        drive_ended: &mut Option<DriveResult>,
        start_drive_for: &mut Option<TeamSide>,
        play_clock_reset: &mut PlayClockReset,
    ) {
        // Safety: two to the defense, then a free kick from the 20 by the
        // team that gave it up
        if play.is_safety() {
            *play_clock_reset = PlayClockReset::AfterScore;
            if let Some(scoring) = play.scoring() {
                match scoring.team {
                    TeamSide::Home => state.home_score += scoring.points,
                    TeamSide::Away => state.away_score += scoring.points,
                }
            }
            *drive_ended = Some(DriveResult::Safety);
            state.kickoff = true;
            state.ball_position = SAFETY_FREE_KICK_SPOT;
            state.down = 1;
            state.yards_to_go = FIRST_DOWN_DISTANCE;
            return;
        }

        // Offensive touchdown: six points and the try
        if play.is_touchdown() {
            *play_clock_reset = PlayClockReset::AfterScore;
            if let Some(scoring) = play.scoring() {
                match scoring.team {
                    TeamSide::Home => state.home_score += scoring.points,
                    TeamSide::Away => state.away_score += scoring.points,
                }
            }
            *drive_ended = Some(DriveResult::Touchdown);
            state.pat_attempt = true;
            state.ball_position = TRY_SPOT;
            state.down = 1;
            state.yards_to_go = 100 - TRY_SPOT;
            return;
        }

        // Live-ball turnovers
        if let Some(turnover) = play.turnover().copied() {
            if turnover.changes_possession(before.possession()) {
                *play_clock_reset = PlayClockReset::AfterTurnover;
                *drive_ended = Some(match turnover.kind {
                    TurnoverKind::TurnoverOnDowns => DriveResult::TurnoverOnDowns,
                    _ => DriveResult::Turnover,
                });
                if turnover.returned_for_td {
                    // The defense takes it the distance; the scoring team
                    // kicks off from the 35 next
                    if let Some(scoring) = play.scoring() {
                        match scoring.team {
                            TeamSide::Home => state.home_score += scoring.points,
                            TeamSide::Away => state.away_score += scoring.points,
                        }
                    }
                    state.possession = turnover.recovered_by;
                    state.kickoff = true;
                    state.ball_position = KICKOFF_SPOT;
                    state.down = 1;
                    state.yards_to_go = FIRST_DOWN_DISTANCE;
                    return;
                }
                let spot = GameState::clamp_ball(
                    before.ball_position() as i32 + play.yards_gained(),
                );
                state.possession = turnover.recovered_by;
                state.ball_position = turnover.spot_after(spot);
                state.down = 1;
                state.yards_to_go = FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
                *start_drive_for = Some(state.possession());
                return;
            }
        }

        // Ordinary yardage
        let line_to_gain = before.ball_position() + before.yards_to_go();
        state.ball_position =
            GameState::clamp_ball(before.ball_position() as i32 + play.yards_gained());
        if play.is_first_down() {
            state.down = 1;
            state.yards_to_go = FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
        } else if before.down() >= 4 {
            // Fourth down came up short: the ball goes over
            let downs = TurnoverResult::new(
                TurnoverKind::TurnoverOnDowns,
                before.possession().opponent(),
                0,
                false,
            );
            play.turnover = Some(downs);
            play.description = format!("{}. Turnover on downs", play.description);
            *play_clock_reset = PlayClockReset::AfterTurnover;
            *drive_ended = Some(DriveResult::TurnoverOnDowns);
            state.possession = before.possession().opponent();
            state.ball_position = downs.spot_after(state.ball_position);
            state.down = 1;
            state.yards_to_go = FIRST_DOWN_DISTANCE.min(100 - state.ball_position);
            *start_drive_for = Some(state.possession());
        } else {
            state.down = before.down() + 1;
            state.yards_to_go = line_to_gain
                .saturating_sub(state.ball_position)
                .max(1)
                .min(100 - state.ball_position);
        }
    }
}
