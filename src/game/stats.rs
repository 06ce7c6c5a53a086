#![doc = include_str!("../../docs/game/stats.md")]
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::drive::{Drive, DriveResult};
use crate::game::play::result::{PlayResult, PlayType, ScoringResult};
use crate::game::state::{GameState, Quarter};
use crate::game::turnover::TurnoverKind;
use crate::player::{Player, PlayerRef, Position, TeamSide};

/// # `PassingStats` struct
///
/// Aggregated passing numbers for one player
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PassingStats {
    attempts: u32,
    completions: u32,
    yards: i32,
    touchdowns: u32,
    interceptions: u32,
}

impl PassingStats {
    /// Get the pass attempts
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Get the completions
    pub fn completions(&self) -> u32 {
        self.completions
    }

    /// Get the passing yards
    pub fn yards(&self) -> i32 {
        self.yards
    }

    /// Get the passing touchdowns
    pub fn touchdowns(&self) -> u32 {
        self.touchdowns
    }

    /// Get the interceptions thrown
    pub fn interceptions(&self) -> u32 {
        self.interceptions
    }
}

impl std::fmt::Display for PassingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}, {} yds, {} TD, {} INT",
            self.completions, self.attempts, self.yards, self.touchdowns, self.interceptions
        )
    }
}

/// # `RushingStats` struct
///
/// Aggregated rushing numbers for one player
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RushingStats {
    carries: u32,
    yards: i32,
    touchdowns: u32,
    fumbles: u32,
}

impl RushingStats {
    /// Get the carries
    pub fn carries(&self) -> u32 {
        self.carries
    }

    /// Get the rushing yards
    pub fn yards(&self) -> i32 {
        self.yards
    }

    /// Get the rushing touchdowns
    pub fn touchdowns(&self) -> u32 {
        self.touchdowns
    }

    /// Get the fumbles
    pub fn fumbles(&self) -> u32 {
        self.fumbles
    }
}

/// # `ReceivingStats` struct
///
/// Aggregated receiving numbers for one player
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceivingStats {
    targets: u32,
    receptions: u32,
    yards: i32,
    touchdowns: u32,
}

impl ReceivingStats {
    /// Get the targets
    pub fn targets(&self) -> u32 {
        self.targets
    }

    /// Get the receptions
    pub fn receptions(&self) -> u32 {
        self.receptions
    }

    /// Get the receiving yards
    pub fn yards(&self) -> i32 {
        self.yards
    }

    /// Get the receiving touchdowns
    pub fn touchdowns(&self) -> u32 {
        self.touchdowns
    }
}

/// # `DefensiveStats` struct
///
/// Aggregated defensive numbers for one player
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DefensiveStats {
    tackles: u32,
    sacks: u32,
    forced_fumbles: u32,
    interceptions: u32,
}

impl DefensiveStats {
    /// Get the tackles
    pub fn tackles(&self) -> u32 {
        self.tackles
    }

    /// Get the sacks
    pub fn sacks(&self) -> u32 {
        self.sacks
    }

    /// Get the forced fumbles
    pub fn forced_fumbles(&self) -> u32 {
        self.forced_fumbles
    }

    /// Get the interceptions
    pub fn interceptions(&self) -> u32 {
        self.interceptions
    }
}

/// # `KickingStats` struct
///
/// Aggregated kicking and punting numbers for one player
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct KickingStats {
    field_goals_attempted: u32,
    field_goals_made: u32,
    extra_points_attempted: u32,
    extra_points_made: u32,
    punts: u32,
}

impl KickingStats {
    /// Get the field goals attempted
    pub fn field_goals_attempted(&self) -> u32 {
        self.field_goals_attempted
    }

    /// Get the field goals made
    pub fn field_goals_made(&self) -> u32 {
        self.field_goals_made
    }

    /// Get the extra points attempted
    pub fn extra_points_attempted(&self) -> u32 {
        self.extra_points_attempted
    }

    /// Get the extra points made
    pub fn extra_points_made(&self) -> u32 {
        self.extra_points_made
    }

    /// Get the punts
    pub fn punts(&self) -> u32 {
        self.punts
    }
}

/// # `PlayerStatLine` struct
///
/// Everything one player did in the game
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub passing: PassingStats,
    pub rushing: RushingStats,
    pub receiving: ReceivingStats,
    pub defense: DefensiveStats,
    pub kicking: KickingStats,
}

impl PlayerStatLine {
    /// Total yardage the player was directly involved in, used to order
    /// box-score listings
    pub fn yardage_impact(&self) -> i32 {
        self.passing.yards + self.rushing.yards + self.receiving.yards
    }
}

/// # `TeamStats` struct
///
/// One side's team-level aggregates
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    total_yards: i32,
    passing_yards: i32,
    rushing_yards: i32,
    first_downs: u32,
    third_down_attempts: u32,
    third_down_conversions: u32,
    fourth_down_attempts: u32,
    fourth_down_conversions: u32,
    turnovers: u32,
    penalties: u32,
    penalty_yards: u32,
    time_of_possession: u32,
    red_zone_attempts: u32,
    red_zone_touchdowns: u32,
    sacks: u32,
    punts: u32,
    field_goals_attempted: u32,
    field_goals_made: u32,
}

impl TeamStats {
    /// Get the total scrimmage yards
    pub fn total_yards(&self) -> i32 {
        self.total_yards
    }

    /// Get the net passing yards
    pub fn passing_yards(&self) -> i32 {
        self.passing_yards
    }

    /// Get the net rushing yards
    pub fn rushing_yards(&self) -> i32 {
        self.rushing_yards
    }

    /// Get the first downs gained
    pub fn first_downs(&self) -> u32 {
        self.first_downs
    }

    /// Get third-down attempts and conversions
    pub fn third_downs(&self) -> (u32, u32) {
        (self.third_down_attempts, self.third_down_conversions)
    }

    /// Get fourth-down attempts and conversions
    pub fn fourth_downs(&self) -> (u32, u32) {
        (self.fourth_down_attempts, self.fourth_down_conversions)
    }

    /// Get the turnovers committed
    pub fn turnovers(&self) -> u32 {
        self.turnovers
    }

    /// Get accepted penalties and their yardage
    pub fn penalties(&self) -> (u32, u32) {
        (self.penalties, self.penalty_yards)
    }

    /// Get the time of possession in seconds
    pub fn time_of_possession(&self) -> u32 {
        self.time_of_possession
    }

    /// Get red-zone trips and touchdowns
    pub fn red_zone(&self) -> (u32, u32) {
        (self.red_zone_attempts, self.red_zone_touchdowns)
    }

    /// Get the sacks recorded by this side's defense
    pub fn sacks(&self) -> u32 {
        self.sacks
    }

    /// Get the punts
    pub fn punts(&self) -> u32 {
        self.punts
    }

    /// Get field goals attempted and made
    pub fn field_goals(&self) -> (u32, u32) {
        (self.field_goals_attempted, self.field_goals_made)
    }
}

/// # `ScoringLogEntry` struct
///
/// One line of the scoring summary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringLogEntry {
    pub quarter: Quarter,
    pub clock: u32,
    pub scoring: ScoringResult,
    pub description: String,
}

/// # `MvpResult` struct
///
/// The game's most valuable player and the score that earned it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MvpResult {
    pub player: PlayerRef,
    pub score: f64,
}

/// # `GameStats` struct
///
/// The mutable per-game aggregate: both team blocks, lazily populated
/// player maps keyed by roster index, the drive log, and the scoring
/// summary. Owned by the engine and updated in place after every play.
#[derive(Clone, Debug, Default)]
pub struct GameStats {
    home: TeamStats,
    away: TeamStats,
    home_players: BTreeMap<usize, PlayerStatLine>,
    away_players: BTreeMap<usize, PlayerStatLine>,
    drives: Vec<Drive>,
    current_drive: Option<Drive>,
    red_zone_credited: bool,
    scoring_log: Vec<ScoringLogEntry>,
}

impl GameStats {
    /// Initialize an empty accumulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::stats::GameStats;
    ///
    /// let my_stats = GameStats::new();
    /// assert!(my_stats.drives().is_empty());
    /// ```
    pub fn new() -> GameStats {
        GameStats::default()
    }

    /// Get a side's team block
    pub fn team(&self, side: TeamSide) -> &TeamStats {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut TeamStats {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// Get a side's player stat map, keyed by roster index
    pub fn players(&self, side: TeamSide) -> &BTreeMap<usize, PlayerStatLine> {
        match side {
            TeamSide::Home => &self.home_players,
            TeamSide::Away => &self.away_players,
        }
    }

    fn line_mut(&mut self, player: PlayerRef) -> &mut PlayerStatLine {
        let map = match player.side {
            TeamSide::Home => &mut self.home_players,
            TeamSide::Away => &mut self.away_players,
        };
        map.entry(player.index).or_default()
    }

    /// Get the completed drives
    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }

    /// Get the open drive, if a possession is live
    pub fn current_drive(&self) -> Option<&Drive> {
        self.current_drive.as_ref()
    }

    /// Get the scoring summary
    pub fn scoring_log(&self) -> &[ScoringLogEntry] {
        &self.scoring_log
    }

    /// Open a new drive, closing any still-open one as in-progress
    pub fn start_drive(&mut self, team: TeamSide, state: &GameState) {
        if let Some(mut open) = self.current_drive.take() {
            open.finish(DriveResult::InProgress);
            self.drives.push(open);
        }
        let number = self.drives.len() as u32 + 1;
        self.current_drive = Some(Drive::start(
            number,
            team,
            state.ball_position(),
            state.quarter(),
            state.clock(),
        ));
        self.red_zone_credited = false;
    }

    /// Close the open drive with its result
    pub fn end_drive(&mut self, result: DriveResult) {
        if let Some(mut drive) = self.current_drive.take() {
            drive.finish(result);
            self.drives.push(drive);
        }
    }

    /// Credit one resolved play to the aggregates
    ///
    /// `before` is the pre-play state; it supplies possession, down, and
    /// field position context.
    pub fn update(&mut self, play: &PlayResult, before: &GameState) {
        let offense = before.possession();
        let defense = offense.opponent();

        // Possession clock is credited to the offense
        self.team_mut(offense).time_of_possession += play.clock_elapsed();

        let from_scrimmage = matches!(
            play.play_type(),
            PlayType::Run
                | PlayType::Scramble
                | PlayType::PassComplete
                | PlayType::PassIncomplete
                | PlayType::Sack
                | PlayType::Kneel
                | PlayType::Spike
        );

        // An accepted or offsetting flag wipes the play and replays the down
        let replayed = play
            .penalty()
            .map(|p| p.is_enforced() || p.offsetting)
            .unwrap_or(false);

        if from_scrimmage {
            if let Some(drive) = self.current_drive.as_mut() {
                drive.record_play(play.yards_gained(), play.clock_elapsed());
            }

            // Money downs
            if before.down() == 3 && !replayed {
                self.team_mut(offense).third_down_attempts += 1;
                if play.is_first_down() || play.is_touchdown() {
                    self.team_mut(offense).third_down_conversions += 1;
                }
            }
            if before.down() == 4 && !replayed {
                self.team_mut(offense).fourth_down_attempts += 1;
                if play.is_first_down() || play.is_touchdown() {
                    self.team_mut(offense).fourth_down_conversions += 1;
                }
            }

            if play.is_first_down() {
                self.team_mut(offense).first_downs += 1;
            }

            // One red-zone trip per drive, counted on entry
            if before.in_red_zone() && !self.red_zone_credited {
                self.team_mut(offense).red_zone_attempts += 1;
                self.red_zone_credited = true;
            }
            if before.in_red_zone() && play.is_touchdown() {
                self.team_mut(offense).red_zone_touchdowns += 1;
            }
        }

        // Accepted flags
        if let Some(penalty) = play.penalty() {
            if penalty.is_enforced() {
                let charged = self.team_mut(penalty.side);
                charged.penalties += 1;
                charged.penalty_yards += penalty.yards;
            }
        }

        // Turnovers: a muffed punt is charged to the receiving side
        if let Some(turnover) = play.turnover() {
            match turnover.kind {
                TurnoverKind::MuffedPunt => self.team_mut(defense).turnovers += 1,
                TurnoverKind::FumbleRecovery => {}
                _ => self.team_mut(offense).turnovers += 1,
            }
        }

        match play.play_type() {
            PlayType::Run | PlayType::Scramble | PlayType::Kneel => {
                self.team_mut(offense).rushing_yards += play.yards_gained();
                self.team_mut(offense).total_yards += play.yards_gained();
                if let Some(rusher) = play.rusher() {
                    let line = &mut self.line_mut(rusher).rushing;
                    line.carries += 1;
                    line.yards += play.yards_gained();
                    if play.is_touchdown() {
                        line.touchdowns += 1;
                    }
                    if matches!(
                        play.turnover().map(|t| t.kind),
                        Some(TurnoverKind::Fumble) | Some(TurnoverKind::FumbleRecovery)
                    ) {
                        line.fumbles += 1;
                    }
                }
                if let Some(defender) = play.defender() {
                    self.line_mut(defender).defense.tackles += 1;
                }
            }
            PlayType::PassComplete => {
                self.team_mut(offense).passing_yards += play.yards_gained();
                self.team_mut(offense).total_yards += play.yards_gained();
                if let Some(passer) = play.passer() {
                    let line = &mut self.line_mut(passer).passing;
                    line.attempts += 1;
                    line.completions += 1;
                    line.yards += play.yards_gained();
                    if play.is_touchdown() {
                        line.touchdowns += 1;
                    }
                }
                if let Some(receiver) = play.receiver() {
                    let line = &mut self.line_mut(receiver).receiving;
                    line.targets += 1;
                    line.receptions += 1;
                    line.yards += play.yards_gained();
                    if play.is_touchdown() {
                        line.touchdowns += 1;
                    }
                }
                if let Some(defender) = play.defender() {
                    self.line_mut(defender).defense.tackles += 1;
                }
            }
            PlayType::PassIncomplete => {
                if let Some(passer) = play.passer() {
                    let line = &mut self.line_mut(passer).passing;
                    line.attempts += 1;
                    if matches!(
                        play.turnover().map(|t| t.kind),
                        Some(TurnoverKind::Interception)
                    ) {
                        line.interceptions += 1;
                    }
                }
                if let Some(receiver) = play.receiver() {
                    self.line_mut(receiver).receiving.targets += 1;
                }
                if matches!(
                    play.turnover().map(|t| t.kind),
                    Some(TurnoverKind::Interception)
                ) {
                    if let Some(defender) = play.defender() {
                        self.line_mut(defender).defense.interceptions += 1;
                    }
                }
            }
            PlayType::Sack => {
                self.team_mut(offense).passing_yards += play.yards_gained();
                self.team_mut(offense).total_yards += play.yards_gained();
                self.team_mut(defense).sacks += 1;
                if let Some(defender) = play.defender() {
                    let line = &mut self.line_mut(defender).defense;
                    line.sacks += 1;
                    line.tackles += 1;
                    if play.turnover().is_some() {
                        line.forced_fumbles += 1;
                    }
                }
            }
            PlayType::Punt => {
                self.team_mut(offense).punts += 1;
                if let Some(punter) = play.kicker() {
                    self.line_mut(punter).kicking.punts += 1;
                }
            }
            PlayType::FieldGoalGood | PlayType::FieldGoalMissed => {
                let made = play.play_type() == PlayType::FieldGoalGood;
                let team = self.team_mut(offense);
                team.field_goals_attempted += 1;
                if made {
                    team.field_goals_made += 1;
                }
                if let Some(kicker) = play.kicker() {
                    let line = &mut self.line_mut(kicker).kicking;
                    line.field_goals_attempted += 1;
                    if made {
                        line.field_goals_made += 1;
                    }
                }
            }
            PlayType::ExtraPointGood | PlayType::ExtraPointMissed => {
                if let Some(kicker) = play.kicker() {
                    let line = &mut self.line_mut(kicker).kicking;
                    line.extra_points_attempted += 1;
                    if play.play_type() == PlayType::ExtraPointGood {
                        line.extra_points_made += 1;
                    }
                }
            }
            _ => {}
        }

        // Scoring summary
        if let Some(scoring) = play.scoring() {
            self.scoring_log.push(ScoringLogEntry {
                quarter: before.quarter(),
                clock: before.clock(),
                scoring: *scoring,
                description: String::from(play.description()),
            });
        }
    }

    /// Compute the most valuable player across both rosters
    ///
    /// Position-weighted game scores with a small winner's-side epsilon to
    /// break ties.
    pub fn determine_mvp(
        &self,
        home_roster: &[Player],
        away_roster: &[Player],
        winner: Option<TeamSide>,
    ) -> Option<MvpResult> {
        let mut best: Option<MvpResult> = None;
        for (side, roster, map) in [
            (TeamSide::Home, home_roster, &self.home_players),
            (TeamSide::Away, away_roster, &self.away_players),
        ] {
            for (&index, line) in map.iter() {
                let position = match roster.get(index) {
                    Some(player) => player.position(),
                    None => continue,
                };
                let mut score = match position {
                    Position::QB => {
                        4.0 * line.passing.touchdowns as f64
                            + line.passing.yards as f64 / 25.0
                            - 3.0 * line.passing.interceptions as f64
                            + line.rushing.yards as f64 / 10.0
                            + 6.0 * line.rushing.touchdowns as f64
                    }
                    Position::RB => {
                        6.0 * line.rushing.touchdowns as f64
                            + line.rushing.yards as f64 / 10.0
                            + line.receiving.yards as f64 / 10.0
                            + 6.0 * line.receiving.touchdowns as f64
                    }
                    Position::WR | Position::TE => {
                        6.0 * line.receiving.touchdowns as f64
                            + line.receiving.yards as f64 / 10.0
                            + 0.5 * line.receiving.receptions as f64
                    }
                    Position::DL | Position::LB | Position::CB | Position::S => {
                        3.0 * line.defense.sacks as f64
                            + 0.5 * line.defense.tackles as f64
                            + 3.0 * line.defense.forced_fumbles as f64
                            + 5.0 * line.defense.interceptions as f64
                    }
                    Position::K => 3.0 * line.kicking.field_goals_made as f64,
                    _ => 0.0,
                };
                if Some(side) == winner {
                    score += 0.001;
                }
                let candidate = MvpResult {
                    player: PlayerRef { side, index },
                    score,
                };
                if best.map(|b| score > b.score).unwrap_or(true) {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play::call::PlayCall;
    use crate::game::play::result::PlayResultBuilder;
    use crate::game::turnover::TurnoverResult;

    fn home_ref(index: usize) -> PlayerRef {
        PlayerRef {
            side: TeamSide::Home,
            index,
        }
    }

    #[test]
    fn test_passing_credits_both_ends() {
        let mut stats = GameStats::new();
        let state = GameState::new();
        let play = PlayResultBuilder::new(PlayType::PassComplete, PlayCall::PassMedium)
            .yards_gained(22)
            .passer(home_ref(0))
            .receiver(home_ref(3))
            .first_down(true)
            .clock_elapsed(30)
            .build();
        stats.update(&play, &state);
        let qb = stats.players(TeamSide::Home).get(&0).unwrap();
        assert_eq!(qb.passing.completions(), 1);
        assert_eq!(qb.passing.yards(), 22);
        let wr = stats.players(TeamSide::Home).get(&3).unwrap();
        assert_eq!(wr.receiving.receptions(), 1);
        assert_eq!(wr.receiving.yards(), 22);
        assert_eq!(stats.team(TeamSide::Home).passing_yards(), 22);
        assert_eq!(stats.team(TeamSide::Home).first_downs(), 1);
        assert_eq!(stats.team(TeamSide::Home).time_of_possession(), 30);
    }

    #[test]
    fn test_third_down_bookkeeping() {
        let mut stats = GameStats::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.down = 3;
        state.yards_to_go = 6;
        let converted = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
            .yards_gained(8)
            .rusher(home_ref(1))
            .first_down(true)
            .build();
        stats.update(&converted, &state);
        let failed = PlayResultBuilder::new(PlayType::PassIncomplete, PlayCall::PassShort)
            .passer(home_ref(0))
            .build();
        stats.update(&failed, &state);
        assert_eq!(stats.team(TeamSide::Home).third_downs(), (2, 1));
    }

    #[test]
    fn test_interception_charged_to_offense() {
        let mut stats = GameStats::new();
        let mut state = GameState::new();
        state.kickoff = false;
        let pick = PlayResultBuilder::new(PlayType::PassIncomplete, PlayCall::PassDeep)
            .passer(home_ref(0))
            .defender(PlayerRef {
                side: TeamSide::Away,
                index: 9,
            })
            .turnover(TurnoverResult::new(
                TurnoverKind::Interception,
                TeamSide::Away,
                14,
                false,
            ))
            .build();
        stats.update(&pick, &state);
        assert_eq!(stats.team(TeamSide::Home).turnovers(), 1);
        assert_eq!(stats.team(TeamSide::Away).turnovers(), 0);
        let qb = stats.players(TeamSide::Home).get(&0).unwrap();
        assert_eq!(qb.passing.interceptions(), 1);
        let db = stats.players(TeamSide::Away).get(&9).unwrap();
        assert_eq!(db.defense.interceptions(), 1);
    }

    #[test]
    fn test_muffed_punt_charged_to_receiving_team() {
        let mut stats = GameStats::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.down = 4;
        let muff = PlayResultBuilder::new(PlayType::Punt, PlayCall::Punt)
            .kicker(home_ref(10))
            .turnover(TurnoverResult::new(
                TurnoverKind::MuffedPunt,
                TeamSide::Home,
                0,
                false,
            ))
            .build();
        stats.update(&muff, &state);
        assert_eq!(stats.team(TeamSide::Away).turnovers(), 1);
        assert_eq!(stats.team(TeamSide::Home).turnovers(), 0);
        assert_eq!(stats.team(TeamSide::Home).punts(), 1);
    }

    #[test]
    fn test_red_zone_counted_once_per_drive() {
        let mut stats = GameStats::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 85;
        stats.start_drive(TeamSide::Home, &state);
        let run = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
            .yards_gained(3)
            .rusher(home_ref(1))
            .build();
        stats.update(&run, &state);
        stats.update(&run, &state);
        assert_eq!(stats.team(TeamSide::Home).red_zone(), (1, 0));
        stats.end_drive(DriveResult::FieldGoal);
        stats.start_drive(TeamSide::Home, &state);
        stats.update(&run, &state);
        assert_eq!(stats.team(TeamSide::Home).red_zone(), (2, 0));
    }

    #[test]
    fn test_mvp_prefers_the_bigger_day() {
        let mut stats = GameStats::new();
        let state = GameState::new();
        // A 3-TD passing day
        for _ in 0..3 {
            let td = PlayResultBuilder::new(PlayType::PassComplete, PlayCall::PassMedium)
                .yards_gained(25)
                .passer(home_ref(0))
                .receiver(home_ref(2))
                .touchdown(true)
                .build();
            stats.update(&td, &state);
        }
        let home_roster = vec![
            Player::from_properties(1, "Star QB", Position::QB, 12, 92, 70, 65, 88, 85, false)
                .unwrap(),
            Player::from_properties(2, "Backup RB", Position::RB, 28, 75, 80, 75, 70, 70, false)
                .unwrap(),
            Player::from_properties(3, "Deep Threat", Position::WR, 88, 87, 94, 64, 76, 80, false)
                .unwrap(),
        ];
        let away_roster = vec![Player::from_properties(
            4, "Quiet QB", Position::QB, 9, 80, 70, 65, 75, 70, false,
        )
        .unwrap()];
        let mvp = stats
            .determine_mvp(&home_roster, &away_roster, Some(TeamSide::Home))
            .unwrap();
        // Three receiving scores and 75 yards outweigh the passing line
        // (18 + 7.5 + 1.5 vs 12 + 3)
        assert_eq!(mvp.player, home_ref(2));
        assert!(mvp.score > 25.0);
    }
}
