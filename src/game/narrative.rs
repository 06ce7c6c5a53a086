#![doc = include_str!("../../docs/game/narrative.md")]
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::play::result::{PlayResult, PlayType};
use crate::game::state::{GameState, Quarter};
use crate::game::turnover::TurnoverKind;
use crate::player::{Player, PlayerRef, TeamSide};

// Momentum event deltas, applied toward the benefiting side, then a
// fixed decay toward zero
const MOMENTUM_TOUCHDOWN: f64 = 25.0_f64;
const MOMENTUM_FIELD_GOAL: f64 = 10.0_f64;
const MOMENTUM_TURNOVER: f64 = 35.0_f64;
const MOMENTUM_SACK: f64 = 10.0_f64;
const MOMENTUM_BIG_PLAY: f64 = 15.0_f64;
const MOMENTUM_PUNT_FORCED: f64 = 12.0_f64;
const MOMENTUM_DECAY: f64 = 2.0_f64;

// A gain this long counts as a big play for momentum and streaks
const BIG_PLAY_YARDS: i32 = 20;

// Thread bookkeeping limits
const MAX_THREADS: usize = 5;
const VISIBLE_INTENSITY: u32 = 10;

// Streak triggers
const HOT_STREAK_COMPLETIONS: u32 = 4;
const COLD_STREAK_INCOMPLETIONS: u32 = 3;

// Single-game yardage chases worth a storyline
const CHASE_PASSING_YARDS: i32 = 300;
const CHASE_RUSHING_YARDS: i32 = 120;
const CHASE_RECEIVING_YARDS: i32 = 120;

// An overall this low scoring a touchdown is a story in itself
const SPOTLIGHT_OVERALL: u32 = 72;

/// # `ThreadKind` enum
///
/// The storyline families the tracker maintains
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    HotStreak,
    ColdStreak,
    DefensiveDominance,
    Comeback,
    Shootout,
    DefensiveBattle,
    RivalryMoment,
    RecordChase,
    RookieSpotlight,
}

/// # `NarrativeThread` struct
///
/// One active storyline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NarrativeThread {
    pub kind: ThreadKind,
    pub description: String,
    pub players: Vec<PlayerRef>,
    pub intensity: u32,
    pub started_at: u64,
}

/// # `DramaFlags` struct
///
/// The per-play drama annotations
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DramaFlags {
    pub clutch: bool,
    pub comeback_brewing: bool,
    pub blowout: bool,
    pub goal_line_stand: bool,
    pub two_minute_drill: bool,
    pub overtime_thriller: bool,
    pub red_zone: bool,
    pub game_winning_drive: bool,
}

/// # `CrowdReaction` enum
///
/// What the home crowd does after a play
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdReaction {
    Roar,
    Cheer,
    Groan,
    Gasp,
    Silence,
    Murmur,
    Boo,
    Chant,
}

/// # `NarrativeSnapshot` struct
///
/// The per-event narrative payload archived alongside the play
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSnapshot {
    pub momentum: f64,
    pub drama_level: u32,
    pub flags: DramaFlags,
    pub excitement: u32,
    pub crowd: CrowdReaction,
    pub threads: Vec<NarrativeThread>,
}

#[derive(Clone, Copy, Debug, Default)]
struct StreakState {
    completions: u32,
    incompletions: u32,
    passing_yards: i32,
    rushing_yards: i32,
    receiving_yards: i32,
}

/// # `NarrativeTracker` struct
///
/// Owned by the engine; folds every play into the momentum scalar, the
/// drama model, and the storyline set, and emits a snapshot per event.
#[derive(Clone, Debug)]
pub struct NarrativeTracker {
    momentum: f64,
    rivalry: bool,
    max_deficit_home: i32,
    max_deficit_away: i32,
    last_leader: Option<TeamSide>,
    lead_changes: u32,
    largest_lead: i32,
    punts_forced_on_home: u32,
    punts_forced_on_away: u32,
    streaks: BTreeMap<(TeamSide, usize), StreakState>,
    threads: Vec<NarrativeThread>,
}

impl NarrativeTracker {
    /// Initialize a tracker; `rivalry` marks a divisional matchup
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::narrative::NarrativeTracker;
    ///
    /// let my_tracker = NarrativeTracker::new(false);
    /// assert!(my_tracker.momentum() == 0.0);
    /// ```
    pub fn new(rivalry: bool) -> NarrativeTracker {
        NarrativeTracker {
            momentum: 0.0,
            rivalry,
            max_deficit_home: 0,
            max_deficit_away: 0,
            last_leader: None,
            lead_changes: 0,
            largest_lead: 0,
            punts_forced_on_home: 0,
            punts_forced_on_away: 0,
            streaks: BTreeMap::new(),
            threads: Vec::new(),
        }
    }

    /// Get the momentum scalar, positive favoring the home side
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Get the momentum normalized to [-1, 1] from one side's point of
    /// view
    pub fn normalized_for(&self, side: TeamSide) -> f64 {
        let normalized = self.momentum / 100.0;
        match side {
            TeamSide::Home => normalized,
            TeamSide::Away => -normalized,
        }
    }

    /// Get the lead changes counted so far
    pub fn lead_changes(&self) -> u32 {
        self.lead_changes
    }

    /// Get the largest absolute lead seen
    pub fn largest_lead(&self) -> i32 {
        self.largest_lead
    }

    /// Get every active thread, including sub-visible ones
    pub fn threads(&self) -> &[NarrativeThread] {
        &self.threads
    }

    /// Get the threads loud enough to publish
    pub fn visible_threads(&self) -> Vec<NarrativeThread> {
        self.threads
            .iter()
            .filter(|t| t.intensity >= VISIBLE_INTENSITY)
            .cloned()
            .collect()
    }

    /// Which side a play's headline event favored, if any
    fn benefiting_side(play: &PlayResult, before: &GameState) -> Option<TeamSide> {
        if let Some(scoring) = play.scoring() {
            return Some(scoring.team);
        }
        if let Some(turnover) = play.turnover() {
            if turnover.kind != TurnoverKind::FumbleRecovery {
                return Some(turnover.recovered_by);
            }
        }
        match play.play_type() {
            PlayType::Sack | PlayType::Punt => Some(before.possession().opponent()),
            _ if play.yards_gained() >= BIG_PLAY_YARDS => Some(before.possession()),
            _ => None,
        }
    }

    fn apply_momentum(&mut self, play: &PlayResult, before: &GameState) {
        let mut shift = 0.0;
        let offense = before.possession();
        if let Some(scoring) = play.scoring() {
            let delta = match scoring.kind.points() {
                3 => MOMENTUM_FIELD_GOAL,
                _ => MOMENTUM_TOUCHDOWN,
            };
            shift += if scoring.team == TeamSide::Home {
                delta
            } else {
                -delta
            };
        }
        if let Some(turnover) = play.turnover() {
            if turnover.kind != TurnoverKind::FumbleRecovery {
                shift += if turnover.recovered_by == TeamSide::Home {
                    MOMENTUM_TURNOVER
                } else {
                    -MOMENTUM_TURNOVER
                };
            }
        }
        if play.play_type() == PlayType::Sack {
            shift += if offense == TeamSide::Home {
                -MOMENTUM_SACK
            } else {
                MOMENTUM_SACK
            };
        }
        if play.yards_gained() >= BIG_PLAY_YARDS
            && matches!(
                play.play_type(),
                PlayType::Run | PlayType::Scramble | PlayType::PassComplete
            )
        {
            shift += if offense == TeamSide::Home {
                MOMENTUM_BIG_PLAY
            } else {
                -MOMENTUM_BIG_PLAY
            };
        }
        if play.play_type() == PlayType::Punt {
            shift += if offense == TeamSide::Home {
                -MOMENTUM_PUNT_FORCED
            } else {
                MOMENTUM_PUNT_FORCED
            };
        }
        self.momentum += shift;
        // Drift back toward level
        if self.momentum > 0.0 {
            self.momentum = (self.momentum - MOMENTUM_DECAY).max(0.0);
        } else if self.momentum < 0.0 {
            self.momentum = (self.momentum + MOMENTUM_DECAY).min(0.0);
        }
        self.momentum = self.momentum.clamp(-100.0, 100.0);
    }

    fn track_scoreboard(&mut self, after: &GameState) {
        let diff = after.home_score() as i32 - after.away_score() as i32;
        self.max_deficit_home = self.max_deficit_home.max(-diff);
        self.max_deficit_away = self.max_deficit_away.max(diff);
        self.largest_lead = self.largest_lead.max(diff.abs());
        let leader = match diff.signum() {
            1 => Some(TeamSide::Home),
            -1 => Some(TeamSide::Away),
            _ => None,
        };
        if let Some(side) = leader {
            if self.last_leader.is_some() && self.last_leader != Some(side) {
                self.lead_changes += 1;
            }
            self.last_leader = Some(side);
        }
    }

    fn upsert_thread(
        &mut self,
        kind: ThreadKind,
        description: String,
        players: Vec<PlayerRef>,
        intensity: u32,
        event_number: u64,
        boost_allowed: bool,
    ) {
        if let Some(existing) = self.threads.iter_mut().find(|t| {
            t.kind == kind && (players.is_empty() || t.players == players)
        }) {
            if boost_allowed {
                existing.intensity = intensity.max(existing.intensity).min(100);
                existing.description = description;
            }
            return;
        }
        self.threads.push(NarrativeThread {
            kind,
            description,
            players,
            intensity: intensity.min(100),
            started_at: event_number,
        });
        // Evict the quietest storyline when over the cap
        while self.threads.len() > MAX_THREADS {
            if let Some(lowest) = self
                .threads
                .iter()
                .enumerate()
                .min_by_key(|(_, t)| t.intensity)
                .map(|(i, _)| i)
            {
                self.threads.remove(lowest);
            }
        }
    }

    fn drop_threads(&mut self, kind: ThreadKind, players: Option<&[PlayerRef]>) {
        self.threads.retain(|t| {
            t.kind != kind || players.map(|p| t.players != p).unwrap_or(false)
        });
    }

    fn update_streaks(
        &mut self,
        play: &PlayResult,
        event_number: u64,
        home_roster: &[Player],
        away_roster: &[Player],
    ) {
        let roster_name = |r: PlayerRef| -> String {
            let roster = match r.side {
                TeamSide::Home => home_roster,
                TeamSide::Away => away_roster,
            };
            roster
                .get(r.index)
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| String::from("the backup"))
        };

        match play.play_type() {
            PlayType::PassComplete => {
                if let Some(passer) = play.passer() {
                    let key = (passer.side, passer.index);
                    let entry = self.streaks.entry(key).or_default();
                    entry.completions += 1;
                    entry.incompletions = 0;
                    entry.passing_yards += play.yards_gained();
                    let completions = entry.completions;
                    let passing_yards = entry.passing_yards;
                    if completions >= HOT_STREAK_COMPLETIONS {
                        self.drop_threads(ThreadKind::ColdStreak, Some(&[passer]));
                        self.upsert_thread(
                            ThreadKind::HotStreak,
                            format!(
                                "{} has hit {} straight throws",
                                roster_name(passer),
                                completions
                            ),
                            vec![passer],
                            (60 + (completions - HOT_STREAK_COMPLETIONS) * 5).min(100),
                            event_number,
                            true,
                        );
                    }
                    if passing_yards >= CHASE_PASSING_YARDS {
                        self.upsert_thread(
                            ThreadKind::RecordChase,
                            format!(
                                "{} is up to {} passing yards",
                                roster_name(passer),
                                passing_yards
                            ),
                            vec![passer],
                            70,
                            event_number,
                            true,
                        );
                    }
                }
                if let Some(receiver) = play.receiver() {
                    let entry = self
                        .streaks
                        .entry((receiver.side, receiver.index))
                        .or_default();
                    entry.receiving_yards += play.yards_gained();
                    let receiving_yards = entry.receiving_yards;
                    if receiving_yards >= CHASE_RECEIVING_YARDS {
                        self.upsert_thread(
                            ThreadKind::RecordChase,
                            format!(
                                "{} is over {} receiving yards",
                                roster_name(receiver),
                                CHASE_RECEIVING_YARDS
                            ),
                            vec![receiver],
                            65,
                            event_number,
                            true,
                        );
                    }
                }
            }
            PlayType::PassIncomplete => {
                if let Some(passer) = play.passer() {
                    let entry = self.streaks.entry((passer.side, passer.index)).or_default();
                    entry.incompletions += 1;
                    entry.completions = 0;
                    let incompletions = entry.incompletions;
                    if incompletions >= COLD_STREAK_INCOMPLETIONS {
                        self.drop_threads(ThreadKind::HotStreak, Some(&[passer]));
                        self.upsert_thread(
                            ThreadKind::ColdStreak,
                            format!(
                                "{} has missed {} in a row",
                                roster_name(passer),
                                incompletions
                            ),
                            vec![passer],
                            50,
                            event_number,
                            true,
                        );
                    } else {
                        self.drop_threads(ThreadKind::HotStreak, Some(&[passer]));
                    }
                }
            }
            PlayType::Run | PlayType::Scramble => {
                if let Some(rusher) = play.rusher() {
                    let entry = self.streaks.entry((rusher.side, rusher.index)).or_default();
                    entry.rushing_yards += play.yards_gained();
                    let rushing_yards = entry.rushing_yards;
                    if rushing_yards >= CHASE_RUSHING_YARDS {
                        self.upsert_thread(
                            ThreadKind::RecordChase,
                            format!(
                                "{} has piled up {} on the ground",
                                roster_name(rusher),
                                rushing_yards
                            ),
                            vec![rusher],
                            65,
                            event_number,
                            true,
                        );
                    }
                }
            }
            _ => {}
        }

        // An unheralded scorer earns the spotlight
        if let Some(scoring) = play.scoring() {
            if let Some(scorer) = scoring.scorer {
                let roster = match scorer.side {
                    TeamSide::Home => home_roster,
                    TeamSide::Away => away_roster,
                };
                if let Some(player) = roster.get(scorer.index) {
                    if player.overall() <= SPOTLIGHT_OVERALL {
                        self.upsert_thread(
                            ThreadKind::RookieSpotlight,
                            format!("{} finds the end zone", player.name()),
                            vec![scorer],
                            55,
                            event_number,
                            true,
                        );
                    }
                }
            }
        }
    }

    fn update_game_threads(
        &mut self,
        play: &PlayResult,
        before: &GameState,
        after: &GameState,
        event_number: u64,
    ) {
        let total = after.home_score() + after.away_score();
        let diff = after.home_score() as i32 - after.away_score() as i32;

        // Shootout persists past the third quarter without boosting
        let shootout_boost = after.quarter() <= Quarter::Third;
        if total >= 48 {
            self.upsert_thread(
                ThreadKind::Shootout,
                format!("{} combined points and counting", total),
                Vec::new(),
                (40 + total).min(100),
                event_number,
                shootout_boost,
            );
        }

        if after.quarter() >= Quarter::Fourth && total <= 13 {
            self.upsert_thread(
                ThreadKind::DefensiveBattle,
                String::from("both defenses own this one"),
                Vec::new(),
                60,
                event_number,
                true,
            );
        } else if total > 20 {
            self.drop_threads(ThreadKind::DefensiveBattle, None);
        }

        // A punt forced is the dominance proxy
        if play.play_type() == PlayType::Punt {
            match before.possession() {
                TeamSide::Home => self.punts_forced_on_home += 1,
                TeamSide::Away => self.punts_forced_on_away += 1,
            }
            let (forced, defense) = match before.possession() {
                TeamSide::Home => (self.punts_forced_on_home, TeamSide::Away),
                TeamSide::Away => (self.punts_forced_on_away, TeamSide::Home),
            };
            if forced >= 3 {
                let label = match defense {
                    TeamSide::Home => "the home defense",
                    TeamSide::Away => "the road defense",
                };
                self.upsert_thread(
                    ThreadKind::DefensiveDominance,
                    format!("{} has forced {} punts", label, forced),
                    Vec::new(),
                    (40 + forced * 8).min(100),
                    event_number,
                    true,
                );
            }
        }

        // Comeback: trailed big earlier, within one score now
        let comeback_live = (self.max_deficit_home >= 14 && (-7..0).contains(&diff))
            || (self.max_deficit_away >= 14 && (0..8).contains(&diff));
        if comeback_live {
            self.upsert_thread(
                ThreadKind::Comeback,
                String::from("a fourteen-point hole is nearly erased"),
                Vec::new(),
                (70 + (14 - diff.abs()) as u32).min(100),
                event_number,
                true,
            );
        } else if diff.abs() >= 14 {
            self.drop_threads(ThreadKind::Comeback, None);
        }

        if self.rivalry
            && play.scoring().is_some()
            && after.quarter() >= Quarter::Fourth
            && diff.abs() <= 8
        {
            self.upsert_thread(
                ThreadKind::RivalryMoment,
                String::from("division bragging rights coming down to the wire"),
                Vec::new(),
                75,
                event_number,
                true,
            );
        }
    }

    /// Compute the drama flags for a play
    fn drama_flags(&self, play: &PlayResult, before: &GameState, after: &GameState) -> DramaFlags {
        let diff = after.home_score() as i32 - after.away_score() as i32;
        let margin_before = before.possession_margin();
        let late = matches!(after.quarter(), Quarter::Fourth | Quarter::Overtime);
        DramaFlags {
            clutch: late && diff.abs() <= 8 && after.clock() < 300,
            comeback_brewing: (self.max_deficit_home >= 14 && (-7..0).contains(&diff))
                || (self.max_deficit_away >= 14 && (0..8).contains(&diff)),
            blowout: diff.abs() >= 21,
            goal_line_stand: before.ball_position() >= 95 && before.down() >= 3,
            two_minute_drill: before.quarter().is_half_end() && before.clock() <= 120,
            // Heuristic: any score while the game is not tied reads as an
            // overtime dagger
            overtime_thriller: after.quarter() == Quarter::Overtime
                && play.scoring().is_some()
                && after.home_score() != after.away_score(),
            red_zone: before.in_red_zone(),
            game_winning_drive: before.quarter() == Quarter::Fourth
                && before.clock() < 300
                && (-3..=0).contains(&margin_before)
                && before.ball_position() > 50,
        }
    }

    /// The composite drama level for a play
    fn drama_level(&self, flags: &DramaFlags, after: &GameState) -> u32 {
        let diff = (after.home_score() as i32 - after.away_score() as i32).abs();
        if flags.blowout {
            return 12;
        }
        let closeness = (40 - diff * 2).max(0) as f64;
        let quarter_factor = match after.quarter() {
            Quarter::First => 0.6,
            Quarter::Second => 0.8,
            Quarter::Third => 0.9,
            Quarter::Fourth => 1.2,
            Quarter::Overtime => 1.4,
        };
        let mut level = closeness * quarter_factor;
        for (set, bonus) in [
            (flags.clutch, 18.0),
            (flags.comeback_brewing, 15.0),
            (flags.goal_line_stand, 12.0),
            (flags.two_minute_drill, 10.0),
            (flags.overtime_thriller, 25.0),
            (flags.red_zone, 6.0),
            (flags.game_winning_drive, 20.0),
        ] {
            if set {
                level += bonus;
            }
        }
        if self.momentum.abs() >= 60.0 {
            level += 10.0;
        }
        (level.round() as i64).clamp(0, 100) as u32
    }

    /// The excitement score for a play
    fn excitement(&self, play: &PlayResult, before: &GameState, flags: &DramaFlags) -> u32 {
        let mut score: i64 = if play.is_touchdown() || play.turnover().map(|t| t.returned_for_td).unwrap_or(false) {
            85
        } else {
            match play.play_type() {
                PlayType::OnsideKick => 80,
                PlayType::TwoPointSuccess => 75,
                PlayType::FieldGoalGood => 60,
                PlayType::Sack => 55,
                PlayType::FieldGoalMissed => 45,
                PlayType::TwoPointFailure => 45,
                PlayType::PassComplete => 35,
                PlayType::Run | PlayType::Scramble => 25,
                PlayType::PassIncomplete => 20,
                PlayType::PenaltyNoPlay => 15,
                PlayType::Punt => 15,
                PlayType::Kickoff => 10,
                PlayType::ExtraPointGood | PlayType::ExtraPointMissed => 10,
                PlayType::Spike => 10,
                PlayType::Kneel => 3,
            }
        };
        if play.turnover().map(|t| t.kind != TurnoverKind::FumbleRecovery).unwrap_or(false) {
            score = score.max(70);
        }
        if play.yards_gained() >= BIG_PLAY_YARDS {
            score = score.max(65);
        }
        if flags.clutch {
            score += 20;
        }
        if flags.red_zone {
            score += 10;
        }
        if before.down() == 4 && !play.play_type().is_special_teams() {
            score += 15;
        }
        if before.quarter() == Quarter::Overtime {
            score += 15;
        }
        score.clamp(0, 100) as u32
    }

    /// The crowd's answer to a play
    fn crowd_reaction(
        &self,
        play: &PlayResult,
        before: &GameState,
        after: &GameState,
        excitement: u32,
    ) -> CrowdReaction {
        if play.penalty().map(|p| p.is_enforced()).unwrap_or(false) {
            return CrowdReaction::Boo;
        }
        if let Some(turnover) = play.turnover() {
            if turnover.kind != TurnoverKind::FumbleRecovery {
                return if turnover.recovered_by == TeamSide::Home {
                    CrowdReaction::Roar
                } else {
                    CrowdReaction::Gasp
                };
            }
        }
        let favors_home = Self::benefiting_side(play, before)
            .map(|side| side == TeamSide::Home)
            .unwrap_or(before.possession() == TeamSide::Home && play.yards_gained() > 0);
        let home_cruising = after.home_score() as i32 - after.away_score() as i32 >= 14
            && after.quarter() >= Quarter::Fourth;
        if home_cruising && excitement < 40 {
            return CrowdReaction::Chant;
        }
        match (favors_home, excitement) {
            (true, 75..) => CrowdReaction::Roar,
            (true, 45..) => CrowdReaction::Cheer,
            (true, _) => CrowdReaction::Murmur,
            (false, 75..) => CrowdReaction::Silence,
            (false, 45..) => CrowdReaction::Groan,
            (false, _) => CrowdReaction::Murmur,
        }
    }

    /// Fold a play into the narrative state and emit the event snapshot
    pub fn update(
        &mut self,
        play: &PlayResult,
        before: &GameState,
        after: &GameState,
        event_number: u64,
        home_roster: &[Player],
        away_roster: &[Player],
    ) -> NarrativeSnapshot {
        self.apply_momentum(play, before);
        self.track_scoreboard(after);
        self.update_streaks(play, event_number, home_roster, away_roster);
        self.update_game_threads(play, before, after, event_number);

        let flags = self.drama_flags(play, before, after);
        let drama_level = self.drama_level(&flags, after);
        let excitement = self.excitement(play, before, &flags);
        let crowd = self.crowd_reaction(play, before, after, excitement);
        NarrativeSnapshot {
            momentum: self.momentum,
            drama_level,
            flags,
            excitement,
            crowd,
            threads: self.visible_threads(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play::call::PlayCall;
    use crate::game::play::result::{PlayResultBuilder, ScoringKind, ScoringResult};
    use crate::game::turnover::TurnoverResult;
    use crate::player::Position;

    fn rosters() -> (Vec<Player>, Vec<Player>) {
        let build = |offset: u32| -> Vec<Player> {
            vec![
                Player::from_properties(
                    offset + 1, "Starter QB", Position::QB, 12, 88, 70, 65, 85, 80, false,
                )
                .unwrap(),
                Player::from_properties(
                    offset + 2, "Feature Back", Position::RB, 23, 85, 88, 80, 72, 75, false,
                )
                .unwrap(),
                Player::from_properties(
                    offset + 3, "Possession WR", Position::WR, 85, 83, 90, 64, 74, 76, false,
                )
                .unwrap(),
            ]
        };
        (build(0), build(100))
    }

    fn home_ref(index: usize) -> PlayerRef {
        PlayerRef {
            side: TeamSide::Home,
            index,
        }
    }

    #[test]
    fn test_momentum_swings_toward_scoring_team_and_decays() {
        let mut tracker = NarrativeTracker::new(false);
        let (home, away) = rosters();
        let before = GameState::new();
        let mut after = before;
        after.home_score = 6;
        let td = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
            .yards_gained(12)
            .touchdown(true)
            .scoring(ScoringResult::new(ScoringKind::Touchdown, TeamSide::Home, None))
            .build();
        tracker.update(&td, &before, &after, 1, &home, &away);
        // +25 for the score, then the decay tick
        assert_eq!(tracker.momentum(), 23.0);
        assert!(tracker.normalized_for(TeamSide::Home) > 0.0);
        assert!(tracker.normalized_for(TeamSide::Away) < 0.0);

        // A quiet play only decays
        let quiet = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
            .yards_gained(2)
            .build();
        tracker.update(&quiet, &before, &after, 2, &home, &away);
        assert_eq!(tracker.momentum(), 21.0);
    }

    #[test]
    fn test_turnover_is_the_biggest_single_swing() {
        let mut tracker = NarrativeTracker::new(false);
        let (home, away) = rosters();
        let before = GameState::new();
        let after = before;
        let pick = PlayResultBuilder::new(PlayType::PassIncomplete, PlayCall::PassDeep)
            .passer(home_ref(0))
            .turnover(TurnoverResult::new(
                TurnoverKind::Interception,
                TeamSide::Away,
                10,
                false,
            ))
            .build();
        let snapshot = tracker.update(&pick, &before, &after, 1, &home, &away);
        assert_eq!(tracker.momentum(), -33.0);
        assert_eq!(snapshot.crowd, CrowdReaction::Gasp);
        assert!(snapshot.excitement >= 70);
    }

    #[test]
    fn test_hot_streak_thread_appears_after_four_straight() {
        let mut tracker = NarrativeTracker::new(false);
        let (home, away) = rosters();
        let before = GameState::new();
        let after = before;
        for n in 0..4 {
            let completion =
                PlayResultBuilder::new(PlayType::PassComplete, PlayCall::PassShort)
                    .yards_gained(8)
                    .passer(home_ref(0))
                    .receiver(home_ref(2))
                    .build();
            tracker.update(&completion, &before, &after, n + 1, &home, &away);
        }
        assert!(tracker
            .threads()
            .iter()
            .any(|t| t.kind == ThreadKind::HotStreak));

        // Three straight misses flip the storyline
        for n in 0..3 {
            let miss = PlayResultBuilder::new(PlayType::PassIncomplete, PlayCall::PassShort)
                .passer(home_ref(0))
                .build();
            tracker.update(&miss, &before, &after, n + 5, &home, &away);
        }
        assert!(!tracker
            .threads()
            .iter()
            .any(|t| t.kind == ThreadKind::HotStreak));
        assert!(tracker
            .threads()
            .iter()
            .any(|t| t.kind == ThreadKind::ColdStreak));
    }

    #[test]
    fn test_thread_cap_and_intensity_bounds() {
        let mut tracker = NarrativeTracker::new(true);
        for n in 0..10u64 {
            tracker.upsert_thread(
                match n % 6 {
                    0 => ThreadKind::HotStreak,
                    1 => ThreadKind::ColdStreak,
                    2 => ThreadKind::Shootout,
                    3 => ThreadKind::RecordChase,
                    4 => ThreadKind::DefensiveDominance,
                    _ => ThreadKind::RookieSpotlight,
                },
                format!("thread {}", n),
                vec![PlayerRef {
                    side: TeamSide::Home,
                    index: n as usize,
                }],
                (n * 13) as u32,
                n,
                true,
            );
        }
        assert!(tracker.threads().len() <= 5);
        for thread in tracker.threads() {
            assert!(thread.intensity <= 100);
        }
    }

    #[test]
    fn test_blowout_short_circuits_drama() {
        let tracker = NarrativeTracker::new(false);
        let flags = DramaFlags {
            blowout: true,
            clutch: true,
            ..DramaFlags::default()
        };
        let mut after = GameState::new();
        after.home_score = 38;
        after.away_score = 10;
        assert!(tracker.drama_level(&flags, &after) <= 15);
    }

    #[test]
    fn test_kneel_is_the_dullest_play() {
        let tracker = NarrativeTracker::new(false);
        let before = GameState::new();
        let kneel = PlayResultBuilder::new(PlayType::Kneel, PlayCall::Kneel)
            .yards_gained(-1)
            .build();
        let flags = DramaFlags::default();
        assert_eq!(tracker.excitement(&kneel, &before, &flags), 3);
    }
}
