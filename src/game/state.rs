#![doc = include_str!("../../docs/game/state.md")]
use serde::{Deserialize, Serialize};

use crate::player::TeamSide;

// Field geometry and opening setup
pub const FIELD_LENGTH: u32 = 100;
pub const KICKOFF_SPOT: u32 = 35;
pub const SAFETY_FREE_KICK_SPOT: u32 = 20;
pub const FIRST_DOWN_DISTANCE: u32 = 10;
pub const TIMEOUTS_PER_HALF: u32 = 3;

/// # `Quarter` enum
///
/// The period of play, with its regulation or overtime length
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    First,
    Second,
    Third,
    Fourth,
    Overtime,
}

impl Quarter {
    /// Get the period length in seconds
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::state::Quarter;
    ///
    /// assert!(Quarter::First.length_seconds() == 900);
    /// assert!(Quarter::Overtime.length_seconds() == 600);
    /// ```
    pub fn length_seconds(&self) -> u32 {
        match self {
            Quarter::Overtime => 600,
            _ => 900,
        }
    }

    /// Get whether this period is one of the two half-ending quarters
    pub fn is_half_end(&self) -> bool {
        matches!(self, Quarter::Second | Quarter::Fourth)
    }

    /// Get a short display label for the period
    pub fn label(&self) -> &'static str {
        match self {
            Quarter::First => "Q1",
            Quarter::Second => "Q2",
            Quarter::Third => "Q3",
            Quarter::Fourth => "Q4",
            Quarter::Overtime => "OT",
        }
    }
}

/// # `GameState` struct
///
/// The complete between-plays situation as a flat value type. The engine
/// owns and mutates exactly one of these; every emitted event carries a
/// copy, which makes snapshots free.
///
/// `ball_position` is measured in yards from the possessing team's own goal
/// line: 0 is the possessing team's end zone, 100 the opponent's.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) quarter: Quarter,
    pub(crate) clock: u32,
    pub(crate) play_clock: u32,
    pub(crate) possession: TeamSide,
    pub(crate) down: u32,
    pub(crate) yards_to_go: u32,
    pub(crate) ball_position: u32,
    pub(crate) home_score: u32,
    pub(crate) away_score: u32,
    pub(crate) home_timeouts: u32,
    pub(crate) away_timeouts: u32,
    pub(crate) is_clock_running: bool,
    pub(crate) two_minute_warning: bool,
    pub(crate) is_halftime: bool,
    pub(crate) kickoff: bool,
    pub(crate) pat_attempt: bool,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// Initialize the opening state: home kicks off to start the first
    /// quarter
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::state::GameState;
    /// use gridiron_core::player::TeamSide;
    ///
    /// let state = GameState::new();
    /// assert!(state.kickoff());
    /// assert!(state.possession() == TeamSide::Home);
    /// assert!(state.clock() == 900);
    /// ```
    pub fn new() -> GameState {
        GameState {
            quarter: Quarter::First,
            clock: Quarter::First.length_seconds(),
            play_clock: 40,
            possession: TeamSide::Home,
            down: 1,
            yards_to_go: FIRST_DOWN_DISTANCE,
            ball_position: KICKOFF_SPOT,
            home_score: 0,
            away_score: 0,
            home_timeouts: TIMEOUTS_PER_HALF,
            away_timeouts: TIMEOUTS_PER_HALF,
            is_clock_running: false,
            two_minute_warning: false,
            is_halftime: false,
            kickoff: true,
            pat_attempt: false,
        }
    }

    /// Get the current period
    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    /// Get the seconds remaining in the current period
    pub fn clock(&self) -> u32 {
        self.clock
    }

    /// Get the play clock in seconds
    pub fn play_clock(&self) -> u32 {
        self.play_clock
    }

    /// Get the side currently in possession
    pub fn possession(&self) -> TeamSide {
        self.possession
    }

    /// Get the current down (1-4)
    pub fn down(&self) -> u32 {
        self.down
    }

    /// Get the yards needed for a first down
    pub fn yards_to_go(&self) -> u32 {
        self.yards_to_go
    }

    /// Get the ball position in yards from the possessing team's goal line
    pub fn ball_position(&self) -> u32 {
        self.ball_position
    }

    /// Get the home team's score
    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    /// Get the away team's score
    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    /// Get the home team's remaining timeouts
    pub fn home_timeouts(&self) -> u32 {
        self.home_timeouts
    }

    /// Get the away team's remaining timeouts
    pub fn away_timeouts(&self) -> u32 {
        self.away_timeouts
    }

    /// Get whether the clock will run between plays
    pub fn is_clock_running(&self) -> bool {
        self.is_clock_running
    }

    /// Get whether the two-minute warning has fired this half
    pub fn two_minute_warning(&self) -> bool {
        self.two_minute_warning
    }

    /// Get whether the state is the transient halftime break
    pub fn is_halftime(&self) -> bool {
        self.is_halftime
    }

    /// Get whether the next play is a kickoff
    pub fn kickoff(&self) -> bool {
        self.kickoff
    }

    /// Get whether the next play is a try (PAT or two-point attempt)
    pub fn pat_attempt(&self) -> bool {
        self.pat_attempt
    }

    /// Get a side's score
    pub fn score_of(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_score,
            TeamSide::Away => self.away_score,
        }
    }

    /// Get a side's remaining timeouts
    pub fn timeouts_of(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_timeouts,
            TeamSide::Away => self.away_timeouts,
        }
    }

    /// Get the possessing team's score margin (negative when trailing)
    pub fn possession_margin(&self) -> i32 {
        let us = self.score_of(self.possession) as i32;
        let them = self.score_of(self.possession.opponent()) as i32;
        us - them
    }

    /// Get whether the offense has reached the red zone (opponent 20)
    pub fn in_red_zone(&self) -> bool {
        self.ball_position >= 80
    }

    /// Get the yards between the ball and the opponent goal line
    pub fn yards_to_goal(&self) -> u32 {
        FIELD_LENGTH - self.ball_position
    }

    /// Clamp a signed field position into the legal between-plays range
    pub fn clamp_ball(position: i32) -> u32 {
        position.clamp(1, 99) as u32
    }

    /// Check the between-plays invariants
    ///
    /// Called by the engine as a post-condition after every applied play; a
    /// failure here is a simulator bug, not a runtime input error.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=99).contains(&self.ball_position) {
            return Err(format!(
                "ball position is not in range [1, 99]: {}",
                self.ball_position
            ));
        }
        if !(1..=4).contains(&self.down) {
            return Err(format!("down is not in range [1, 4]: {}", self.down));
        }
        if self.yards_to_go < 1 {
            return Err(String::from("yards to go is zero"));
        }
        if self.yards_to_go > FIELD_LENGTH - self.ball_position {
            return Err(format!(
                "yards to go {} exceeds distance to goal {}",
                self.yards_to_go,
                FIELD_LENGTH - self.ball_position
            ));
        }
        if self.clock > self.quarter.length_seconds() {
            return Err(format!(
                "clock {} exceeds period length {}",
                self.clock,
                self.quarter.length_seconds()
            ));
        }
        if self.home_timeouts > TIMEOUTS_PER_HALF || self.away_timeouts > TIMEOUTS_PER_HALF {
            return Err(String::from("timeouts exceed the per-half allowance"));
        }
        if self.kickoff && self.pat_attempt {
            return Err(String::from(
                "kickoff and PAT special states are both set",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for GameState {
    /// Format the situation as a scoreboard line.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::state::GameState;
    ///
    /// let state = GameState::new();
    /// println!("{}", state);
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}:{:02} | {}-{} | {} & {} at the {}",
            self.quarter.label(),
            self.clock / 60,
            self.clock % 60,
            self.home_score,
            self.away_score,
            self.down,
            self.yards_to_go,
            self.ball_position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_state_valid() {
        let state = GameState::new();
        assert!(state.validate().is_ok());
        assert_eq!(state.quarter(), Quarter::First);
        assert_eq!(state.ball_position(), KICKOFF_SPOT);
        assert!(!state.pat_attempt());
    }

    #[test]
    fn test_validate_rejects_bad_ball_position() {
        let mut state = GameState::new();
        state.ball_position = 0;
        assert!(state.validate().is_err());
        state.ball_position = 100;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_distance_past_goal() {
        let mut state = GameState::new();
        state.ball_position = 95;
        state.yards_to_go = 10;
        assert!(state.validate().is_err());
        state.yards_to_go = 5;
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dual_special_states() {
        let mut state = GameState::new();
        state.pat_attempt = true;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_possession_margin_sign() {
        let mut state = GameState::new();
        state.home_score = 14;
        state.away_score = 20;
        assert_eq!(state.possession_margin(), -6);
        state.possession = crate::player::TeamSide::Away;
        assert_eq!(state.possession_margin(), 6);
    }

    #[test]
    fn test_clamp_ball() {
        assert_eq!(GameState::clamp_ball(-12), 1);
        assert_eq!(GameState::clamp_ball(45), 45);
        assert_eq!(GameState::clamp_ball(104), 99);
    }
}
