#![doc = include_str!("../../docs/game/drive.md")]
use serde::{Deserialize, Serialize};

use crate::game::state::Quarter;
use crate::player::TeamSide;

/// # `DriveResult` enum
///
/// How a possession ended
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveResult {
    Touchdown,
    FieldGoal,
    Punt,
    Turnover,
    TurnoverOnDowns,
    EndOfHalf,
    Safety,
    InProgress,
}

/// # `Drive` struct
///
/// One contiguous possession: where and when it started, how many plays
/// and yards it produced, and how it ended
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    number: u32,
    team: TeamSide,
    start_position: u32,
    start_quarter: Quarter,
    start_clock: u32,
    play_count: u32,
    net_yards: i32,
    result: DriveResult,
    time_elapsed: u32,
}

impl Drive {
    /// Open a new drive
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::drive::{Drive, DriveResult};
    /// use gridiron_core::game::state::Quarter;
    /// use gridiron_core::player::TeamSide;
    ///
    /// let my_drive = Drive::start(1, TeamSide::Home, 25, Quarter::First, 900);
    /// assert!(my_drive.result() == DriveResult::InProgress);
    /// ```
    pub fn start(
        number: u32,
        team: TeamSide,
        start_position: u32,
        start_quarter: Quarter,
        start_clock: u32,
    ) -> Drive {
        Drive {
            number,
            team,
            start_position,
            start_quarter,
            start_clock,
            play_count: 0,
            net_yards: 0,
            result: DriveResult::InProgress,
            time_elapsed: 0,
        }
    }

    /// Credit a play to the drive
    pub fn record_play(&mut self, yards: i32, elapsed: u32) {
        self.play_count += 1;
        self.net_yards += yards;
        self.time_elapsed += elapsed;
    }

    /// Close the drive with its result
    pub fn finish(&mut self, result: DriveResult) {
        self.result = result;
    }

    /// Get the drive number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Get the possessing side
    pub fn team(&self) -> TeamSide {
        self.team
    }

    /// Get the starting field position
    pub fn start_position(&self) -> u32 {
        self.start_position
    }

    /// Get the quarter the drive started in
    pub fn start_quarter(&self) -> Quarter {
        self.start_quarter
    }

    /// Get the clock reading the drive started at
    pub fn start_clock(&self) -> u32 {
        self.start_clock
    }

    /// Get the number of plays run
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Get the net yards gained
    pub fn net_yards(&self) -> i32 {
        self.net_yards
    }

    /// Get how the drive ended
    pub fn result(&self) -> DriveResult {
        self.result
    }

    /// Get the game-clock seconds the drive consumed
    pub fn time_elapsed(&self) -> u32 {
        self.time_elapsed
    }
}

impl std::fmt::Display for Drive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Drive {}: {} plays, {} yards, {:?}",
            self.number, self.play_count, self.net_yards, self.result
        )
    }
}
