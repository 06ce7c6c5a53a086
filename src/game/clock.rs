#![doc = include_str!("../../docs/game/clock.md")]
use serde::{Deserialize, Serialize};

use crate::game::state::{GameState, Quarter, TIMEOUTS_PER_HALF};
use crate::game::GameType;
use crate::rng::ProvablyFairRng;

// Two-minute warning threshold in seconds
pub const TWO_MINUTE_MARK: u32 = 120;

// Play clock lengths by reset reason
pub const PLAY_CLOCK_LONG: u32 = 40;
pub const PLAY_CLOCK_SHORT: u32 = 25;

// Timeouts granted per side for an overtime period
pub const OVERTIME_TIMEOUTS: u32 = 2;

/// # `ElapsedKey` enum
///
/// The table row a play's elapsed time is drawn from. `Untimed` covers
/// tries and pre-snap penalties, which consume no game clock and no draw.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElapsedKey {
    RunNormal,
    PassComplete,
    PassIncomplete,
    Sack,
    Scramble,
    Punt,
    FieldGoal,
    Kickoff,
    Kneel,
    Spike,
    Untimed,
}

impl ElapsedKey {
    /// The inclusive elapsed-seconds range at normal tempo
    fn normal_range(&self) -> (i32, i32) {
        match self {
            ElapsedKey::RunNormal => (25, 40),
            ElapsedKey::PassComplete => (24, 38),
            ElapsedKey::PassIncomplete => (5, 9),
            ElapsedKey::Sack => (28, 42),
            ElapsedKey::Scramble => (26, 40),
            ElapsedKey::Punt => (10, 16),
            ElapsedKey::FieldGoal => (4, 7),
            ElapsedKey::Kickoff => (6, 11),
            ElapsedKey::Kneel => (38, 44),
            ElapsedKey::Spike => (1, 3),
            ElapsedKey::Untimed => (0, 0),
        }
    }

    /// The inclusive elapsed-seconds range at two-minute-drill tempo
    fn hurry_up_range(&self) -> (i32, i32) {
        match self {
            ElapsedKey::RunNormal => (13, 20),
            ElapsedKey::PassComplete => (11, 18),
            ElapsedKey::PassIncomplete => (4, 7),
            ElapsedKey::Sack => (14, 22),
            ElapsedKey::Scramble => (13, 20),
            ElapsedKey::Punt => (8, 12),
            ElapsedKey::FieldGoal => (4, 6),
            ElapsedKey::Kickoff => (5, 9),
            ElapsedKey::Kneel => (38, 44),
            ElapsedKey::Spike => (1, 2),
            ElapsedKey::Untimed => (0, 0),
        }
    }
}

/// # `PlayClockReset` enum
///
/// Why the play clock is being rewound, which decides its length
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayClockReset {
    AfterPenalty,
    AfterTurnover,
    AfterScore,
    Normal,
}

/// # `PeriodEnd` enum
///
/// What the expiry of a period's clock means for the game
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodEnd {
    NextQuarter,
    Halftime,
    GameOver,
    OvertimeStart,
    OvertimePeriod,
}

/// # `ClockManager` struct
///
/// Owns the clock rules: elapsed-time sampling, the two-minute warning
/// latch, play-clock policy, and period transitions.
#[derive(Clone, Debug, Default)]
pub struct ClockManager {}

impl ClockManager {
    /// Initialize a new clock manager
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::clock::ClockManager;
    ///
    /// let my_clock = ClockManager::new();
    /// ```
    pub fn new() -> ClockManager {
        ClockManager::default()
    }

    /// Sample a play's elapsed seconds, consuming one draw (none for
    /// `Untimed` rows)
    pub fn sample_elapsed(
        &self,
        key: ElapsedKey,
        hurry_up: bool,
        rng: &mut ProvablyFairRng,
    ) -> u32 {
        let (min, max) = if hurry_up {
            key.hurry_up_range()
        } else {
            key.normal_range()
        };
        if min == 0 && max == 0 {
            return 0;
        }
        rng.random_int(min, max) as u32
    }

    /// Whether the offense is inside the hurry-up window (final two
    /// minutes of either half)
    pub fn in_two_minute_window(&self, state: &GameState) -> bool {
        state.quarter().is_half_end() && state.clock() <= TWO_MINUTE_MARK
    }

    /// Run the game clock down by a play's elapsed time
    ///
    /// When the runoff crosses the two-minute mark of the 2nd or 4th
    /// quarter for the first time in the half, the clock is clamped to
    /// exactly 2:00, the warning latches, and the clock stops. Returns
    /// whether the warning fired on this play.
    pub fn advance(&self, state: &mut GameState, elapsed: u32) -> bool {
        let before = state.clock;
        state.clock = state.clock.saturating_sub(elapsed);
        if state.quarter.is_half_end()
            && !state.two_minute_warning
            && before > TWO_MINUTE_MARK
            && state.clock <= TWO_MINUTE_MARK
        {
            state.clock = TWO_MINUTE_MARK;
            state.two_minute_warning = true;
            state.is_clock_running = false;
            return true;
        }
        false
    }

    /// The play-clock length for a reset reason
    pub fn play_clock_for(&self, reset: PlayClockReset) -> u32 {
        match reset {
            PlayClockReset::AfterPenalty
            | PlayClockReset::AfterTurnover
            | PlayClockReset::AfterScore => PLAY_CLOCK_SHORT,
            PlayClockReset::Normal => PLAY_CLOCK_LONG,
        }
    }

    /// Resolve what an expired period clock means and apply the purely
    /// clock-side effects (period change, halftime resets)
    ///
    /// Possession changes for the second-half kickoff are the engine's
    /// job; this only rewinds the clock and resets timeouts.
    pub fn end_of_period(&self, state: &mut GameState, game_type: GameType) -> PeriodEnd {
        match state.quarter {
            Quarter::First => {
                state.quarter = Quarter::Second;
                state.clock = Quarter::Second.length_seconds();
                PeriodEnd::NextQuarter
            }
            Quarter::Second => {
                state.quarter = Quarter::Third;
                state.clock = Quarter::Third.length_seconds();
                state.is_halftime = true;
                state.two_minute_warning = false;
                state.home_timeouts = TIMEOUTS_PER_HALF;
                state.away_timeouts = TIMEOUTS_PER_HALF;
                PeriodEnd::Halftime
            }
            Quarter::Third => {
                state.quarter = Quarter::Fourth;
                state.clock = Quarter::Fourth.length_seconds();
                PeriodEnd::NextQuarter
            }
            Quarter::Fourth => {
                if state.home_score != state.away_score {
                    return PeriodEnd::GameOver;
                }
                state.quarter = Quarter::Overtime;
                state.clock = Quarter::Overtime.length_seconds();
                state.home_timeouts = OVERTIME_TIMEOUTS;
                state.away_timeouts = OVERTIME_TIMEOUTS;
                PeriodEnd::OvertimeStart
            }
            Quarter::Overtime => {
                if state.home_score != state.away_score || game_type == GameType::Regular {
                    return PeriodEnd::GameOver;
                }
                // Playoff football cannot end tied: roll another period
                state.clock = Quarter::Overtime.length_seconds();
                state.home_timeouts = OVERTIME_TIMEOUTS;
                state.away_timeouts = OVERTIME_TIMEOUTS;
                PeriodEnd::OvertimePeriod
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::TeamSide;

    #[test]
    fn test_two_minute_warning_clamps_and_latches() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Second;
        state.clock = 130;
        let fired = clock.advance(&mut state, 25);
        assert!(fired);
        assert_eq!(state.clock(), TWO_MINUTE_MARK);
        assert!(state.two_minute_warning());
        assert!(!state.is_clock_running());

        // Latched: a later crossing does not re-fire
        let fired_again = clock.advance(&mut state, 30);
        assert!(!fired_again);
        assert_eq!(state.clock(), 90);
    }

    #[test]
    fn test_no_warning_in_odd_quarters() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::First;
        state.clock = 125;
        assert!(!clock.advance(&mut state, 20));
        assert_eq!(state.clock(), 105);
    }

    #[test]
    fn test_halftime_resets_timeouts_and_warning_latch() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Second;
        state.clock = 0;
        state.home_timeouts = 1;
        state.two_minute_warning = true;
        let end = clock.end_of_period(&mut state, GameType::Regular);
        assert_eq!(end, PeriodEnd::Halftime);
        assert_eq!(state.quarter(), Quarter::Third);
        assert_eq!(state.clock(), 900);
        assert_eq!(state.home_timeouts(), TIMEOUTS_PER_HALF);
        assert!(!state.two_minute_warning());
        assert!(state.is_halftime());
    }

    #[test]
    fn test_regulation_end_decided_game() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Fourth;
        state.clock = 0;
        state.home_score = 24;
        state.away_score = 17;
        assert_eq!(
            clock.end_of_period(&mut state, GameType::Regular),
            PeriodEnd::GameOver
        );
    }

    #[test]
    fn test_regulation_tie_enters_overtime() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Fourth;
        state.clock = 0;
        state.home_score = 20;
        state.away_score = 20;
        assert_eq!(
            clock.end_of_period(&mut state, GameType::Regular),
            PeriodEnd::OvertimeStart
        );
        assert_eq!(state.quarter(), Quarter::Overtime);
        assert_eq!(state.clock(), 600);
        assert_eq!(state.home_timeouts(), OVERTIME_TIMEOUTS);
    }

    #[test]
    fn test_regular_season_overtime_can_end_tied() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Overtime;
        state.clock = 0;
        state.home_score = 20;
        state.away_score = 20;
        assert_eq!(
            clock.end_of_period(&mut state, GameType::Regular),
            PeriodEnd::GameOver
        );
    }

    #[test]
    fn test_playoff_overtime_continues_while_tied() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Overtime;
        state.clock = 0;
        state.home_score = 23;
        state.away_score = 23;
        assert_eq!(
            clock.end_of_period(&mut state, GameType::SuperBowl),
            PeriodEnd::OvertimePeriod
        );
        assert_eq!(state.clock(), 600);
    }

    #[test]
    fn test_elapsed_ranges_respected() {
        let clock = ClockManager::new();
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        for _ in 0..64 {
            let t = clock.sample_elapsed(ElapsedKey::RunNormal, false, &mut rng);
            assert!((25..=40).contains(&t));
            let t = clock.sample_elapsed(ElapsedKey::PassIncomplete, true, &mut rng);
            assert!((4..=7).contains(&t));
        }
        let before = rng.nonce();
        assert_eq!(clock.sample_elapsed(ElapsedKey::Untimed, false, &mut rng), 0);
        assert_eq!(rng.nonce(), before);
    }

    #[test]
    fn test_possession_side_unchanged_by_clock() {
        let clock = ClockManager::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Third;
        state.clock = 0;
        state.possession = TeamSide::Away;
        clock.end_of_period(&mut state, GameType::Regular);
        assert_eq!(state.possession(), TeamSide::Away);
    }
}
