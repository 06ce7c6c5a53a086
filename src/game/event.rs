#![doc = include_str!("../../docs/game/event.md")]
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::game::narrative::{CrowdReaction, NarrativeSnapshot};
use crate::game::play::result::{PlayResult, PlayType};
use crate::game::state::GameState;
use crate::rng::ProvablyFairRng;

// Playback pacing in milliseconds, keyed by how much the moment deserves
// to breathe
const DELAY_SCORE: u64 = 4500;
const DELAY_TURNOVER: u64 = 4000;
const DELAY_KICK: u64 = 2500;
const DELAY_PASS: u64 = 3000;
const DELAY_RUN: u64 = 2800;
const DELAY_DEAD_BALL: u64 = 2000;
const DELAY_DRAMA_BONUS: u64 = 1500;

lazy_static! {
    static ref COLOR_HIGH: Vec<&'static str> = vec![
        "What a moment in this football game!",
        "You simply cannot script it any better.",
        "The sideline has completely lost its mind.",
        "That is the kind of play seasons turn on.",
    ];
    static ref COLOR_MID: Vec<&'static str> = vec![
        "Solid execution, exactly what the drive needed.",
        "The coordinator will take that result every time.",
        "Winning football, one snap at a time.",
        "They are staying patient with the game plan.",
    ];
    static ref COLOR_LOW: Vec<&'static str> = vec![
        "Nothing doing on that one.",
        "Both sides resetting between snaps.",
        "A quiet snap as the game breathes.",
        "They will want that one back in the film room.",
    ];
}

/// # `Commentary` struct
///
/// The template booth output for one play: the play-by-play line, a color
/// line, the crowd, and the excitement grade
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commentary {
    pub play_by_play: String,
    pub color: String,
    pub crowd: CrowdReaction,
    pub excitement: u32,
}

/// # `CommentarySimulator` struct
///
/// Builds template commentary for a resolved play. Consumes exactly one
/// draw per play (the color-line choice), keeping the per-event draw
/// count fixed.
#[derive(Clone, Debug, Default)]
pub struct CommentarySimulator {}

impl CommentarySimulator {
    /// Initialize a new commentary simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::event::CommentarySimulator;
    ///
    /// let my_sim = CommentarySimulator::new();
    /// ```
    pub fn new() -> CommentarySimulator {
        CommentarySimulator::default()
    }

    /// Build the booth lines for a play
    pub fn sim(
        &self,
        play: &PlayResult,
        after: &GameState,
        narrative: &NarrativeSnapshot,
        rng: &mut ProvablyFairRng,
    ) -> Commentary {
        let pool: &[&'static str] = if narrative.excitement >= 65 {
            &COLOR_HIGH
        } else if narrative.excitement >= 35 {
            &COLOR_MID
        } else {
            &COLOR_LOW
        };
        let color = pool[rng.random_int(0, pool.len() as i32 - 1) as usize];
        let play_by_play = format!("{}. {}", play.description(), after);
        Commentary {
            play_by_play,
            color: String::from(color),
            crowd: narrative.crowd,
            excitement: narrative.excitement,
        }
    }
}

/// The playback delay for a play, from its kind and the drama around it
pub fn playback_delay(play: &PlayResult, narrative: &NarrativeSnapshot) -> u64 {
    let base = if play.scoring().is_some() {
        DELAY_SCORE
    } else if play.turnover().is_some() {
        DELAY_TURNOVER
    } else {
        match play.play_type() {
            PlayType::Kickoff | PlayType::OnsideKick | PlayType::Punt => DELAY_KICK,
            PlayType::PassComplete | PlayType::PassIncomplete | PlayType::Sack => DELAY_PASS,
            PlayType::Run | PlayType::Scramble => DELAY_RUN,
            _ => DELAY_DEAD_BALL,
        }
    };
    if narrative.drama_level >= 70 {
        base + DELAY_DRAMA_BONUS
    } else {
        base
    }
}

/// # `GameEvent` struct
///
/// One archived play: a monotonic event number, the frozen play result,
/// the booth commentary, a copy of the post-play state, the narrative
/// snapshot, the playback cursor, and the drive it belonged to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    event_number: u64,
    play: PlayResult,
    commentary: Commentary,
    state: GameState,
    narrative: NarrativeSnapshot,
    timestamp_ms: u64,
    drive_number: u32,
}

impl GameEvent {
    /// Assemble an event for the archive
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        event_number: u64,
        play: PlayResult,
        commentary: Commentary,
        state: GameState,
        narrative: NarrativeSnapshot,
        timestamp_ms: u64,
        drive_number: u32,
    ) -> GameEvent {
        GameEvent {
            event_number,
            play,
            commentary,
            state,
            narrative,
            timestamp_ms,
            drive_number,
        }
    }

    /// Get the monotonic event number, starting from one
    pub fn event_number(&self) -> u64 {
        self.event_number
    }

    /// Get the frozen play result
    pub fn play(&self) -> &PlayResult {
        &self.play
    }

    /// Get the booth commentary
    pub fn commentary(&self) -> &Commentary {
        &self.commentary
    }

    /// Get the post-play state snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Get the narrative snapshot
    pub fn narrative(&self) -> &NarrativeSnapshot {
        &self.narrative
    }

    /// Get the synthetic playback cursor in milliseconds
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Get the drive this play belonged to
    pub fn drive_number(&self) -> u32 {
        self.drive_number
    }
}
