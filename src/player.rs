#![doc = include_str!("../docs/player.md")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::WeightedChoiceError;
use crate::rng::ProvablyFairRng;

pub const MIN_PLAYER_RATING: u32 = 60;
pub const MAX_PLAYER_RATING: u32 = 99;

// Rating assigned to synthetic emergency fill-ins when a roster cannot
// satisfy a positional lookup
pub const EMERGENCY_RATING: u32 = 60;

/// # `TeamSide` enum
///
/// Identifies one of the two sides in a game. Doubles as the possession
/// marker in the game state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    /// Get the opposing side
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::player::TeamSide;
    ///
    /// assert!(TeamSide::Home.opponent() == TeamSide::Away);
    /// ```
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// # `Position` enum
///
/// The eleven roster positions the simulator recognises
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    OL,
    DL,
    LB,
    CB,
    S,
    K,
    P,
}

/// # `PlayerRef` struct
///
/// A stable reference to a roster entry: the side it plays for plus its
/// index into that side's roster vector. Events and stat lines carry these
/// instead of owning player data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerRef {
    pub side: TeamSide,
    pub index: usize,
}

/// # `PlayerRaw` struct
///
/// A `Player` before its properties have been validated
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRaw {
    id: u32,
    name: String,
    position: Position,
    jersey_number: u32,
    overall: u32,
    speed: u32,
    strength: u32,
    awareness: u32,
    clutch: u32,
    injury_prone: bool,
}

impl PlayerRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() || self.name.len() > 64 {
            return Err(format!(
                "Player name must be 1-64 characters: {:?}",
                self.name
            ));
        }
        if self.jersey_number > 99 {
            return Err(format!(
                "Jersey number is not in range [0, 99]: {}",
                self.jersey_number
            ));
        }

        // Ensure each rating is in range [60, 99]
        for (label, rating) in [
            ("overall", self.overall),
            ("speed", self.speed),
            ("strength", self.strength),
            ("awareness", self.awareness),
            ("clutch", self.clutch),
        ] {
            if !(MIN_PLAYER_RATING..=MAX_PLAYER_RATING).contains(&rating) {
                return Err(format!(
                    "Player {} rating is not in range [{}, {}]: {}",
                    label, MIN_PLAYER_RATING, MAX_PLAYER_RATING, rating
                ));
            }
        }
        Ok(())
    }
}

/// # `Player` struct
///
/// A `Player` is one roster entry. Players are read-only for the duration
/// of a game; injuries mark them unavailable without mutating them.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    id: u32,
    name: String,
    position: Position,
    jersey_number: u32,
    overall: u32,
    speed: u32,
    strength: u32,
    awareness: u32,
    clutch: u32,
    injury_prone: bool,
}

impl TryFrom<PlayerRaw> for Player {
    type Error = String;

    fn try_from(item: PlayerRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(Player {
            id: item.id,
            name: item.name,
            position: item.position,
            jersey_number: item.jersey_number,
            overall: item.overall,
            speed: item.speed,
            strength: item.strength,
            awareness: item.awareness,
            clutch: item.clutch,
            injury_prone: item.injury_prone,
        })
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = PlayerRaw::deserialize(deserializer)?;
        Player::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Player {
    /// Construct a validated player from its properties
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::player::{Player, Position};
    ///
    /// let my_qb = Player::from_properties(
    ///     12, "Sam Archer", Position::QB, 12, 90, 75, 70, 88, 85, false,
    /// ).unwrap();
    /// assert!(my_qb.overall() == 90);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn from_properties(
        id: u32,
        name: &str,
        position: Position,
        jersey_number: u32,
        overall: u32,
        speed: u32,
        strength: u32,
        awareness: u32,
        clutch: u32,
        injury_prone: bool,
    ) -> Result<Player, String> {
        let raw = PlayerRaw {
            id,
            name: String::from(name),
            position,
            jersey_number,
            overall,
            speed,
            strength,
            awareness,
            clutch,
            injury_prone,
        };
        Player::try_from(raw)
    }

    /// Construct the synthetic emergency fill-in for a position
    ///
    /// The fallback behind every positional lookup: a rating-floor player
    /// with no roster reference, so a thin-but-legal roster can never panic
    /// the game loop.
    pub fn emergency(position: Position) -> Player {
        Player {
            id: 0,
            name: String::from("Emergency Fill-In"),
            position,
            jersey_number: 0,
            overall: EMERGENCY_RATING,
            speed: EMERGENCY_RATING,
            strength: EMERGENCY_RATING,
            awareness: EMERGENCY_RATING,
            clutch: EMERGENCY_RATING,
            injury_prone: false,
        }
    }

    /// Get the player's id
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the player's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the player's position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get the player's jersey number
    pub fn jersey_number(&self) -> u32 {
        self.jersey_number
    }

    /// Get the player's overall rating
    pub fn overall(&self) -> u32 {
        self.overall
    }

    /// Get the player's speed rating
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Get the player's strength rating
    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Get the player's awareness rating
    pub fn awareness(&self) -> u32 {
        self.awareness
    }

    /// Get the player's clutch rating
    pub fn clutch(&self) -> u32 {
        self.clutch
    }

    /// Get whether the player is injury prone
    pub fn injury_prone(&self) -> bool {
        self.injury_prone
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({:?})", self.jersey_number, self.name, self.position)
    }
}

/// # `Squad` struct
///
/// A per-play view over one side's roster: the full roster slice plus the
/// subset of indices still available (not ruled out by injury). All
/// positional lookups and weighted player selections run through it, in
/// ascending roster order, so selection is deterministic.
pub struct Squad<'a> {
    side: TeamSide,
    players: &'a [Player],
    available: Vec<usize>,
}

impl<'a> Squad<'a> {
    /// Build a squad view from a roster and the set of unavailable indices
    pub fn new(side: TeamSide, players: &'a [Player], unavailable: &[usize]) -> Squad<'a> {
        let available: Vec<usize> = (0..players.len())
            .filter(|i| !unavailable.contains(i))
            .collect();
        Squad {
            side,
            players,
            available,
        }
    }

    /// Get the side this squad plays for
    pub fn side(&self) -> TeamSide {
        self.side
    }

    /// Get the full roster slice
    pub fn players(&self) -> &'a [Player] {
        self.players
    }

    /// Get whether no players are available at all
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Build a `PlayerRef` for a roster index
    pub fn reference(&self, index: usize) -> PlayerRef {
        PlayerRef {
            side: self.side,
            index,
        }
    }

    /// Get the highest-rated available player at a position
    ///
    /// Ties resolve to the lower roster index.
    pub fn best_at(&self, position: Position) -> Option<(usize, &'a Player)> {
        self.available
            .iter()
            .map(|&i| (i, &self.players[i]))
            .filter(|(_, p)| p.position() == position)
            .max_by(|(ai, a), (bi, b)| {
                a.overall().cmp(&b.overall()).then(bi.cmp(ai))
            })
    }

    /// Get the highest-rated available player at a position, or the
    /// synthetic emergency fill-in when the position is uncovered
    pub fn best_at_or_emergency(&self, position: Position) -> (Option<usize>, Player) {
        match self.best_at(position) {
            Some((i, p)) => (Some(i), p.clone()),
            None => (None, Player::emergency(position)),
        }
    }

    /// All available players at any of the listed positions, in roster order
    pub fn available_at(&self, positions: &[Position]) -> Vec<(usize, &'a Player)> {
        self.available
            .iter()
            .map(|&i| (i, &self.players[i]))
            .filter(|(_, p)| positions.contains(&p.position()))
            .collect()
    }

    /// Weighted-choice one available player at the listed positions by
    /// overall rating, consuming one draw
    ///
    /// Returns `None` without a draw when no candidate exists.
    pub fn select_weighted(
        &self,
        positions: &[Position],
        rng: &mut ProvablyFairRng,
    ) -> Result<Option<(usize, &'a Player)>, WeightedChoiceError> {
        let candidates = self.available_at(positions);
        if candidates.is_empty() {
            return Ok(None);
        }
        let options: Vec<((usize, &Player), f64)> = candidates
            .into_iter()
            .map(|(i, p)| ((i, p), p.overall() as f64))
            .collect();
        let picked = rng.weighted_choice(&options)?;
        Ok(Some(*picked))
    }

    /// Weighted-choice a target for a pass among receivers (WR + TE)
    pub fn select_receiver(
        &self,
        rng: &mut ProvablyFairRng,
    ) -> Result<Option<(usize, &'a Player)>, WeightedChoiceError> {
        self.select_weighted(&[Position::WR, Position::TE], rng)
    }

    /// Weighted-choice a defender credited with a stop (DL + LB + CB + S)
    pub fn select_defender(
        &self,
        rng: &mut ProvablyFairRng,
    ) -> Result<Option<(usize, &'a Player)>, WeightedChoiceError> {
        self.select_weighted(
            &[Position::DL, Position::LB, Position::CB, Position::S],
            rng,
        )
    }

    /// Average overall rating across the listed positions
    ///
    /// Falls back to the emergency rating when no available player covers
    /// any of the positions.
    pub fn average_rating(&self, positions: &[Position]) -> f64 {
        let candidates = self.available_at(positions);
        if candidates.is_empty() {
            return EMERGENCY_RATING as f64;
        }
        let total: u32 = candidates.iter().map(|(_, p)| p.overall()).sum();
        total as f64 / candidates.len() as f64
    }
}
