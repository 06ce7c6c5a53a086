#![doc = include_str!("../docs/team.md")]
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_TEAM_RATING: u32 = 70;
pub const MAX_TEAM_RATING: u32 = 99;

/// # `Conference` enum
///
/// The two conferences a team can belong to
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conference {
    Afc,
    Nfc,
}

/// # `Division` enum
///
/// The four divisions within each conference
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    North,
    South,
    East,
    West,
}

/// # `PlayStyle` enum
///
/// A team's offensive identity, used by the play caller to bias the
/// run/pass split
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    Balanced,
    PassHeavy,
    RunHeavy,
    Aggressive,
    Conservative,
}

/// # `TeamRaw` struct
///
/// A `Team` before its properties have been validated
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamRaw {
    id: u32,
    name: String,
    abbreviation: String,
    city: String,
    conference: Conference,
    division: Division,
    offense_rating: u32,
    defense_rating: u32,
    special_teams_rating: u32,
    play_style: PlayStyle,
}

impl TeamRaw {
    pub fn validate(&self) -> Result<(), String> {
        // Ensure the display name and abbreviation are nonempty and bounded
        if self.name.is_empty() || self.name.len() > 64 {
            return Err(format!(
                "Team name must be 1-64 characters: {:?}",
                self.name
            ));
        }
        if self.abbreviation.is_empty() || self.abbreviation.len() > 4 {
            return Err(format!(
                "Team abbreviation must be 1-4 characters: {:?}",
                self.abbreviation
            ));
        }

        // Ensure each overall rating is in range [70, 99]
        for (label, rating) in [
            ("offense", self.offense_rating),
            ("defense", self.defense_rating),
            ("special teams", self.special_teams_rating),
        ] {
            if !(MIN_TEAM_RATING..=MAX_TEAM_RATING).contains(&rating) {
                return Err(format!(
                    "Team {} rating is not in range [{}, {}]: {}",
                    label, MIN_TEAM_RATING, MAX_TEAM_RATING, rating
                ));
            }
        }
        Ok(())
    }
}

/// # `Team` struct
///
/// A `Team` describes one side of a simulated game: identity, overall
/// ratings, and play style. Teams are read-only for the duration of a game.
#[derive(Clone, Debug, Serialize)]
pub struct Team {
    id: u32,
    name: String,
    abbreviation: String,
    city: String,
    conference: Conference,
    division: Division,
    offense_rating: u32,
    defense_rating: u32,
    special_teams_rating: u32,
    play_style: PlayStyle,
}

impl TryFrom<TeamRaw> for Team {
    type Error = String;

    fn try_from(item: TeamRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(Team {
            id: item.id,
            name: item.name,
            abbreviation: item.abbreviation,
            city: item.city,
            conference: item.conference,
            division: item.division,
            offense_rating: item.offense_rating,
            defense_rating: item.defense_rating,
            special_teams_rating: item.special_teams_rating,
            play_style: item.play_style,
        })
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only deserialize if the conversion from raw succeeds
        let raw = TeamRaw::deserialize(deserializer)?;
        Team::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Team {
    /// Construct a validated team from its properties
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::team::{Conference, Division, PlayStyle, Team};
    ///
    /// let my_team = Team::from_properties(
    ///     1, "Ironbacks", "IRB", "Duluth",
    ///     Conference::Nfc, Division::North,
    ///     88, 85, 80, PlayStyle::Balanced,
    /// ).unwrap();
    /// assert!(my_team.offense_rating() == 88);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn from_properties(
        id: u32,
        name: &str,
        abbreviation: &str,
        city: &str,
        conference: Conference,
        division: Division,
        offense_rating: u32,
        defense_rating: u32,
        special_teams_rating: u32,
        play_style: PlayStyle,
    ) -> Result<Team, String> {
        let raw = TeamRaw {
            id,
            name: String::from(name),
            abbreviation: String::from(abbreviation),
            city: String::from(city),
            conference,
            division,
            offense_rating,
            defense_rating,
            special_teams_rating,
            play_style,
        };
        Team::try_from(raw)
    }

    /// Get the team's id
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the team's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the team's abbreviation
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Get the team's city
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Get the team's conference
    pub fn conference(&self) -> Conference {
        self.conference
    }

    /// Get the team's division
    pub fn division(&self) -> Division {
        self.division
    }

    /// Get the team's offensive overall rating
    pub fn offense_rating(&self) -> u32 {
        self.offense_rating
    }

    /// Get the team's defensive overall rating
    pub fn defense_rating(&self) -> u32 {
        self.defense_rating
    }

    /// Get the team's special teams overall rating
    pub fn special_teams_rating(&self) -> u32 {
        self.special_teams_rating
    }

    /// Get the team's play style
    pub fn play_style(&self) -> PlayStyle {
        self.play_style
    }
}

impl std::fmt::Display for Team {
    /// Format a `Team` as a string.
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::team::{Conference, Division, PlayStyle, Team};
    ///
    /// let my_team = Team::from_properties(
    ///     1, "Ironbacks", "IRB", "Duluth",
    ///     Conference::Nfc, Division::North,
    ///     88, 85, 80, PlayStyle::Balanced,
    /// ).unwrap();
    /// println!("{}", my_team);
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.city, self.name, self.abbreviation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_team() -> TeamRaw {
        TeamRaw {
            id: 7,
            name: String::from("Ironbacks"),
            abbreviation: String::from("IRB"),
            city: String::from("Duluth"),
            conference: Conference::Nfc,
            division: Division::North,
            offense_rating: 85,
            defense_rating: 82,
            special_teams_rating: 78,
            play_style: PlayStyle::RunHeavy,
        }
    }

    #[test]
    fn test_valid_team_converts() {
        let team = Team::try_from(raw_team()).unwrap();
        assert_eq!(team.abbreviation(), "IRB");
        assert_eq!(team.play_style(), PlayStyle::RunHeavy);
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut raw = raw_team();
        raw.offense_rating = 69;
        assert!(Team::try_from(raw).is_err());
        let mut raw = raw_team();
        raw.defense_rating = 100;
        assert!(Team::try_from(raw).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut raw = raw_team();
        raw.name = String::new();
        assert!(Team::try_from(raw).is_err());
    }

    #[test]
    fn test_deserialize_guards_validation() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Ironbacks",
            "abbreviation": "IRB",
            "city": "Duluth",
            "conference": "nfc",
            "division": "north",
            "offense_rating": 50,
            "defense_rating": 80,
            "special_teams_rating": 80,
            "play_style": "balanced"
        });
        let parsed: Result<Team, _> = serde_json::from_value(json);
        assert!(parsed.is_err());
    }
}
