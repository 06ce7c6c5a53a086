#![doc = include_str!("../docs/boxscore.md")]
use serde::{Deserialize, Serialize};

use crate::game::drive::Drive;
use crate::game::stats::{GameStats, PlayerStatLine, ScoringLogEntry, TeamStats};
use crate::player::{Player, PlayerRef, Position, TeamSide};
use crate::team::Team;

/// # `PlayerBoxLine` struct
///
/// One player's row in the frozen box score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerBoxLine {
    pub player: PlayerRef,
    pub name: String,
    pub position: Position,
    pub line: PlayerStatLine,
}

/// # `BoxScore` struct
///
/// The immutable end-of-game record: final score, team blocks, per-player
/// rows ordered by yardage impact, the scoring summary, and the drive
/// log. Built once from the live accumulator when the game ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    home_team: String,
    away_team: String,
    home_score: u32,
    away_score: u32,
    home_stats: TeamStats,
    away_stats: TeamStats,
    home_players: Vec<PlayerBoxLine>,
    away_players: Vec<PlayerBoxLine>,
    scoring_plays: Vec<ScoringLogEntry>,
    drives: Vec<Drive>,
}

impl BoxScore {
    /// Freeze the live accumulator into a box score
    pub fn from_stats(
        stats: &GameStats,
        home_team: &Team,
        away_team: &Team,
        home_roster: &[Player],
        away_roster: &[Player],
        home_score: u32,
        away_score: u32,
    ) -> BoxScore {
        let collect = |side: TeamSide, roster: &[Player]| -> Vec<PlayerBoxLine> {
            let mut rows: Vec<PlayerBoxLine> = stats
                .players(side)
                .iter()
                .filter_map(|(&index, line)| {
                    roster.get(index).map(|player| PlayerBoxLine {
                        player: PlayerRef { side, index },
                        name: String::from(player.name()),
                        position: player.position(),
                        line: *line,
                    })
                })
                .collect();
            // Busiest players first; roster order breaks ties
            rows.sort_by(|a, b| {
                b.line
                    .yardage_impact()
                    .cmp(&a.line.yardage_impact())
                    .then(a.player.index.cmp(&b.player.index))
            });
            rows
        };
        BoxScore {
            home_team: String::from(home_team.name()),
            away_team: String::from(away_team.name()),
            home_score,
            away_score,
            home_stats: *stats.team(TeamSide::Home),
            away_stats: *stats.team(TeamSide::Away),
            home_players: collect(TeamSide::Home, home_roster),
            away_players: collect(TeamSide::Away, away_roster),
            scoring_plays: stats.scoring_log().to_vec(),
            drives: stats.drives().to_vec(),
        }
    }

    /// Get the home team name
    pub fn home_team(&self) -> &str {
        &self.home_team
    }

    /// Get the away team name
    pub fn away_team(&self) -> &str {
        &self.away_team
    }

    /// Get the home final score
    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    /// Get the away final score
    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    /// Get a side's team stat block
    pub fn team_stats(&self, side: TeamSide) -> &TeamStats {
        match side {
            TeamSide::Home => &self.home_stats,
            TeamSide::Away => &self.away_stats,
        }
    }

    /// Get a side's player rows, busiest first
    pub fn player_lines(&self, side: TeamSide) -> &[PlayerBoxLine] {
        match side {
            TeamSide::Home => &self.home_players,
            TeamSide::Away => &self.away_players,
        }
    }

    /// Get the scoring summary
    pub fn scoring_plays(&self) -> &[ScoringLogEntry] {
        &self.scoring_plays
    }

    /// Get the drive log
    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }
}

impl std::fmt::Display for BoxScore {
    /// Format the final line of the box score.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}, {}: {}",
            self.home_team, self.home_score, self.away_team, self.away_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play::call::PlayCall;
    use crate::game::play::result::{PlayResultBuilder, PlayType};
    use crate::game::state::GameState;
    use crate::team::{Conference, Division, PlayStyle};

    #[test]
    fn test_box_score_orders_by_yardage_impact() {
        let mut stats = GameStats::new();
        let state = GameState::new();
        for (index, yards) in [(0usize, 40), (1usize, 120)] {
            let play = PlayResultBuilder::new(PlayType::Run, PlayCall::RunInside)
                .yards_gained(yards)
                .rusher(PlayerRef {
                    side: TeamSide::Home,
                    index,
                })
                .build();
            stats.update(&play, &state);
        }
        let home_team = Team::from_properties(
            1, "Ironbacks", "IRB", "Duluth",
            Conference::Nfc, Division::North, 85, 82, 78, PlayStyle::Balanced,
        )
        .unwrap();
        let away_team = Team::from_properties(
            2, "Monarchs", "MON", "Fresno",
            Conference::Afc, Division::West, 83, 84, 80, PlayStyle::PassHeavy,
        )
        .unwrap();
        let roster = vec![
            Player::from_properties(1, "Back One", Position::RB, 21, 84, 85, 78, 70, 72, false)
                .unwrap(),
            Player::from_properties(2, "Back Two", Position::RB, 28, 82, 86, 77, 70, 70, false)
                .unwrap(),
        ];
        let boxscore = BoxScore::from_stats(
            &stats, &home_team, &away_team, &roster, &roster, 21, 10,
        );
        let rows = boxscore.player_lines(TeamSide::Home);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Back Two");
        assert_eq!(rows[0].line.rushing.yards(), 120);
        assert_eq!(boxscore.to_string(), "Ironbacks: 21, Monarchs: 10");
    }
}
