#![doc = include_str!("../../../docs/game/play/call.md")]
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::game::state::{GameState, Quarter};
use crate::game::tables::PassDepth;
use crate::rng::ProvablyFairRng;
use crate::team::PlayStyle;

// Onside-kick odds by desperation tier
const P_ONSIDE_DOWN_TWO_SCORES: f64 = 0.30_f64;
const P_ONSIDE_LAST_TWO_MINUTES: f64 = 0.50_f64;

// Two-point decision odds
const P_TWO_POINT_RANDOM: f64 = 0.08_f64;
const P_TWO_POINT_PASS_DOWN_TWO: f64 = 0.60_f64;
const P_TWO_POINT_PASS_DOWN_FIVE: f64 = 0.55_f64;
const P_TWO_POINT_PASS_RANDOM: f64 = 0.55_f64;

// Seconds a victory-formation kneel burns off the clock
const KNEEL_SECONDS: u32 = 40;

// Field-position thresholds for fourth-down decisions
const FIELD_GOAL_RANGE: u32 = 63;
const NO_MANS_LAND_NEAR: u32 = 40;
const NO_MANS_LAND_FAR: u32 = 62;

// Run/pass shift applied for a team's play style before renormalising
const STYLE_SHIFT_STRONG: f64 = 0.10_f64;
const STYLE_SHIFT_MILD: f64 = 0.05_f64;

// Share of the run weight that goes inside, and the slice of short-pass
// weight carved off for screens
const RUN_INSIDE_SHARE: f64 = 0.55_f64;
const SCREEN_CARVE: f64 = 0.12_f64;

/// # `PlayCall` enum
///
/// The intended play, as chosen by the offense before the snap
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCall {
    RunInside,
    RunOutside,
    PassShort,
    PassMedium,
    PassDeep,
    ScreenPass,
    Punt,
    FieldGoal,
    ExtraPoint,
    TwoPointRun,
    TwoPointPass,
    Kneel,
    Spike,
    KickoffNormal,
    OnsideKick,
}

impl PlayCall {
    /// Get whether this call puts the ball in the air
    pub fn is_pass(&self) -> bool {
        matches!(
            self,
            PlayCall::PassShort
                | PlayCall::PassMedium
                | PlayCall::PassDeep
                | PlayCall::ScreenPass
                | PlayCall::TwoPointPass
        )
    }

    /// Get whether this call is a designed run
    pub fn is_run(&self) -> bool {
        matches!(
            self,
            PlayCall::RunInside | PlayCall::RunOutside | PlayCall::TwoPointRun
        )
    }

    /// Get whether this call is a special-teams play
    pub fn is_special_teams(&self) -> bool {
        matches!(
            self,
            PlayCall::Punt
                | PlayCall::FieldGoal
                | PlayCall::ExtraPoint
                | PlayCall::KickoffNormal
                | PlayCall::OnsideKick
        )
    }

    /// Get whether this call is a two-point try
    pub fn is_two_point(&self) -> bool {
        matches!(self, PlayCall::TwoPointRun | PlayCall::TwoPointPass)
    }

    /// Get the throw depth for a pass call
    pub fn pass_depth(&self) -> Option<PassDepth> {
        match self {
            PlayCall::ScreenPass => Some(PassDepth::Screen),
            PlayCall::PassShort | PlayCall::TwoPointPass => Some(PassDepth::Short),
            PlayCall::PassMedium => Some(PassDepth::Medium),
            PlayCall::PassDeep => Some(PassDepth::Deep),
            _ => None,
        }
    }
}

/// # `DistanceCategory` enum
///
/// The yards-to-go bucket the base play-call tables are keyed by
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DistanceCategory {
    Short,
    Medium,
    Long,
}

impl DistanceCategory {
    /// Bucket a yards-to-go figure
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::call::DistanceCategory;
    ///
    /// assert!(DistanceCategory::from_distance(2) == DistanceCategory::Short);
    /// assert!(DistanceCategory::from_distance(5) == DistanceCategory::Medium);
    /// assert!(DistanceCategory::from_distance(12) == DistanceCategory::Long);
    /// ```
    pub fn from_distance(yards_to_go: u32) -> DistanceCategory {
        match yards_to_go {
            0..=3 => DistanceCategory::Short,
            4..=7 => DistanceCategory::Medium,
            _ => DistanceCategory::Long,
        }
    }
}

/// # `PlayCallSimulator` struct
///
/// Selects a `PlayCall` from the game situation through a strict priority
/// cascade: kickoff, try, kneel, spike, fourth down, two-minute drill,
/// protect-lead, red zone, then the down-and-distance base tables.
#[derive(Clone, Debug, Default)]
pub struct PlayCallSimulator {}

impl PlayCallSimulator {
    /// Initialize a new play call simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::call::PlayCallSimulator;
    ///
    /// let my_sim = PlayCallSimulator::new();
    /// ```
    pub fn new() -> PlayCallSimulator {
        PlayCallSimulator::default()
    }

    /// Generate the kickoff call, weighing an onside attempt by desperation
    fn kickoff_call(&self, state: &GameState, rng: &mut ProvablyFairRng) -> PlayCall {
        let margin = state.possession_margin();
        let fourth = state.quarter() == Quarter::Fourth;
        if fourth && margin <= -10 && state.clock() < 300 {
            if rng.probability(P_ONSIDE_DOWN_TWO_SCORES) {
                return PlayCall::OnsideKick;
            }
        } else if fourth && margin < 0 && state.clock() < 120 {
            if rng.probability(P_ONSIDE_LAST_TWO_MINUTES) {
                return PlayCall::OnsideKick;
            }
        }
        PlayCall::KickoffNormal
    }

    /// Generate the try call after a touchdown
    fn try_call(&self, state: &GameState, rng: &mut ProvablyFairRng) -> PlayCall {
        let margin = state.possession_margin();
        let fourth = state.quarter() == Quarter::Fourth;
        if fourth && margin == -2 {
            return if rng.probability(P_TWO_POINT_PASS_DOWN_TWO) {
                PlayCall::TwoPointPass
            } else {
                PlayCall::TwoPointRun
            };
        }
        if fourth && margin == -5 {
            return if rng.probability(P_TWO_POINT_PASS_DOWN_FIVE) {
                PlayCall::TwoPointPass
            } else {
                PlayCall::TwoPointRun
            };
        }
        if rng.probability(P_TWO_POINT_RANDOM) {
            return if rng.probability(P_TWO_POINT_PASS_RANDOM) {
                PlayCall::TwoPointPass
            } else {
                PlayCall::TwoPointRun
            };
        }
        PlayCall::ExtraPoint
    }

    /// Whether the offense can run the clock out from victory formation
    fn can_kneel_out(&self, state: &GameState) -> bool {
        let margin = state.possession_margin();
        if state.quarter() != Quarter::Fourth
            || !(1..=8).contains(&margin)
            || state.clock() >= 120
        {
            return false;
        }
        // Kneel through third down; the defense recovers a snap per timeout
        let kneels = 4_u32.saturating_sub(state.down());
        let opponent_timeouts = state.timeouts_of(state.possession().opponent());
        let burnable = kneels.saturating_sub(opponent_timeouts) * KNEEL_SECONDS;
        burnable >= state.clock()
    }

    /// Whether a spike to stop the clock is warranted
    fn should_spike(&self, state: &GameState) -> bool {
        state.clock() <= 40
            && state.quarter().is_half_end()
            && state.possession_margin() <= 0
            && state.is_clock_running()
    }

    /// Generate the go-for-it call on a kept fourth down
    fn go_for_it_call(
        &self,
        state: &GameState,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayCall, SimulationError> {
        let options: Vec<(PlayCall, f64)> = if state.yards_to_go() <= 1 {
            vec![(PlayCall::RunInside, 70.0), (PlayCall::PassShort, 30.0)]
        } else if state.yards_to_go() <= 3 {
            vec![
                (PlayCall::RunInside, 35.0),
                (PlayCall::RunOutside, 20.0),
                (PlayCall::PassShort, 30.0),
                (PlayCall::PassMedium, 15.0),
            ]
        } else {
            vec![
                (PlayCall::PassShort, 35.0),
                (PlayCall::PassMedium, 35.0),
                (PlayCall::PassDeep, 20.0),
                (PlayCall::ScreenPass, 10.0),
            ]
        };
        Ok(*rng.weighted_choice(&options)?)
    }

    /// Generate the fourth-down call
    fn fourth_down_call(
        &self,
        state: &GameState,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayCall, SimulationError> {
        let margin = state.possession_margin();
        let desperate =
            state.quarter() == Quarter::Fourth && state.clock() < 300 && margin < 0;

        // Short past midfield is a conversion attempt
        if state.yards_to_go() <= 2 && state.ball_position() > 50 {
            return self.go_for_it_call(state, rng);
        }

        // In range, take the points unless the scoreboard demands more
        if state.ball_position() >= FIELD_GOAL_RANGE {
            if desperate && margin <= -4 && state.yards_to_go() <= 5 {
                return self.go_for_it_call(state, rng);
            }
            return Ok(PlayCall::FieldGoal);
        }

        // Desperate late: keep the ball on makeable distance or from the
        // no-man's-land stretch where neither kick is attractive
        if desperate
            && (state.yards_to_go() <= 5
                || (NO_MANS_LAND_NEAR..=NO_MANS_LAND_FAR).contains(&state.ball_position()))
        {
            return self.go_for_it_call(state, rng);
        }

        Ok(PlayCall::Punt)
    }

    /// The two-minute-drill distribution
    fn two_minute_options(&self) -> Vec<(PlayCall, f64)> {
        vec![
            (PlayCall::PassShort, 35.0),
            (PlayCall::PassMedium, 30.0),
            (PlayCall::PassDeep, 15.0),
            (PlayCall::ScreenPass, 8.0),
            (PlayCall::RunOutside, 7.0),
            (PlayCall::RunInside, 5.0),
        ]
    }

    /// The protect-lead distribution
    fn protect_lead_options(&self) -> Vec<(PlayCall, f64)> {
        vec![
            (PlayCall::RunInside, 45.0),
            (PlayCall::RunOutside, 30.0),
            (PlayCall::PassShort, 15.0),
            (PlayCall::ScreenPass, 5.0),
            (PlayCall::PassMedium, 5.0),
        ]
    }

    /// The goal-line distribution (ball at the 5 or closer)
    fn goal_line_options(&self) -> Vec<(PlayCall, f64)> {
        vec![
            (PlayCall::RunInside, 45.0),
            (PlayCall::RunOutside, 15.0),
            (PlayCall::PassShort, 25.0),
            (PlayCall::PassMedium, 10.0),
            (PlayCall::ScreenPass, 5.0),
        ]
    }

    /// The red-zone distribution (ball at the 20 or closer)
    fn red_zone_options(&self) -> Vec<(PlayCall, f64)> {
        vec![
            (PlayCall::RunInside, 25.0),
            (PlayCall::RunOutside, 15.0),
            (PlayCall::PassShort, 25.0),
            (PlayCall::PassMedium, 20.0),
            (PlayCall::ScreenPass, 8.0),
            (PlayCall::PassDeep, 7.0),
        ]
    }

    /// Base run/pass weights keyed by down and distance bucket, as
    /// `(run, pass_short, pass_medium, pass_deep)`
    fn base_weights(&self, down: u32, category: DistanceCategory) -> (f64, f64, f64, f64) {
        match (down, category) {
            (1, DistanceCategory::Short) => (0.55, 0.20, 0.15, 0.10),
            (1, DistanceCategory::Medium) => (0.50, 0.22, 0.18, 0.10),
            (1, DistanceCategory::Long) => (0.45, 0.25, 0.20, 0.10),
            (2, DistanceCategory::Short) => (0.60, 0.22, 0.12, 0.06),
            (2, DistanceCategory::Medium) => (0.45, 0.27, 0.18, 0.10),
            (2, DistanceCategory::Long) => (0.30, 0.30, 0.25, 0.15),
            (3, DistanceCategory::Short) => (0.55, 0.30, 0.10, 0.05),
            (3, DistanceCategory::Medium) => (0.20, 0.40, 0.28, 0.12),
            (3, DistanceCategory::Long) => (0.08, 0.30, 0.38, 0.24),
            (_, DistanceCategory::Short) => (0.55, 0.30, 0.10, 0.05),
            (_, DistanceCategory::Medium) => (0.30, 0.35, 0.23, 0.12),
            (_, DistanceCategory::Long) => (0.10, 0.32, 0.36, 0.22),
        }
    }

    /// Generate the everyday call from the base tables
    fn standard_call(
        &self,
        state: &GameState,
        style: PlayStyle,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayCall, SimulationError> {
        let category = DistanceCategory::from_distance(state.yards_to_go());
        let (mut run, short, medium, deep) = self.base_weights(state.down(), category);

        // Shift run weight for the team's identity, shrinking the pass
        // weights proportionally, then renormalise
        let shift = match style {
            PlayStyle::RunHeavy => STYLE_SHIFT_STRONG,
            PlayStyle::PassHeavy => -STYLE_SHIFT_STRONG,
            PlayStyle::Conservative => STYLE_SHIFT_MILD,
            PlayStyle::Aggressive => -STYLE_SHIFT_MILD,
            PlayStyle::Balanced => 0.0,
        };
        run = (run + shift).clamp(0.02, 0.95);
        let pass_total = short + medium + deep;
        let pass_scale = (1.0 - run) / pass_total;
        let (short, medium, deep) = (
            short * pass_scale,
            medium * pass_scale,
            deep * pass_scale,
        );

        // Split the run weight inside/outside and carve screens off the
        // short-pass weight
        let screen = short * SCREEN_CARVE;
        let options: Vec<(PlayCall, f64)> = vec![
            (PlayCall::RunInside, run * RUN_INSIDE_SHARE),
            (PlayCall::RunOutside, run * (1.0 - RUN_INSIDE_SHARE)),
            (PlayCall::PassShort, short - screen),
            (PlayCall::ScreenPass, screen),
            (PlayCall::PassMedium, medium),
            (PlayCall::PassDeep, deep),
        ];
        Ok(*rng.weighted_choice(&options)?)
    }

    /// Select the play call for the current situation
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::play::call::PlayCallSimulator;
    /// use gridiron_core::game::state::GameState;
    /// use gridiron_core::rng::ProvablyFairRng;
    /// use gridiron_core::team::PlayStyle;
    ///
    /// let my_sim = PlayCallSimulator::new();
    /// let state = GameState::new();
    /// let mut rng = ProvablyFairRng::new("server", "client").unwrap();
    /// let call = my_sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap();
    /// ```
    pub fn sim(
        &self,
        state: &GameState,
        style: PlayStyle,
        rng: &mut ProvablyFairRng,
    ) -> Result<PlayCall, SimulationError> {
        if state.kickoff() {
            return Ok(self.kickoff_call(state, rng));
        }
        if state.pat_attempt() {
            return Ok(self.try_call(state, rng));
        }
        if self.can_kneel_out(state) {
            return Ok(PlayCall::Kneel);
        }
        if self.should_spike(state) {
            return Ok(PlayCall::Spike);
        }
        if state.down() == 4 {
            return self.fourth_down_call(state, rng);
        }
        if state.quarter().is_half_end()
            && state.clock() <= 120
            && state.possession_margin() <= 0
        {
            return Ok(*rng.weighted_choice(&self.two_minute_options())?);
        }
        if state.quarter() == Quarter::Fourth
            && state.possession_margin() >= 10
            && state.clock() < 300
        {
            return Ok(*rng.weighted_choice(&self.protect_lead_options())?);
        }
        if state.ball_position() >= 95 {
            return Ok(*rng.weighted_choice(&self.goal_line_options())?);
        }
        if state.ball_position() >= 80 {
            return Ok(*rng.weighted_choice(&self.red_zone_options())?);
        }
        self.standard_call(state, style, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::TeamSide;

    fn rng() -> ProvablyFairRng {
        ProvablyFairRng::new("server", "client").unwrap()
    }

    #[test]
    fn test_kickoff_state_returns_kick() {
        let sim = PlayCallSimulator::new();
        let state = GameState::new();
        let mut rng = rng();
        assert_eq!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::KickoffNormal
        );
    }

    #[test]
    fn test_onside_only_when_desperate() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Fourth;
        state.clock = 90;
        state.home_score = 10;
        state.away_score = 24;
        state.possession = TeamSide::Home;
        let mut rng = rng();
        let mut onside = 0;
        for _ in 0..64 {
            if sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap() == PlayCall::OnsideKick {
                onside += 1;
            }
        }
        // Down two scores late the onside rate is 30%
        assert!(onside > 5 && onside < 40);
    }

    #[test]
    fn test_trailing_by_two_goes_for_two() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.quarter = Quarter::Fourth;
        state.kickoff = false;
        state.pat_attempt = true;
        state.home_score = 18;
        state.away_score = 20;
        state.possession = TeamSide::Home;
        let mut rng = rng();
        for _ in 0..16 {
            let call = sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap();
            assert!(call.is_two_point());
        }
    }

    #[test]
    fn test_comfortable_lead_kicks_the_extra_point() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.pat_attempt = true;
        state.home_score = 27;
        state.away_score = 3;
        state.possession = TeamSide::Home;
        let mut rng = rng();
        let mut extra_points = 0;
        for _ in 0..64 {
            if sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap() == PlayCall::ExtraPoint {
                extra_points += 1;
            }
        }
        // Only the 8% random-aggression branch goes for two here
        assert!(extra_points > 48);
    }

    #[test]
    fn test_victory_formation() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.quarter = Quarter::Fourth;
        state.clock = 70;
        state.down = 1;
        state.home_score = 24;
        state.away_score = 20;
        state.possession = TeamSide::Home;
        state.away_timeouts = 0;
        let mut rng = rng();
        assert_eq!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::Kneel
        );

        // Opponent timeouts erase the kneel-out margin
        state.away_timeouts = 3;
        assert_ne!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::Kneel
        );
    }

    #[test]
    fn test_spike_requires_running_clock() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.quarter = Quarter::Fourth;
        state.clock = 30;
        state.home_score = 17;
        state.away_score = 20;
        state.possession = TeamSide::Home;
        state.is_clock_running = true;
        let mut rng = rng();
        assert_eq!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::Spike
        );
        state.is_clock_running = false;
        assert_ne!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::Spike
        );
    }

    #[test]
    fn test_fourth_and_long_punts_from_own_territory() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.quarter = Quarter::Second;
        state.down = 4;
        state.yards_to_go = 9;
        state.ball_position = 35;
        state.home_score = 7;
        state.away_score = 0;
        state.possession = TeamSide::Home;
        let mut rng = rng();
        assert_eq!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::Punt
        );
    }

    #[test]
    fn test_fourth_down_desperation_goes_for_it() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.quarter = Quarter::Fourth;
        state.clock = 50;
        state.down = 4;
        state.yards_to_go = 4;
        state.ball_position = 45;
        state.home_score = 7;
        state.away_score = 21;
        state.possession = TeamSide::Home;
        let mut rng = rng();
        let call = sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap();
        assert!(!matches!(call, PlayCall::Punt | PlayCall::FieldGoal));
    }

    #[test]
    fn test_fourth_down_in_range_kicks() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.down = 4;
        state.yards_to_go = 8;
        state.ball_position = 70;
        let mut rng = rng();
        assert_eq!(
            sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap(),
            PlayCall::FieldGoal
        );
    }

    #[test]
    fn test_run_heavy_style_runs_more() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 50;
        let mut rng_a = ProvablyFairRng::new("server", "style-a").unwrap();
        let mut rng_b = ProvablyFairRng::new("server", "style-a").unwrap();
        let mut run_heavy = 0;
        let mut pass_heavy = 0;
        for _ in 0..300 {
            if sim.sim(&state, PlayStyle::RunHeavy, &mut rng_a).unwrap().is_run() {
                run_heavy += 1;
            }
            if sim.sim(&state, PlayStyle::PassHeavy, &mut rng_b).unwrap().is_run() {
                pass_heavy += 1;
            }
        }
        assert!(run_heavy > pass_heavy);
    }

    #[test]
    fn test_goal_line_menu_has_no_deep_shot() {
        let sim = PlayCallSimulator::new();
        let mut state = GameState::new();
        state.kickoff = false;
        state.ball_position = 96;
        state.yards_to_go = 4;
        let mut rng = rng();
        for _ in 0..64 {
            let call = sim.sim(&state, PlayStyle::Balanced, &mut rng).unwrap();
            assert_ne!(call, PlayCall::PassDeep);
        }
    }
}
