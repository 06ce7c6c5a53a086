#![doc = include_str!("../../docs/game/defense.md")]
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::game::clock::TWO_MINUTE_MARK;
use crate::game::formation::{FormationCall, OffensiveFormation};
use crate::game::state::GameState;
use crate::game::tables::PassDepth;
use crate::rng::ProvablyFairRng;
use crate::team::PlayStyle;

// Blitz appetite scaling against one-dimensional opponents
const BLITZ_VS_PASS_HEAVY: f64 = 1.3_f64;
const BLITZ_VS_RUN_HEAVY: f64 = 0.7_f64;

// Lead required before a defense sits back in prevent
const PREVENT_LEAD: i32 = 14;

/// # `DefensivePersonnel` enum
///
/// The defensive grouping on the field
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefensivePersonnel {
    Base43,
    Nickel,
    Dime,
    GoalLine,
    Prevent,
}

/// # `CoverageShell` enum
///
/// The secondary's coverage call
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageShell {
    Cover0,
    Cover1,
    Cover2,
    Cover3,
    Cover4,
    ManPress,
}

/// # `BlitzPackage` enum
///
/// The pressure call layered on the front
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlitzPackage {
    None,
    LinebackerBlitz,
    CornerBlitz,
    SafetyBlitz,
    AllOut,
}

/// # `DefensiveModifiers` struct
///
/// The composed modifier bundle a defensive call contributes to play
/// resolution. Multipliers compose multiplicatively across the three
/// stages; `extra_rushers` adds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefensiveModifiers {
    pub run_yard_multiplier: f64,
    pub completion_screen: f64,
    pub completion_short: f64,
    pub completion_medium: f64,
    pub completion_deep: f64,
    pub sack_rate_multiplier: f64,
    pub interception_multiplier: f64,
    pub extra_rushers: u32,
}

impl Default for DefensiveModifiers {
    fn default() -> Self {
        DefensiveModifiers {
            run_yard_multiplier: 1.0,
            completion_screen: 1.0,
            completion_short: 1.0,
            completion_medium: 1.0,
            completion_deep: 1.0,
            sack_rate_multiplier: 1.0,
            interception_multiplier: 1.0,
            extra_rushers: 0,
        }
    }
}

impl DefensiveModifiers {
    fn compose(mut self, other: DefensiveModifiers) -> DefensiveModifiers {
        self.run_yard_multiplier *= other.run_yard_multiplier;
        self.completion_screen *= other.completion_screen;
        self.completion_short *= other.completion_short;
        self.completion_medium *= other.completion_medium;
        self.completion_deep *= other.completion_deep;
        self.sack_rate_multiplier *= other.sack_rate_multiplier;
        self.interception_multiplier *= other.interception_multiplier;
        self.extra_rushers += other.extra_rushers;
        self
    }

    /// The completion multiplier for a throw depth
    pub fn completion_at(&self, depth: PassDepth) -> f64 {
        match depth {
            PassDepth::Screen => self.completion_screen,
            PassDepth::Short => self.completion_short,
            PassDepth::Medium => self.completion_medium,
            PassDepth::Deep => self.completion_deep,
        }
    }
}

/// # `DefensiveCall` struct
///
/// The defense's three-part answer to the offensive package
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DefensiveCall {
    pub personnel: DefensivePersonnel,
    pub coverage: CoverageShell,
    pub blitz: BlitzPackage,
}

impl DefensiveCall {
    fn personnel_modifiers(&self) -> DefensiveModifiers {
        match self.personnel {
            DefensivePersonnel::Base43 => DefensiveModifiers {
                run_yard_multiplier: 0.92,
                completion_short: 1.03,
                completion_medium: 1.02,
                ..DefensiveModifiers::default()
            },
            DefensivePersonnel::Nickel => DefensiveModifiers {
                run_yard_multiplier: 1.05,
                completion_short: 0.97,
                completion_medium: 0.97,
                ..DefensiveModifiers::default()
            },
            DefensivePersonnel::Dime => DefensiveModifiers {
                run_yard_multiplier: 1.15,
                completion_short: 0.95,
                completion_medium: 0.94,
                completion_deep: 0.93,
                sack_rate_multiplier: 0.9,
                ..DefensiveModifiers::default()
            },
            DefensivePersonnel::GoalLine => DefensiveModifiers {
                run_yard_multiplier: 0.8,
                completion_screen: 0.95,
                completion_short: 1.02,
                completion_deep: 1.1,
                sack_rate_multiplier: 1.05,
                ..DefensiveModifiers::default()
            },
            DefensivePersonnel::Prevent => DefensiveModifiers {
                run_yard_multiplier: 1.25,
                completion_screen: 1.1,
                completion_short: 1.12,
                completion_medium: 1.05,
                completion_deep: 0.8,
                sack_rate_multiplier: 0.7,
                ..DefensiveModifiers::default()
            },
        }
    }

    fn coverage_modifiers(&self) -> DefensiveModifiers {
        match self.coverage {
            CoverageShell::Cover0 => DefensiveModifiers {
                completion_short: 1.04,
                completion_medium: 1.05,
                completion_deep: 1.12,
                sack_rate_multiplier: 1.15,
                interception_multiplier: 0.9,
                ..DefensiveModifiers::default()
            },
            CoverageShell::Cover1 => DefensiveModifiers {
                completion_short: 1.0,
                completion_medium: 1.0,
                completion_deep: 1.02,
                sack_rate_multiplier: 1.05,
                ..DefensiveModifiers::default()
            },
            CoverageShell::Cover2 => DefensiveModifiers {
                completion_screen: 0.96,
                completion_short: 0.96,
                completion_medium: 1.0,
                completion_deep: 0.95,
                ..DefensiveModifiers::default()
            },
            CoverageShell::Cover3 => DefensiveModifiers {
                completion_short: 1.02,
                completion_medium: 0.96,
                completion_deep: 0.92,
                interception_multiplier: 1.05,
                ..DefensiveModifiers::default()
            },
            CoverageShell::Cover4 => DefensiveModifiers {
                completion_screen: 1.05,
                completion_short: 1.05,
                completion_medium: 0.94,
                completion_deep: 0.85,
                interception_multiplier: 1.1,
                ..DefensiveModifiers::default()
            },
            CoverageShell::ManPress => DefensiveModifiers {
                completion_screen: 0.93,
                completion_short: 0.94,
                completion_medium: 0.98,
                completion_deep: 1.04,
                interception_multiplier: 1.05,
                ..DefensiveModifiers::default()
            },
        }
    }

    fn blitz_modifiers(&self) -> DefensiveModifiers {
        match self.blitz {
            BlitzPackage::None => DefensiveModifiers::default(),
            BlitzPackage::LinebackerBlitz => DefensiveModifiers {
                run_yard_multiplier: 0.95,
                completion_short: 1.03,
                completion_medium: 1.04,
                sack_rate_multiplier: 1.35,
                extra_rushers: 1,
                ..DefensiveModifiers::default()
            },
            BlitzPackage::CornerBlitz => DefensiveModifiers {
                completion_short: 1.05,
                completion_deep: 1.08,
                sack_rate_multiplier: 1.3,
                interception_multiplier: 0.95,
                extra_rushers: 1,
                ..DefensiveModifiers::default()
            },
            BlitzPackage::SafetyBlitz => DefensiveModifiers {
                run_yard_multiplier: 0.93,
                completion_medium: 1.06,
                completion_deep: 1.1,
                sack_rate_multiplier: 1.4,
                extra_rushers: 1,
                ..DefensiveModifiers::default()
            },
            BlitzPackage::AllOut => DefensiveModifiers {
                run_yard_multiplier: 0.88,
                completion_short: 1.08,
                completion_medium: 1.1,
                completion_deep: 1.15,
                sack_rate_multiplier: 1.6,
                interception_multiplier: 0.9,
                extra_rushers: 2,
                ..DefensiveModifiers::default()
            },
        }
    }

    /// Compose the full modifier bundle for this call
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::defense::{
    ///     BlitzPackage, CoverageShell, DefensiveCall, DefensivePersonnel,
    /// };
    ///
    /// let call = DefensiveCall {
    ///     personnel: DefensivePersonnel::Nickel,
    ///     coverage: CoverageShell::Cover2,
    ///     blitz: BlitzPackage::None,
    /// };
    /// let bundle = call.modifiers();
    /// assert!(bundle.run_yard_multiplier > 1.0);
    /// ```
    pub fn modifiers(&self) -> DefensiveModifiers {
        self.personnel_modifiers()
            .compose(self.coverage_modifiers())
            .compose(self.blitz_modifiers())
    }
}

/// # `DefensiveCallSimulator` struct
///
/// Produces a `DefensiveCall` in three weighted-choice stages: personnel,
/// coverage, blitz.
///
/// Draw order: personnel (one draw unless prevent is forced), coverage
/// (one draw unless prevent forces cover 4), blitz (one draw unless the
/// personnel disables pressure).
#[derive(Clone, Debug, Default)]
pub struct DefensiveCallSimulator {}

impl DefensiveCallSimulator {
    /// Initialize a new defensive call simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::defense::DefensiveCallSimulator;
    ///
    /// let my_sim = DefensiveCallSimulator::new();
    /// ```
    pub fn new() -> DefensiveCallSimulator {
        DefensiveCallSimulator::default()
    }

    fn is_passing_down(&self, state: &GameState) -> bool {
        (state.down() == 3 && state.yards_to_go() >= 6)
            || (state.down() == 2 && state.yards_to_go() >= 8)
            || state.down() == 4
    }

    fn defense_leads_big_late(&self, state: &GameState) -> bool {
        // The defense's margin is the negation of the offense's
        -state.possession_margin() >= PREVENT_LEAD && state.clock() < TWO_MINUTE_MARK
    }

    fn personnel(
        &self,
        state: &GameState,
        formation: &FormationCall,
        rng: &mut ProvablyFairRng,
    ) -> Result<DefensivePersonnel, SimulationError> {
        if self.defense_leads_big_late(state) {
            return Ok(DefensivePersonnel::Prevent);
        }
        let options: Vec<(DefensivePersonnel, f64)> = match formation.formation {
            OffensiveFormation::Spread | OffensiveFormation::Empty => vec![
                (DefensivePersonnel::Nickel, 55.0),
                (DefensivePersonnel::Dime, 45.0),
            ],
            OffensiveFormation::GoalLine => vec![
                (DefensivePersonnel::GoalLine, 70.0),
                (DefensivePersonnel::Base43, 30.0),
            ],
            OffensiveFormation::Shotgun if self.is_passing_down(state) => vec![
                (DefensivePersonnel::Nickel, 50.0),
                (DefensivePersonnel::Dime, 50.0),
            ],
            _ => match (state.down(), state.yards_to_go()) {
                (1, _) => vec![
                    (DefensivePersonnel::Base43, 60.0),
                    (DefensivePersonnel::Nickel, 40.0),
                ],
                (2, d) if d <= 3 => vec![
                    (DefensivePersonnel::Base43, 70.0),
                    (DefensivePersonnel::Nickel, 30.0),
                ],
                (_, d) if d <= 2 => vec![
                    (DefensivePersonnel::Base43, 55.0),
                    (DefensivePersonnel::GoalLine, 25.0),
                    (DefensivePersonnel::Nickel, 20.0),
                ],
                _ => vec![
                    (DefensivePersonnel::Nickel, 55.0),
                    (DefensivePersonnel::Base43, 25.0),
                    (DefensivePersonnel::Dime, 20.0),
                ],
            },
        };
        Ok(*rng.weighted_choice(&options)?)
    }

    fn coverage(
        &self,
        state: &GameState,
        personnel: DefensivePersonnel,
        rng: &mut ProvablyFairRng,
    ) -> Result<CoverageShell, SimulationError> {
        if personnel == DefensivePersonnel::Prevent {
            return Ok(CoverageShell::Cover4);
        }
        let options: Vec<(CoverageShell, f64)> = match personnel {
            DefensivePersonnel::GoalLine => vec![
                (CoverageShell::Cover1, 40.0),
                (CoverageShell::Cover0, 35.0),
                (CoverageShell::ManPress, 25.0),
            ],
            _ if self.is_passing_down(state) => vec![
                (CoverageShell::Cover3, 25.0),
                (CoverageShell::Cover4, 20.0),
                (CoverageShell::Cover2, 20.0),
                (CoverageShell::ManPress, 15.0),
                (CoverageShell::Cover1, 15.0),
                (CoverageShell::Cover0, 5.0),
            ],
            _ => vec![
                (CoverageShell::Cover3, 30.0),
                (CoverageShell::Cover1, 25.0),
                (CoverageShell::Cover2, 25.0),
                (CoverageShell::ManPress, 10.0),
                (CoverageShell::Cover4, 10.0),
            ],
        };
        Ok(*rng.weighted_choice(&options)?)
    }

    fn blitz(
        &self,
        state: &GameState,
        personnel: DefensivePersonnel,
        opponent_style: PlayStyle,
        rng: &mut ProvablyFairRng,
    ) -> Result<BlitzPackage, SimulationError> {
        if matches!(
            personnel,
            DefensivePersonnel::Prevent | DefensivePersonnel::Dime
        ) {
            return Ok(BlitzPackage::None);
        }
        let mut options: Vec<(BlitzPackage, f64)> =
            if state.down() == 3 && state.yards_to_go() >= 6 {
                vec![
                    (BlitzPackage::None, 45.0),
                    (BlitzPackage::LinebackerBlitz, 25.0),
                    (BlitzPackage::CornerBlitz, 12.0),
                    (BlitzPackage::SafetyBlitz, 12.0),
                    (BlitzPackage::AllOut, 6.0),
                ]
            } else if state.down() <= 2 {
                vec![
                    (BlitzPackage::None, 70.0),
                    (BlitzPackage::LinebackerBlitz, 18.0),
                    (BlitzPackage::CornerBlitz, 6.0),
                    (BlitzPackage::SafetyBlitz, 6.0),
                ]
            } else {
                vec![
                    (BlitzPackage::None, 55.0),
                    (BlitzPackage::LinebackerBlitz, 25.0),
                    (BlitzPackage::CornerBlitz, 10.0),
                    (BlitzPackage::SafetyBlitz, 10.0),
                ]
            };
        let style_factor = match opponent_style {
            PlayStyle::PassHeavy => BLITZ_VS_PASS_HEAVY,
            PlayStyle::RunHeavy => BLITZ_VS_RUN_HEAVY,
            _ => 1.0,
        };
        for (package, weight) in options.iter_mut() {
            if *package != BlitzPackage::None {
                *weight *= style_factor;
            }
        }
        Ok(*rng.weighted_choice(&options)?)
    }

    /// Select the defense's answer to an offensive package
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::defense::DefensiveCallSimulator;
    /// use gridiron_core::game::formation::FormationSimulator;
    /// use gridiron_core::game::play::call::PlayCall;
    /// use gridiron_core::game::state::GameState;
    /// use gridiron_core::rng::ProvablyFairRng;
    /// use gridiron_core::team::PlayStyle;
    ///
    /// let state = GameState::new();
    /// let mut rng = ProvablyFairRng::new("server", "client").unwrap();
    /// let package = FormationSimulator::new()
    ///     .sim(PlayCall::PassShort, &state, &mut rng)
    ///     .unwrap();
    /// let call = DefensiveCallSimulator::new()
    ///     .sim(&state, &package, PlayStyle::Balanced, &mut rng)
    ///     .unwrap();
    /// ```
    pub fn sim(
        &self,
        state: &GameState,
        formation: &FormationCall,
        opponent_style: PlayStyle,
        rng: &mut ProvablyFairRng,
    ) -> Result<DefensiveCall, SimulationError> {
        let personnel = self.personnel(state, formation, rng)?;
        let coverage = self.coverage(state, personnel, rng)?;
        let blitz = self.blitz(state, personnel, opponent_style, rng)?;
        Ok(DefensiveCall {
            personnel,
            coverage,
            blitz,
        })
    }
}
