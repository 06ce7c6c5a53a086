#![doc = include_str!("../../docs/game/formation.md")]
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::game::play::call::PlayCall;
use crate::game::state::GameState;
use crate::rng::ProvablyFairRng;

/// # `OffensiveFormation` enum
///
/// The base offensive alignments the simulator models
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffensiveFormation {
    IForm,
    Singleback,
    Shotgun,
    Pistol,
    Spread,
    Empty,
    GoalLine,
}

/// # `PersonnelGroup` enum
///
/// The skill-position grouping on the field, named by the customary
/// RB/TE digit pair
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonnelGroup {
    Posse11,
    Ace12,
    Pro21,
    Heavy22,
    Spread10,
    Jumbo23,
}

/// # `FormationVariant` enum
///
/// An optional pre-snap wrinkle layered over the base formation
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationVariant {
    None,
    TripsRight,
    Bunch,
    JetMotion,
    PlayAction,
}

/// # `OffensiveModifiers` struct
///
/// The modifier bundle a formation (plus variant overlay) contributes to
/// play resolution. Multipliers compose multiplicatively; `run_yard_bonus`
/// and `quick_release_bonus` are additive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffensiveModifiers {
    pub run_yard_bonus: f64,
    pub completion_multiplier: f64,
    pub play_action_multiplier: f64,
    pub screen_multiplier: f64,
    pub deep_pass_multiplier: f64,
    pub quick_release_bonus: f64,
    pub sack_rate_multiplier: f64,
    pub scramble_multiplier: f64,
}

impl Default for OffensiveModifiers {
    fn default() -> Self {
        OffensiveModifiers {
            run_yard_bonus: 0.0,
            completion_multiplier: 1.0,
            play_action_multiplier: 1.0,
            screen_multiplier: 1.0,
            deep_pass_multiplier: 1.0,
            quick_release_bonus: 0.0,
            sack_rate_multiplier: 1.0,
            scramble_multiplier: 1.0,
        }
    }
}

impl OffensiveModifiers {
    fn overlay(mut self, variant: FormationVariant) -> OffensiveModifiers {
        match variant {
            FormationVariant::None => {}
            FormationVariant::TripsRight => {
                self.completion_multiplier *= 1.04;
                self.deep_pass_multiplier *= 1.05;
                self.run_yard_bonus -= 0.2;
            }
            FormationVariant::Bunch => {
                self.completion_multiplier *= 1.05;
                self.screen_multiplier *= 1.08;
                self.quick_release_bonus += 0.01;
            }
            FormationVariant::JetMotion => {
                self.run_yard_bonus += 0.4;
                self.scramble_multiplier *= 1.1;
            }
            FormationVariant::PlayAction => {
                self.play_action_multiplier *= 1.12;
                self.sack_rate_multiplier *= 1.1;
            }
        }
        self
    }
}

/// # `FormationCall` struct
///
/// The offense's pre-snap package: base formation, personnel grouping,
/// and variant overlay
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormationCall {
    pub formation: OffensiveFormation,
    pub personnel: PersonnelGroup,
    pub variant: FormationVariant,
}

impl FormationCall {
    /// Compose the modifier bundle for this package
    pub fn modifiers(&self) -> OffensiveModifiers {
        let base = match self.formation {
            OffensiveFormation::IForm => OffensiveModifiers {
                run_yard_bonus: 0.5,
                play_action_multiplier: 1.06,
                deep_pass_multiplier: 0.95,
                sack_rate_multiplier: 1.05,
                scramble_multiplier: 0.85,
                ..OffensiveModifiers::default()
            },
            OffensiveFormation::Singleback => OffensiveModifiers {
                run_yard_bonus: 0.2,
                play_action_multiplier: 1.03,
                ..OffensiveModifiers::default()
            },
            OffensiveFormation::Shotgun => OffensiveModifiers {
                run_yard_bonus: -0.3,
                completion_multiplier: 1.03,
                quick_release_bonus: 0.012,
                sack_rate_multiplier: 0.92,
                scramble_multiplier: 1.2,
                ..OffensiveModifiers::default()
            },
            OffensiveFormation::Pistol => OffensiveModifiers {
                run_yard_bonus: 0.1,
                completion_multiplier: 1.01,
                scramble_multiplier: 1.1,
                ..OffensiveModifiers::default()
            },
            OffensiveFormation::Spread => OffensiveModifiers {
                run_yard_bonus: -0.4,
                completion_multiplier: 1.04,
                screen_multiplier: 1.06,
                deep_pass_multiplier: 1.06,
                quick_release_bonus: 0.008,
                sack_rate_multiplier: 0.95,
                scramble_multiplier: 1.15,
                ..OffensiveModifiers::default()
            },
            OffensiveFormation::Empty => OffensiveModifiers {
                run_yard_bonus: -1.0,
                completion_multiplier: 1.05,
                deep_pass_multiplier: 1.08,
                quick_release_bonus: 0.015,
                sack_rate_multiplier: 1.12,
                scramble_multiplier: 1.25,
                ..OffensiveModifiers::default()
            },
            OffensiveFormation::GoalLine => OffensiveModifiers {
                run_yard_bonus: 0.8,
                completion_multiplier: 0.94,
                play_action_multiplier: 1.1,
                deep_pass_multiplier: 0.8,
                sack_rate_multiplier: 1.08,
                scramble_multiplier: 0.8,
                ..OffensiveModifiers::default()
            },
        };
        base.overlay(self.variant)
    }

    /// Whether the quarterback starts the play off the line of scrimmage,
    /// which is what makes a run-pass option viable
    pub fn supports_rpo(&self) -> bool {
        matches!(
            self.formation,
            OffensiveFormation::Shotgun | OffensiveFormation::Pistol
        )
    }
}

/// # `FormationSimulator` struct
///
/// Selects the offensive package for a play call and situation via
/// weighted choice.
///
/// Draw order: base formation (one draw), then variant overlay (one draw).
#[derive(Clone, Debug, Default)]
pub struct FormationSimulator {}

impl FormationSimulator {
    /// Initialize a new formation simulator
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::formation::FormationSimulator;
    ///
    /// let my_sim = FormationSimulator::new();
    /// ```
    pub fn new() -> FormationSimulator {
        FormationSimulator::default()
    }

    fn formation_weights(
        &self,
        call: PlayCall,
        state: &GameState,
    ) -> Vec<((OffensiveFormation, PersonnelGroup), f64)> {
        // Goal-line football collapses the menu
        if state.ball_position() >= 95 {
            return vec![
                ((OffensiveFormation::GoalLine, PersonnelGroup::Jumbo23), 55.0),
                ((OffensiveFormation::IForm, PersonnelGroup::Heavy22), 30.0),
                ((OffensiveFormation::Singleback, PersonnelGroup::Ace12), 15.0),
            ];
        }
        match call {
            PlayCall::RunInside => vec![
                ((OffensiveFormation::IForm, PersonnelGroup::Pro21), 30.0),
                ((OffensiveFormation::Singleback, PersonnelGroup::Ace12), 30.0),
                ((OffensiveFormation::Pistol, PersonnelGroup::Posse11), 20.0),
                ((OffensiveFormation::Shotgun, PersonnelGroup::Posse11), 20.0),
            ],
            PlayCall::RunOutside => vec![
                ((OffensiveFormation::Singleback, PersonnelGroup::Posse11), 35.0),
                ((OffensiveFormation::Pistol, PersonnelGroup::Posse11), 25.0),
                ((OffensiveFormation::IForm, PersonnelGroup::Pro21), 20.0),
                ((OffensiveFormation::Shotgun, PersonnelGroup::Spread10), 20.0),
            ],
            PlayCall::PassShort | PlayCall::ScreenPass => vec![
                ((OffensiveFormation::Shotgun, PersonnelGroup::Posse11), 40.0),
                ((OffensiveFormation::Singleback, PersonnelGroup::Posse11), 25.0),
                ((OffensiveFormation::Spread, PersonnelGroup::Spread10), 20.0),
                ((OffensiveFormation::Pistol, PersonnelGroup::Ace12), 15.0),
            ],
            PlayCall::PassMedium => vec![
                ((OffensiveFormation::Shotgun, PersonnelGroup::Posse11), 40.0),
                ((OffensiveFormation::Spread, PersonnelGroup::Spread10), 25.0),
                ((OffensiveFormation::Singleback, PersonnelGroup::Ace12), 20.0),
                ((OffensiveFormation::Empty, PersonnelGroup::Spread10), 15.0),
            ],
            PlayCall::PassDeep => vec![
                ((OffensiveFormation::Shotgun, PersonnelGroup::Posse11), 35.0),
                ((OffensiveFormation::Spread, PersonnelGroup::Spread10), 30.0),
                ((OffensiveFormation::Empty, PersonnelGroup::Spread10), 20.0),
                ((OffensiveFormation::Singleback, PersonnelGroup::Posse11), 15.0),
            ],
            // Kneels, spikes, and kicks do not meaningfully vary by package
            _ => vec![
                ((OffensiveFormation::Singleback, PersonnelGroup::Posse11), 100.0),
            ],
        }
    }

    fn variant_weights(&self, call: PlayCall) -> Vec<(FormationVariant, f64)> {
        match call {
            PlayCall::PassShort | PlayCall::PassMedium | PlayCall::PassDeep => vec![
                (FormationVariant::None, 55.0),
                (FormationVariant::TripsRight, 15.0),
                (FormationVariant::Bunch, 12.0),
                (FormationVariant::PlayAction, 18.0),
            ],
            PlayCall::ScreenPass => vec![
                (FormationVariant::None, 60.0),
                (FormationVariant::Bunch, 25.0),
                (FormationVariant::JetMotion, 15.0),
            ],
            PlayCall::RunInside | PlayCall::RunOutside => vec![
                (FormationVariant::None, 70.0),
                (FormationVariant::JetMotion, 20.0),
                (FormationVariant::TripsRight, 10.0),
            ],
            _ => vec![(FormationVariant::None, 100.0)],
        }
    }

    /// Select the offensive package for a play
    ///
    /// ### Example
    /// ```
    /// use gridiron_core::game::formation::FormationSimulator;
    /// use gridiron_core::game::play::call::PlayCall;
    /// use gridiron_core::game::state::GameState;
    /// use gridiron_core::rng::ProvablyFairRng;
    ///
    /// let my_sim = FormationSimulator::new();
    /// let state = GameState::new();
    /// let mut rng = ProvablyFairRng::new("server", "client").unwrap();
    /// let package = my_sim.sim(PlayCall::PassShort, &state, &mut rng).unwrap();
    /// ```
    pub fn sim(
        &self,
        call: PlayCall,
        state: &GameState,
        rng: &mut ProvablyFairRng,
    ) -> Result<FormationCall, SimulationError> {
        let formations = self.formation_weights(call, state);
        let (formation, personnel) = *rng.weighted_choice(&formations)?;
        let variants = self.variant_weights(call);
        let variant = *rng.weighted_choice(&variants)?;
        Ok(FormationCall {
            formation,
            personnel,
            variant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_line_forces_heavy_packages() {
        let sim = FormationSimulator::new();
        let mut state = GameState::new();
        state.ball_position = 97;
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        for _ in 0..32 {
            let package = sim.sim(PlayCall::RunInside, &state, &mut rng).unwrap();
            assert!(matches!(
                package.formation,
                OffensiveFormation::GoalLine
                    | OffensiveFormation::IForm
                    | OffensiveFormation::Singleback
            ));
        }
    }

    #[test]
    fn test_rpo_support_limited_to_gun_and_pistol() {
        let shotgun = FormationCall {
            formation: OffensiveFormation::Shotgun,
            personnel: PersonnelGroup::Posse11,
            variant: FormationVariant::None,
        };
        let i_form = FormationCall {
            formation: OffensiveFormation::IForm,
            personnel: PersonnelGroup::Pro21,
            variant: FormationVariant::None,
        };
        assert!(shotgun.supports_rpo());
        assert!(!i_form.supports_rpo());
    }

    #[test]
    fn test_variant_overlay_composes() {
        let plain = FormationCall {
            formation: OffensiveFormation::Shotgun,
            personnel: PersonnelGroup::Posse11,
            variant: FormationVariant::None,
        };
        let bunched = FormationCall {
            variant: FormationVariant::Bunch,
            ..plain
        };
        assert!(
            bunched.modifiers().completion_multiplier > plain.modifiers().completion_multiplier
        );
        assert!(bunched.modifiers().screen_multiplier > plain.modifiers().screen_multiplier);
    }

    #[test]
    fn test_sim_consumes_two_draws() {
        let sim = FormationSimulator::new();
        let state = GameState::new();
        let mut rng = ProvablyFairRng::new("server", "client").unwrap();
        sim.sim(PlayCall::PassDeep, &state, &mut rng).unwrap();
        assert_eq!(rng.nonce(), 2);
    }
}
