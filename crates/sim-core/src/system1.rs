//! System 1: fast, intuitive action appeal.

use contracts::{Action, ActionType};

use crate::agent::Agent;

/// Heuristic evaluator, independent of the deliberative utility calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct System1Evaluator;

impl System1Evaluator {
    /// Immediate appeal of an action, roughly in [-1, 1].
    pub fn evaluate(&self, action: &Action, agent: &Agent) -> f64 {
        match action.action_type {
            ActionType::Drink => {
                let appeal =
                    agent.cravings.alcohol * 2.0 + agent.internal_state.stress * 0.5;
                appeal.tanh()
            }
            ActionType::Gamble => {
                let mut appeal = 0.3 + agent.cravings.gambling;
                // Loss chasing after a streak.
                if agent.gambling_context.loss_streak > 2 {
                    appeal *= 1.0 + agent.personality.gambling_bias_strength * 0.5;
                }
                appeal.tanh()
            }
            ActionType::Work => 0.1 - agent.internal_state.stress * 0.2,
            ActionType::Rest => 0.3 + agent.internal_state.cognitive_load * 0.4,
            ActionType::Beg => {
                let expenses = agent.internal_state.monthly_expenses.max(f64::EPSILON);
                let wealth_ratio = agent.internal_state.wealth / expenses;
                if wealth_ratio < 0.2 {
                    0.5
                } else {
                    -0.3
                }
            }
            _ => 0.0,
        }
    }
}
