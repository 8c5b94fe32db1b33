//! Dual-process decision making with temperature-scaled softmax selection.

use std::collections::BTreeMap;

use contracts::Action;
use rand::rngs::SmallRng;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::agent::Agent;
use crate::behavior;
use crate::system1::System1Evaluator;
use crate::utility::UtilityCalculator;

/// Caller contract violations. Simulated failures (insufficient funds,
/// missing employment) are failed outcomes, never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("no available actions to choose from")]
    NoCandidates,
    #[error("{agents} agents but {candidates} candidate lists")]
    CandidateListMismatch { agents: usize, candidates: usize },
}

/// Scored candidate from one decision cycle.
#[derive(Debug, Clone)]
pub struct ActionEvaluation {
    pub action: Action,
    pub system1_utility: f64,
    pub system2_utility: f64,
    pub combined_utility: f64,
    pub components: BTreeMap<String, f64>,
}

/// Single-shot decision maker. Holds only the selection temperature; all
/// agent state is read per call.
#[derive(Debug, Clone, Copy)]
pub struct DecisionMaker {
    pub temperature: f64,
}

impl Default for DecisionMaker {
    fn default() -> Self {
        Self { temperature: 0.1 }
    }
}

impl DecisionMaker {
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }

    /// Score every candidate with both systems, blended by the effective
    /// deliberation weight.
    pub fn evaluate_actions(
        &self,
        agent: &Agent,
        available_actions: &[Action],
    ) -> Vec<ActionEvaluation> {
        let theta = behavior::calculate_effective_theta(
            &agent.personality,
            agent.internal_state.self_control_resource,
            agent.internal_state.cognitive_load,
            agent.max_craving(),
            agent.internal_state.stress,
        );
        trace!(agent = %agent.id, theta, "effective deliberation weight");

        available_actions
            .iter()
            .map(|action| {
                let system1_utility = System1Evaluator.evaluate(action, agent);
                let (system2_utility, components) =
                    UtilityCalculator.calculate_total_utility(action, agent);
                let combined_utility = behavior::combine_system_evaluations(
                    system1_utility,
                    system2_utility,
                    theta,
                );
                ActionEvaluation {
                    action: action.clone(),
                    system1_utility,
                    system2_utility,
                    combined_utility,
                    components,
                }
            })
            .collect()
    }

    /// Choose an action by sampling the softmax distribution over combined
    /// utilities. Errors on an empty candidate list.
    pub fn choose_action(
        &self,
        agent: &Agent,
        available_actions: &[Action],
        rng: &mut SmallRng,
    ) -> Result<Action, DecisionError> {
        if available_actions.is_empty() {
            return Err(DecisionError::NoCandidates);
        }

        let evaluations = self.evaluate_actions(agent, available_actions);
        let utilities: Vec<f64> = evaluations
            .iter()
            .map(|evaluation| evaluation.combined_utility)
            .collect();
        let probabilities = softmax(&utilities, self.temperature);

        let roll: f64 = rng.random();
        let mut cumulative = 0.0;
        let mut selected = evaluations.len() - 1;
        for (index, probability) in probabilities.iter().enumerate() {
            cumulative += probability;
            if roll < cumulative {
                selected = index;
                break;
            }
        }

        debug!(
            agent = %agent.id,
            action = ?evaluations[selected].action.action_type,
            utility = evaluations[selected].combined_utility,
            "selected action"
        );
        Ok(evaluations[selected].action.clone())
    }

    /// The selection distribution without sampling, for inspection and
    /// testing.
    pub fn action_probabilities(
        &self,
        agent: &Agent,
        available_actions: &[Action],
    ) -> Result<Vec<(Action, f64)>, DecisionError> {
        if available_actions.is_empty() {
            return Err(DecisionError::NoCandidates);
        }
        let evaluations = self.evaluate_actions(agent, available_actions);
        let utilities: Vec<f64> = evaluations
            .iter()
            .map(|evaluation| evaluation.combined_utility)
            .collect();
        let probabilities = softmax(&utilities, self.temperature);
        Ok(evaluations
            .into_iter()
            .zip(probabilities)
            .map(|(evaluation, probability)| (evaluation.action, probability))
            .collect())
    }
}

/// Smallest usable selection temperature. Anything lower is floored here so
/// zero or negative temperatures degrade to near-argmax instead of NaN.
pub const MIN_TEMPERATURE: f64 = 1e-6;

/// Temperature-scaled softmax with max-subtraction for numerical stability.
pub fn softmax(utilities: &[f64], temperature: f64) -> Vec<f64> {
    let temperature = temperature.max(MIN_TEMPERATURE);
    let max = utilities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exponentials: Vec<f64> = utilities
        .iter()
        .map(|utility| ((utility - max) / temperature).exp())
        .collect();
    let sum: f64 = exponentials.iter().sum();
    exponentials
        .into_iter()
        .map(|exponential| exponential / sum)
        .collect()
}
