//! Round-level action selection for a whole population.
//!
//! Agents are independent within a round: they read only their own state
//! plus an immutable context snapshot, so parallel evaluation is safe under
//! per-agent RNG streams.

use contracts::{Action, RngPolicy};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;

use crate::agent::Agent;
use crate::decision::{DecisionError, DecisionMaker};
use crate::rng::agent_rng;

/// Choose one action per agent.
///
/// Under [`RngPolicy::PerAgent`] each agent draws from a stream derived
/// from the master seed, its id, and the round number; evaluation runs in
/// parallel and results do not depend on ordering or thread scheduling.
/// Under [`RngPolicy::SharedStream`] agents are evaluated sequentially in
/// slice order against a single stream seeded by the master seed.
///
/// Errors if the slices disagree in length or any candidate list is empty.
pub fn evaluate_round(
    agents: &[Agent],
    candidates: &[Vec<Action>],
    maker: &DecisionMaker,
    master_seed: u64,
    round: u64,
    policy: RngPolicy,
) -> Result<Vec<Action>, DecisionError> {
    if agents.len() != candidates.len() {
        return Err(DecisionError::CandidateListMismatch {
            agents: agents.len(),
            candidates: candidates.len(),
        });
    }
    debug!(agents = agents.len(), round, ?policy, "evaluating round");

    match policy {
        RngPolicy::PerAgent => agents
            .par_iter()
            .zip(candidates.par_iter())
            .map(|(agent, actions)| {
                let mut rng = agent_rng(master_seed, &agent.id, round);
                maker.choose_action(agent, actions, &mut rng)
            })
            .collect(),
        RngPolicy::SharedStream => {
            let mut rng = SmallRng::seed_from_u64(master_seed);
            agents
                .iter()
                .zip(candidates.iter())
                .map(|(agent, actions)| maker.choose_action(agent, actions, &mut rng))
                .collect()
        }
    }
}
