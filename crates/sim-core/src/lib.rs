//! Agent decision kernel: behavioral-economics primitives, dual-process
//! utility evaluation, probabilistic action selection, stochastic outcome
//! generation, and deterministic state updates.
//!
//! The cycle for one agent in one round:
//!
//! 1. [`actions::generate_available_actions`] lists affordable candidates.
//! 2. [`decision::DecisionMaker`] scores each candidate with System 1
//!    (fast heuristics) and System 2 (weighted multi-component utility),
//!    blends them by the effective deliberation weight, and samples from a
//!    temperature-scaled softmax.
//! 3. [`outcome::OutcomeGenerator`] rolls a typed, stochastic outcome for
//!    the chosen action against an immutable context snapshot.
//! 4. [`state::apply_outcome`] folds the outcome back into the agent,
//!    exactly once.
//!
//! [`round::evaluate_round`] runs step 2 for a whole population, in
//! parallel under [`contracts::RngPolicy::PerAgent`].

pub mod actions;
pub mod agent;
pub mod behavior;
pub mod decision;
pub mod outcome;
pub mod rng;
pub mod round;
pub mod state;
pub mod system1;
pub mod utility;

pub use agent::Agent;
pub use decision::{ActionEvaluation, DecisionError, DecisionMaker};
pub use outcome::OutcomeGenerator;
pub use round::evaluate_round;
pub use state::apply_outcome;
pub use utility::UtilityCalculator;
