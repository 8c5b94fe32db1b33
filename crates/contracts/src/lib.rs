//! Shared data contracts for the behavioral agent simulation kernel.
//!
//! This crate contains the data model only: immutable personality traits,
//! mutable internal/addiction/habit/gambling state, actions and their typed
//! outcomes, utility weights, environmental cues, and the read-only context
//! snapshots supplied by external collaborators. Behavior lives in
//! `sim-core`; the only methods here are small record-keeping helpers
//! (bounded pushes, weight normalization, budget accounting).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Hours an agent can allocate to actions within one simulated month.
pub const MONTHLY_ACTION_HOURS: f64 = 280.0;

/// Gambling outcomes retained for bias calculations.
pub const GAMBLING_HISTORY_CAP: usize = 10;

/// Work performance scores retained for the rolling average.
pub const PERFORMANCE_HISTORY_CAP: usize = 12;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The closed set of actions an agent can choose among.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Work,
    Beg,
    Gamble,
    Drink,
    FindJob,
    FindHousing,
    MoveHome,
    Rest,
}

impl ActionType {
    /// Canonical time cost in hours before any travel adjustment.
    pub fn base_time_cost(self) -> f64 {
        match self {
            ActionType::Work => 160.0,
            ActionType::Beg => 8.0,
            ActionType::Gamble => 4.0,
            ActionType::Drink => 2.0,
            ActionType::FindJob => 20.0,
            ActionType::FindHousing => 10.0,
            ActionType::MoveHome => 20.0,
            ActionType::Rest => 4.0,
        }
    }
}

/// A candidate action: ephemeral, produced by the action-generation
/// collaborator and consumed once by the decision cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Action {
    pub action_type: ActionType,
    /// Total time cost in hours, travel included.
    pub time_cost: f64,
    /// Optional location reference (plot id) the action targets.
    pub target: Option<String>,
    /// Free-form numeric parameters (e.g. `units`, `bet_amount`).
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}

impl Action {
    pub fn new(action_type: ActionType, time_cost: f64) -> Self {
        Self {
            action_type,
            time_cost,
            target: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn param(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).copied()
    }
}

/// Monthly time budget accounting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionBudget {
    pub total_hours: f64,
    pub spent_hours: f64,
}

impl Default for ActionBudget {
    fn default() -> Self {
        Self {
            total_hours: MONTHLY_ACTION_HOURS,
            spent_hours: 0.0,
        }
    }
}

impl ActionBudget {
    pub fn can_afford(&self, hours: f64) -> bool {
        self.spent_hours + hours <= self.total_hours
    }

    pub fn spend(&mut self, hours: f64) {
        self.spent_hours += hours;
    }

    pub fn reset(&mut self) {
        self.spent_hours = 0.0;
    }

    pub fn remaining_hours(&self) -> f64 {
        self.total_hours - self.spent_hours
    }
}

// ---------------------------------------------------------------------------
// Personality and internal state
// ---------------------------------------------------------------------------

/// Immutable personality traits, fixed at agent construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PersonalityTraits {
    /// Present-bias baseline for quasi-hyperbolic discounting, in [0, 1].
    pub baseline_impulsivity: f64,
    /// Prospect-theory gain curvature alpha.
    pub risk_preference_alpha: f64,
    /// Prospect-theory loss curvature beta.
    pub risk_preference_beta: f64,
    /// Loss-aversion coefficient lambda.
    pub risk_preference_lambda: f64,
    /// Deliberative disposition, in [0, 1]. Higher means more System 2.
    pub cognitive_type: f64,
    /// Susceptibility to addiction stock growth, in [0, 1].
    pub addiction_vulnerability: f64,
    /// Strength of gambling-specific cognitive biases, in [0, 1].
    pub gambling_bias_strength: f64,
}

impl PersonalityTraits {
    /// High impulsivity, weak deliberation, strong gambling bias.
    pub fn impulsive() -> Self {
        Self {
            baseline_impulsivity: 0.8,
            risk_preference_alpha: 0.7,
            risk_preference_beta: 0.7,
            risk_preference_lambda: 1.5,
            cognitive_type: 0.3,
            addiction_vulnerability: 0.6,
            gambling_bias_strength: 0.7,
        }
    }

    /// Low impulsivity, strong loss aversion, strong deliberation.
    pub fn cautious() -> Self {
        Self {
            baseline_impulsivity: 0.2,
            risk_preference_alpha: 0.95,
            risk_preference_beta: 0.95,
            risk_preference_lambda: 3.0,
            cognitive_type: 0.8,
            addiction_vulnerability: 0.1,
            gambling_bias_strength: 0.2,
        }
    }

    /// Population-typical parameter values.
    pub fn balanced() -> Self {
        Self {
            baseline_impulsivity: 0.5,
            risk_preference_alpha: 0.88,
            risk_preference_beta: 0.88,
            risk_preference_lambda: 2.25,
            cognitive_type: 0.6,
            addiction_vulnerability: 0.3,
            gambling_bias_strength: 0.4,
        }
    }

    /// Elevated addiction vulnerability with weakened loss aversion.
    pub fn vulnerable() -> Self {
        Self {
            baseline_impulsivity: 0.7,
            risk_preference_alpha: 0.6,
            risk_preference_beta: 0.8,
            risk_preference_lambda: 1.8,
            cognitive_type: 0.4,
            addiction_vulnerability: 0.8,
            gambling_bias_strength: 0.6,
        }
    }
}

/// Mutable internal state. Owned and mutated only by the state updater and
/// the monthly progression routine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InternalState {
    /// Mood in [-1, 1].
    pub mood: f64,
    /// Stress in [0, 1].
    pub stress: f64,
    /// Cognitive load in [0, 1].
    pub cognitive_load: f64,
    /// Depletable self-control resource in [0, 1].
    pub self_control_resource: f64,
    /// Liquid wealth, never negative.
    pub wealth: f64,
    /// Rent plus basic needs, never negative.
    pub monthly_expenses: f64,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            mood: 0.0,
            stress: 0.0,
            cognitive_load: 0.0,
            self_control_resource: 1.0,
            wealth: 1000.0,
            monthly_expenses: 800.0,
        }
    }
}

impl InternalState {
    /// Re-establish all documented bounds after a batch of adjustments.
    pub fn clamp_bounds(&mut self) {
        self.mood = self.mood.clamp(-1.0, 1.0);
        self.stress = self.stress.clamp(0.0, 1.0);
        self.cognitive_load = self.cognitive_load.clamp(0.0, 1.0);
        self.self_control_resource = self.self_control_resource.clamp(0.0, 1.0);
        self.wealth = self.wealth.max(0.0);
        self.monthly_expenses = self.monthly_expenses.max(0.0);
    }
}

// ---------------------------------------------------------------------------
// Addiction, habit, and craving state
// ---------------------------------------------------------------------------

/// Addictive substances tracked per agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubstanceKind {
    Alcohol,
}

/// Habitual behaviors tracked per agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    Drinking,
    Gambling,
}

/// Per-substance addiction state, evolved by decay and consumption.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AddictionState {
    /// Addiction capital in [0, 1].
    pub stock: f64,
    /// Tolerance in [0, 1]; dampens substance effects.
    pub tolerance_level: f64,
    /// Withdrawal severity in [0, 1].
    pub withdrawal_severity: f64,
    /// Days since last use.
    pub time_since_last_use: u32,
}

/// Habit stocks per behavior, bounded in practice by exponential smoothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct HabitStocks {
    pub drinking: f64,
    pub gambling: f64,
}

impl HabitStocks {
    pub fn get(&self, behavior: BehaviorKind) -> f64 {
        match behavior {
            BehaviorKind::Drinking => self.drinking,
            BehaviorKind::Gambling => self.gambling,
        }
    }

    pub fn set(&mut self, behavior: BehaviorKind, value: f64) {
        match behavior {
            BehaviorKind::Drinking => self.drinking = value,
            BehaviorKind::Gambling => self.gambling = value,
        }
    }
}

/// Momentary urge intensities, refreshed by the monthly progression and
/// amplified by environmental cues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CravingIntensities {
    pub alcohol: f64,
    pub gambling: f64,
}

impl CravingIntensities {
    pub fn max_intensity(&self) -> f64 {
        self.alcohol.max(self.gambling)
    }
}

// ---------------------------------------------------------------------------
// Gambling context
// ---------------------------------------------------------------------------

/// One resolved gambling session, as remembered by the agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GamblingRecord {
    pub monetary_change: f64,
    pub was_near_miss: bool,
    pub psychological_impact: f64,
}

/// Rolling gambling memory: bounded outcome history plus aggregates.
/// Mutated only by the state updater when a gambling outcome is applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GamblingContext {
    /// Last `GAMBLING_HISTORY_CAP` outcomes, oldest first.
    pub recent_outcomes: Vec<GamblingRecord>,
    pub loss_streak: u32,
    pub total_wins: f64,
    pub total_losses: f64,
    pub total_games: u32,
}

impl GamblingContext {
    /// Push an outcome, dropping the oldest entry beyond capacity.
    pub fn push_outcome(&mut self, record: GamblingRecord) {
        self.recent_outcomes.push(record);
        if self.recent_outcomes.len() > GAMBLING_HISTORY_CAP {
            let over = self.recent_outcomes.len() - GAMBLING_HISTORY_CAP;
            self.recent_outcomes.drain(0..over);
        }
    }

    /// Wins among the remembered outcomes.
    pub fn recent_wins(&self) -> u32 {
        self.recent_outcomes
            .iter()
            .filter(|record| record.monetary_change > 0.0)
            .count() as u32
    }
}

// ---------------------------------------------------------------------------
// Employment and housing
// ---------------------------------------------------------------------------

/// Rolling work performance record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkPerformanceHistory {
    /// Last `PERFORMANCE_HISTORY_CAP` scores, oldest first.
    pub recent_performances: Vec<f64>,
    pub average_performance: f64,
    pub months_employed: u32,
    pub warnings_received: u32,
}

impl Default for WorkPerformanceHistory {
    fn default() -> Self {
        Self {
            recent_performances: Vec::new(),
            average_performance: 1.0,
            months_employed: 0,
            warnings_received: 0,
        }
    }
}

impl WorkPerformanceHistory {
    /// Record a performance score: bounded push, running average, and a
    /// warning increment when the score falls below 0.5.
    pub fn record(&mut self, performance: f64) {
        self.recent_performances.push(performance);
        if self.recent_performances.len() > PERFORMANCE_HISTORY_CAP {
            let over = self.recent_performances.len() - PERFORMANCE_HISTORY_CAP;
            self.recent_performances.drain(0..over);
        }
        self.average_performance = self.recent_performances.iter().sum::<f64>()
            / self.recent_performances.len() as f64;
        if performance < 0.5 {
            self.warnings_received += 1;
        }
    }
}

/// Current employment record, created by a successful job search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employment {
    pub employer_id: Option<String>,
    pub job_id: Option<String>,
    /// Job quality in [0, 1]; drives salary and working conditions.
    pub job_quality: f64,
    /// Monthly base salary before performance adjustment.
    pub base_salary: f64,
    /// Baseline stress imposed by the job, in [0, 1].
    pub stress_level: f64,
    pub performance_history: WorkPerformanceHistory,
}

impl Default for Employment {
    fn default() -> Self {
        Self {
            employer_id: None,
            job_id: None,
            job_quality: 0.5,
            base_salary: 2000.0,
            stress_level: 0.5,
            performance_history: WorkPerformanceHistory::default(),
        }
    }
}

/// Current housing record, created by a successful housing search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Housing {
    pub plot_id: Option<String>,
    pub unit_id: Option<String>,
    /// Housing quality in [0, 1].
    pub housing_quality: f64,
    pub monthly_rent: f64,
    pub months_at_residence: u32,
}

impl Default for Housing {
    fn default() -> Self {
        Self {
            plot_id: None,
            unit_id: None,
            housing_quality: 0.5,
            monthly_rent: 800.0,
            months_at_residence: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Environmental cues and outcome context
// ---------------------------------------------------------------------------

/// Kinds of environmental cues supplied by the environment collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    Alcohol,
    Gambling,
    FinancialStress,
}

/// A single environmental cue with intensity in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentalCue {
    pub kind: CueKind,
    pub intensity: f64,
    pub source: Option<String>,
}

/// Read-only context snapshot from the environment/economy collaborators.
/// All values lie in [0, 1] and default to 0.5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutcomeContext {
    pub district_wealth: f64,
    pub location_quality: f64,
    pub market_conditions: f64,
    pub social_density: f64,
}

impl Default for OutcomeContext {
    fn default() -> Self {
        Self {
            district_wealth: 0.5,
            location_quality: 0.5,
            market_conditions: 0.5,
            social_density: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Action outcomes
// ---------------------------------------------------------------------------

/// Typed outcome of one executed action. Created by the outcome generator,
/// consumed exactly once by the state updater.
///
/// Constraint failures (insufficient funds, missing employment) are encoded
/// as `success: false` with zeroed numeric fields, never as errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    Work {
        success: bool,
        message: String,
        payment: f64,
        performance: f64,
        stress_increase: f64,
    },
    Gambling {
        success: bool,
        message: String,
        monetary_change: f64,
        was_near_miss: bool,
        psychological_impact: f64,
    },
    Drinking {
        success: bool,
        message: String,
        cost: f64,
        units_consumed: u32,
        stress_relief: f64,
        mood_change: f64,
    },
    Begging {
        success: bool,
        message: String,
        income: f64,
        social_cost: f64,
        location_quality: f64,
    },
    JobSearch {
        success: bool,
        message: String,
        job_found: bool,
        job_quality: f64,
        stress_change: f64,
    },
    HousingSearch {
        success: bool,
        message: String,
        housing_found: bool,
        housing_quality: f64,
        rent_cost: f64,
    },
    Move {
        success: bool,
        message: String,
        move_cost: f64,
        stress_change: f64,
        new_location: Option<String>,
    },
    Rest {
        success: bool,
        message: String,
        stress_reduction: f64,
        mood_improvement: f64,
        self_control_restoration: f64,
    },
}

impl ActionOutcome {
    pub fn success(&self) -> bool {
        match self {
            ActionOutcome::Work { success, .. }
            | ActionOutcome::Gambling { success, .. }
            | ActionOutcome::Drinking { success, .. }
            | ActionOutcome::Begging { success, .. }
            | ActionOutcome::JobSearch { success, .. }
            | ActionOutcome::HousingSearch { success, .. }
            | ActionOutcome::Move { success, .. }
            | ActionOutcome::Rest { success, .. } => *success,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ActionOutcome::Work { message, .. }
            | ActionOutcome::Gambling { message, .. }
            | ActionOutcome::Drinking { message, .. }
            | ActionOutcome::Begging { message, .. }
            | ActionOutcome::JobSearch { message, .. }
            | ActionOutcome::HousingSearch { message, .. }
            | ActionOutcome::Move { message, .. }
            | ActionOutcome::Rest { message, .. } => message,
        }
    }
}

// ---------------------------------------------------------------------------
// Utility weights
// ---------------------------------------------------------------------------

/// Weights over the four utility components. Always renormalized to sum 1
/// after any conditional rescale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UtilityWeights {
    pub financial: f64,
    pub habit: f64,
    pub addiction: f64,
    pub psychological: f64,
}

impl Default for UtilityWeights {
    fn default() -> Self {
        Self {
            financial: 0.30,
            habit: 0.15,
            addiction: 0.20,
            psychological: 0.35,
        }
    }
}

impl UtilityWeights {
    /// Rescale the four weights to sum to 1. A non-positive total leaves the
    /// weights untouched.
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total > 0.0 {
            self.financial /= total;
            self.habit /= total;
            self.addiction /= total;
            self.psychological /= total;
        }
    }

    pub fn sum(&self) -> f64 {
        self.financial + self.habit + self.addiction + self.psychological
    }
}

// ---------------------------------------------------------------------------
// Randomness policy
// ---------------------------------------------------------------------------

/// How the simulation draws randomness across agents within a round.
///
/// `SharedStream` keeps one ordered draw sequence across agents, so the full
/// round is reproducible only under a fixed evaluation order. `PerAgent`
/// derives an independent stream per agent and round, making each agent's
/// evaluation order-independent and safe to parallelize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RngPolicy {
    SharedStream,
    #[default]
    PerAgent,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
