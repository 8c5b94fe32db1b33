//! Agent composition: traits, mutable state, monthly progression, and the
//! execute-action pipeline.

use contracts::{
    Action, ActionBudget, ActionOutcome, ActionType, AddictionState, CravingIntensities,
    CueKind, Employment, EnvironmentalCue, GamblingContext, HabitStocks, Housing,
    InternalState, OutcomeContext, PersonalityTraits,
};
use rand::rngs::SmallRng;
use tracing::debug;

use crate::behavior;
use crate::outcome::OutcomeGenerator;
use crate::rng::sample_normal;
use crate::state::apply_outcome;

/// Executed actions retained per agent.
pub const ACTION_HISTORY_CAP: usize = 100;

/// A psychologically modeled agent.
///
/// Immutable personality plus the mutable state the decision cycle reads
/// and the state updater writes.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub current_location: Option<String>,
    pub home: Option<Housing>,
    pub employment: Option<Employment>,
    pub personality: PersonalityTraits,
    pub internal_state: InternalState,
    pub habit_stocks: HabitStocks,
    pub alcohol: AddictionState,
    pub cravings: CravingIntensities,
    pub gambling_context: GamblingContext,
    pub action_budget: ActionBudget,
    /// Last [`ACTION_HISTORY_CAP`] executed actions with their outcomes.
    pub action_history: Vec<(Action, ActionOutcome)>,
}

impl Agent {
    pub fn new(id: impl Into<String>, personality: PersonalityTraits) -> Self {
        let id = id.into();
        let name = format!("Agent_{}", id.chars().take(8).collect::<String>());
        Self {
            id,
            name,
            current_location: None,
            home: None,
            employment: None,
            personality,
            internal_state: InternalState::default(),
            habit_stocks: HabitStocks::default(),
            alcohol: AddictionState::default(),
            cravings: CravingIntensities::default(),
            gambling_context: GamblingContext::default(),
            action_budget: ActionBudget::default(),
            action_history: Vec::new(),
        }
    }

    /// Create an agent with randomized but population-realistic traits.
    pub fn random(id: impl Into<String>, rng: &mut SmallRng) -> Self {
        Self::new(id, random_personality(rng))
    }

    pub fn with_wealth(mut self, wealth: f64) -> Self {
        self.internal_state.wealth = wealth;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.current_location = Some(location.into());
        self
    }

    /// Maximum craving intensity across substances and behaviors.
    pub fn max_craving(&self) -> f64 {
        self.cravings.max_intensity()
    }

    /// Whether the agent can take an action: time budget plus structural
    /// requirements (work needs a job; rest and drink need a home).
    pub fn can_afford_action(&self, action_type: ActionType, time_cost: f64) -> bool {
        if !self.action_budget.can_afford(time_cost) {
            return false;
        }
        match action_type {
            ActionType::Work => self.employment.is_some(),
            ActionType::Rest | ActionType::Drink => self.home.is_some(),
            _ => true,
        }
    }

    // -----------------------------------------------------------------------
    // Monthly progression
    // -----------------------------------------------------------------------

    /// Advance the agent's internal dynamics by `months` of elapsed time:
    /// addiction decay and withdrawal, habit decay, craving refresh, mood
    /// regression, stress decay toward a circumstance floor, and
    /// self-control restoration.
    pub fn advance_month(&mut self, months: u32) {
        self.update_addiction(months);
        self.update_habits(months);
        self.refresh_cravings();
        self.update_mood_and_stress(months);
        self.restore_self_control(months);
    }

    fn update_addiction(&mut self, months: u32) {
        self.alcohol.tolerance_level *= 0.95_f64.powi(months as i32);

        if self.alcohol.time_since_last_use > 0 {
            self.alcohol.withdrawal_severity = behavior::calculate_withdrawal_severity(
                self.alcohol.stock,
                self.alcohol.time_since_last_use,
            );
            self.alcohol.stock = behavior::update_addiction_stock(
                self.alcohol.stock,
                0.0,
                behavior::ADDICTION_DECAY_RATE,
                1.0,
            );
        }

        self.alcohol.time_since_last_use += months;
    }

    fn update_habits(&mut self, months: u32) {
        let decay = 0.95_f64.powi(months as i32);
        self.habit_stocks.drinking *= decay;
        self.habit_stocks.gambling *= decay;
    }

    /// Recompute craving intensities from the current addiction and habit
    /// state, amplified by stress and financial pressure.
    pub fn refresh_cravings(&mut self) {
        let mut alcohol_craving =
            self.alcohol.withdrawal_severity * 0.5 + self.alcohol.stock * 0.1;
        if self.internal_state.stress > 0.7 {
            alcohol_craving *= 1.3;
        }
        self.cravings.alcohol = alcohol_craving.min(1.0);

        let mut gambling_craving = self.habit_stocks.gambling * 0.2;
        if self.internal_state.wealth < self.internal_state.monthly_expenses {
            gambling_craving *= 1.5;
        }
        self.cravings.gambling = gambling_craving.min(1.0);
    }

    fn update_mood_and_stress(&mut self, months: u32) {
        self.internal_state.mood *= 0.9_f64.powi(months as i32);

        // Stress decays toward a floor set by life circumstances.
        let mut base_stress = 0.1;
        if self.internal_state.wealth < self.internal_state.monthly_expenses * 0.5 {
            base_stress += 0.2;
        }
        if self.employment.is_none() {
            base_stress += 0.15;
        }
        if self.home.is_none() {
            base_stress += 0.25;
        }
        let stress_diff = self.internal_state.stress - base_stress;
        self.internal_state.stress = base_stress + stress_diff * 0.8_f64.powi(months as i32);

        self.internal_state.clamp_bounds();
    }

    fn restore_self_control(&mut self, months: u32) {
        let mut restoration = 0.1 * f64::from(months);
        if self.home.is_some() {
            restoration *= 1.2;
        }
        if self.employment.is_some() {
            restoration *= 1.1;
        }
        self.internal_state.self_control_resource =
            (self.internal_state.self_control_resource + restoration).min(1.0);
    }

    // -----------------------------------------------------------------------
    // Environmental cues
    // -----------------------------------------------------------------------

    /// Apply environmental cues: substance and gambling cues multiplicatively
    /// amplify the matching craving (only when there is something to crave),
    /// financial-stress cues raise stress additively. Results stay bounded.
    pub fn process_environmental_cues(&mut self, cues: &[EnvironmentalCue]) {
        for cue in cues {
            match cue.kind {
                CueKind::Alcohol => {
                    if self.alcohol.stock > 0.0 {
                        self.cravings.alcohol =
                            (self.cravings.alcohol * (1.0 + cue.intensity * 0.3)).min(1.0);
                    }
                }
                CueKind::Gambling => {
                    if self.habit_stocks.gambling > 0.0 {
                        self.cravings.gambling =
                            (self.cravings.gambling * (1.0 + cue.intensity * 0.4)).min(1.0);
                    }
                }
                CueKind::FinancialStress => {
                    self.internal_state.stress =
                        (self.internal_state.stress + cue.intensity * 0.2).min(1.0);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Action execution
    // -----------------------------------------------------------------------

    /// Execute an action: move to its target if any, generate the outcome,
    /// apply it exactly once, record it in the bounded history, and spend
    /// the time budget. Returns the generated outcome.
    pub fn execute_action(
        &mut self,
        action: Action,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        if let Some(target) = action.target.clone() {
            if self.current_location.as_deref() != Some(target.as_str()) {
                self.current_location = Some(target);
            }
        }

        let outcome = OutcomeGenerator.generate(self, &action, context, rng);
        debug!(
            agent = %self.id,
            action = ?action.action_type,
            success = outcome.success(),
            "executed action"
        );
        self.record_action(action, outcome.clone());
        outcome
    }

    /// Apply an outcome and archive the (action, outcome) pair.
    pub fn record_action(&mut self, action: Action, outcome: ActionOutcome) {
        apply_outcome(self, &outcome);
        self.action_budget.spend(action.time_cost);
        self.action_history.push((action, outcome));
        if self.action_history.len() > ACTION_HISTORY_CAP {
            let over = self.action_history.len() - ACTION_HISTORY_CAP;
            self.action_history.drain(0..over);
        }
    }
}

/// Random but realistic personality traits.
pub fn random_personality(rng: &mut SmallRng) -> PersonalityTraits {
    PersonalityTraits {
        baseline_impulsivity: sample_normal(rng, 0.5, 0.2).clamp(0.0, 1.0),
        risk_preference_alpha: sample_normal(rng, 0.88, 0.1).clamp(0.5, 1.0),
        risk_preference_beta: sample_normal(rng, 0.88, 0.1).clamp(0.5, 1.0),
        risk_preference_lambda: sample_normal(rng, 2.25, 0.5).clamp(1.0, 4.0),
        cognitive_type: sample_normal(rng, 0.6, 0.2).clamp(0.0, 1.0),
        addiction_vulnerability: sample_normal(rng, 0.3, 0.2).clamp(0.0, 1.0),
        gambling_bias_strength: sample_normal(rng, 0.4, 0.2).clamp(0.0, 1.0),
    }
}
