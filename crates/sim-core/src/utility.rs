//! System 2: multi-component utility with state-dependent weighting.

use std::collections::BTreeMap;

use contracts::{Action, ActionType, UtilityWeights};

use crate::agent::Agent;
use crate::behavior;

/// Deliberative utility calculator. Combines financial, habit, addiction,
/// and psychological components under weights that shift with the agent's
/// current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityCalculator;

impl UtilityCalculator {
    /// Total weighted utility plus the per-component breakdown.
    pub fn calculate_total_utility(
        &self,
        action: &Action,
        agent: &Agent,
    ) -> (f64, BTreeMap<String, f64>) {
        let weights = self.state_dependent_weights(agent);

        let financial = self.financial_utility(action, agent);
        let habit = self.habit_utility(action, agent);
        let addiction = self.addiction_utility(action, agent);
        let psychological = self.psychological_utility(action, agent);

        let total = weights.financial * financial
            + weights.habit * habit
            + weights.addiction * addiction
            + weights.psychological * psychological;

        let mut components = BTreeMap::new();
        components.insert("financial".to_string(), financial);
        components.insert("habit".to_string(), habit);
        components.insert("addiction".to_string(), addiction);
        components.insert("psychological".to_string(), psychological);

        (total, components)
    }

    /// Base weights rescaled by craving, financial pressure, and stress.
    /// Each trigger is followed by a renormalization so the weights always
    /// sum to 1.
    pub fn state_dependent_weights(&self, agent: &Agent) -> UtilityWeights {
        let mut weights = UtilityWeights::default();

        let max_craving = agent.max_craving();
        if max_craving > 0.5 {
            weights.addiction *= 1.0 + max_craving;
            weights.financial *= 0.5;
            weights.normalize();
        }

        if agent.internal_state.wealth < agent.internal_state.monthly_expenses * 0.5 {
            weights.financial *= 2.0;
            weights.normalize();
        }

        if agent.internal_state.stress > 0.7 {
            weights.psychological *= 1.5;
            weights.addiction *= 1.2;
            weights.normalize();
        }

        weights
    }

    /// Expected wealth change valued through prospect theory against the
    /// current wealth, squashed into roughly [-1, 1].
    fn financial_utility(&self, action: &Action, agent: &Agent) -> f64 {
        let wealth = agent.internal_state.wealth;

        let expected_change = match action.action_type {
            ActionType::Work => agent
                .employment
                .as_ref()
                .map(|employment| employment.base_salary)
                .unwrap_or(0.0),
            ActionType::Gamble => {
                // Expected value is negative from the house edge.
                let bet = action
                    .param("bet_amount")
                    .unwrap_or_else(|| 50.0_f64.min(wealth * 0.1));
                -bet * 0.05
            }
            ActionType::Drink => -20.0,
            ActionType::Beg => 30.0,
            _ => 0.0,
        };

        let value =
            behavior::evaluate_outcome(wealth + expected_change, wealth, &agent.personality);
        (value / 100.0).tanh()
    }

    fn habit_utility(&self, action: &Action, agent: &Agent) -> f64 {
        match action.action_type {
            ActionType::Drink => {
                let consumption = action.param("units").unwrap_or(2.0);
                behavior::calculate_habit_utility(consumption, agent.habit_stocks.drinking, 0.5)
            }
            ActionType::Gamble => {
                // Gambling "consumption" is time spent.
                behavior::calculate_habit_utility(action.time_cost, agent.habit_stocks.gambling, 0.3)
            }
            _ => 0.0,
        }
    }

    /// Addiction relief applies only to drinking: euphoria fades with
    /// tolerance, and with a growing stock the motivation shifts from
    /// positive reinforcement toward withdrawal and craving relief.
    fn addiction_utility(&self, action: &Action, agent: &Agent) -> f64 {
        if action.action_type != ActionType::Drink {
            return 0.0;
        }

        let units = action.param("units").unwrap_or(2.0);
        let euphoria =
            behavior::calculate_tolerance_effect(units * 0.3, agent.alcohol.tolerance_level);

        let withdrawal_relief = if agent.alcohol.withdrawal_severity > 0.0 {
            agent.alcohol.withdrawal_severity * 0.8
        } else {
            0.0
        };
        let craving_relief = if agent.cravings.alcohol > 0.0 {
            agent.cravings.alcohol * 0.6
        } else {
            0.0
        };

        let addiction_factor = agent.alcohol.stock.min(1.0);
        (1.0 - addiction_factor) * euphoria
            + addiction_factor * (withdrawal_relief + craving_relief)
    }

    fn psychological_utility(&self, action: &Action, agent: &Agent) -> f64 {
        let mood = agent.internal_state.mood;
        let stress = agent.internal_state.stress;

        match action.action_type {
            ActionType::Rest => {
                let stress_relief = stress * 0.3;
                let mood_boost = if mood < 0.5 { (1.0 - mood) * 0.2 } else { 0.0 };
                stress_relief + mood_boost
            }
            ActionType::Drink => stress * 0.4,
            ActionType::Work => agent
                .employment
                .as_ref()
                .map(|employment| -employment.stress_level * 0.3)
                .unwrap_or(0.0),
            ActionType::Gamble => {
                let mut excitement = 0.2;
                if agent.gambling_context.loss_streak > 3 {
                    excitement -= 0.3;
                }
                excitement
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Employment, PersonalityTraits};

    fn agent() -> Agent {
        Agent::new("a:1", PersonalityTraits::balanced())
    }

    #[test]
    fn weights_sum_to_one_under_all_triggers() {
        let mut agent = agent();
        agent.cravings.alcohol = 0.9;
        agent.internal_state.wealth = 100.0;
        agent.internal_state.monthly_expenses = 800.0;
        agent.internal_state.stress = 0.9;
        let weights = UtilityCalculator.state_dependent_weights(&agent);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn craving_shifts_weight_toward_addiction() {
        let mut agent = agent();
        let baseline = UtilityCalculator.state_dependent_weights(&agent);
        agent.cravings.alcohol = 0.9;
        let craving = UtilityCalculator.state_dependent_weights(&agent);
        assert!(craving.addiction > baseline.addiction);
        assert!(craving.financial < baseline.financial);
    }

    #[test]
    fn work_utility_requires_employment() {
        let mut agent = agent();
        let action = Action::new(ActionType::Work, 160.0);
        let (unemployed, _) = UtilityCalculator.calculate_total_utility(&action, &agent);

        agent.employment = Some(Employment::default());
        let (employed, components) = UtilityCalculator.calculate_total_utility(&action, &agent);
        assert!(employed > unemployed);
        assert!(components["financial"] > 0.0);
    }

    #[test]
    fn loss_streak_dampens_gambling_excitement() {
        let mut agent = agent();
        let action = Action::new(ActionType::Gamble, 4.0);
        let fresh = UtilityCalculator.psychological_utility(&action, &agent);
        agent.gambling_context.loss_streak = 5;
        let chasing = UtilityCalculator.psychological_utility(&action, &agent);
        assert!(chasing < fresh);
    }

    #[test]
    fn withdrawal_makes_drinking_about_relief() {
        let mut agent = agent();
        agent.alcohol.stock = 1.0;
        agent.alcohol.withdrawal_severity = 0.8;
        agent.cravings.alcohol = 0.9;
        let action = Action::new(ActionType::Drink, 2.0).with_param("units", 2.0);
        let relief = UtilityCalculator.addiction_utility(&action, &agent);
        // Fully shifted to negative reinforcement: withdrawal + craving relief.
        assert!((relief - (0.8 * 0.8 + 0.9 * 0.6)).abs() < 1e-12);
    }

    #[test]
    fn components_are_reported_for_every_action() {
        let agent = agent();
        let action = Action::new(ActionType::Beg, 8.0);
        let (_, components) = UtilityCalculator.calculate_total_utility(&action, &agent);
        for key in ["financial", "habit", "addiction", "psychological"] {
            assert!(components.contains_key(key));
        }
    }
}
