//! Stochastic outcome generation, one generator per action type.
//!
//! Generators read agent state and the context snapshot but never mutate
//! either; constraint failures come back as failed outcomes with zeroed
//! numeric fields.

use contracts::{Action, ActionOutcome, ActionType, OutcomeContext};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::trace;

use crate::agent::Agent;
use crate::rng::{sample_exponential, sample_normal, sample_uniform};

/// Rolls typed outcomes for chosen actions against an immutable context.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeGenerator;

impl OutcomeGenerator {
    pub fn generate(
        &self,
        agent: &Agent,
        action: &Action,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        let outcome = match action.action_type {
            ActionType::Work => self.work(agent, action, rng),
            ActionType::Gamble => self.gamble(agent, action, rng),
            ActionType::Drink => self.drink(agent, action, context, rng),
            ActionType::Beg => self.beg(agent, action, context, rng),
            ActionType::FindJob => self.find_job(agent, context, rng),
            ActionType::FindHousing => self.find_housing(agent, context, rng),
            ActionType::MoveHome => self.move_home(agent, action, rng),
            ActionType::Rest => self.rest(agent, action, context, rng),
        };
        trace!(agent = %agent.id, action = ?action.action_type, success = outcome.success(), "generated outcome");
        outcome
    }

    fn work(&self, agent: &Agent, action: &Action, rng: &mut SmallRng) -> ActionOutcome {
        let Some(employment) = agent.employment.as_ref() else {
            return ActionOutcome::Work {
                success: false,
                message: "Cannot work without employment".to_string(),
                payment: 0.0,
                performance: 0.0,
                stress_increase: 0.0,
            };
        };

        // Past performance pulls current performance toward the average.
        let mut base_performance = 1.0;
        if !employment.performance_history.recent_performances.is_empty() {
            base_performance = 0.7 * base_performance
                + 0.3 * employment.performance_history.average_performance;
        }

        let stress_penalty = agent.internal_state.stress * 0.3;
        let withdrawal_penalty = agent.alcohol.withdrawal_severity * 0.4;
        let mood_bonus = agent.internal_state.mood * 0.1;

        let mut performance =
            (base_performance - stress_penalty - withdrawal_penalty + mood_bonus)
                .clamp(0.1, 1.5);
        performance *= sample_normal(rng, 1.0, 0.1);
        performance = performance.clamp(0.1, 1.5);

        // Pro-rated against a full 160-hour month.
        let payment = employment.base_salary * performance * (action.time_cost / 160.0);

        let mut stress_increase = (0.05 + sample_normal(rng, 0.0, 0.02)).max(0.0);
        if performance < 0.7 {
            stress_increase += (0.7 - performance) * 0.2;
        }

        ActionOutcome::Work {
            success: true,
            message: format!(
                "Worked {:.1}h, performance: {performance:.2}",
                action.time_cost
            ),
            payment,
            performance,
            stress_increase,
        }
    }

    fn gamble(&self, agent: &Agent, action: &Action, rng: &mut SmallRng) -> ActionOutcome {
        let wealth = agent.internal_state.wealth;
        let mut bet_amount = action
            .param("bet_amount")
            .unwrap_or_else(|| 50.0_f64.min(wealth * 0.1));

        // A losing streak makes the agent feel "due" and raise the stake.
        let loss_streak = agent.gambling_context.loss_streak;
        if loss_streak >= 3 {
            bet_amount *= 1.0 + f64::from(loss_streak) * 0.1;
            bet_amount = bet_amount.min(wealth);
        }

        if bet_amount > wealth {
            return ActionOutcome::Gambling {
                success: false,
                message: "Insufficient funds for gambling".to_string(),
                monetary_change: 0.0,
                was_near_miss: false,
                psychological_impact: 0.0,
            };
        }

        let base_win_prob = 0.45;
        let win_roll: f64 = rng.random();
        let won = win_roll < base_win_prob;
        let was_near_miss = !won && win_roll < base_win_prob + 0.1;

        let monetary_change = if won {
            let payout_ratio = sample_uniform(rng, 1.05, 1.3);
            bet_amount * payout_ratio - bet_amount
        } else {
            -bet_amount
        };

        let psychological_impact = if won {
            0.3 + sample_normal(rng, 0.0, 0.1)
        } else if was_near_miss {
            -0.1 + sample_normal(rng, 0.0, 0.1)
        } else {
            -0.2 + sample_normal(rng, 0.0, 0.1)
        };

        let result_text = if won {
            "Won"
        } else if was_near_miss {
            "Near miss"
        } else {
            "Lost"
        };
        ActionOutcome::Gambling {
            success: true,
            message: format!("{result_text} ${:.2} gambling", monetary_change.abs()),
            monetary_change,
            was_near_miss,
            psychological_impact,
        }
    }

    fn drink(
        &self,
        agent: &Agent,
        action: &Action,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        let mut units = action.param("units").unwrap_or(2.0).max(0.0) as u32;

        // Richer districts charge more per drink.
        let cost_per_unit = 8.0 * (0.5 + context.district_wealth);
        let mut total_cost = f64::from(units) * cost_per_unit;

        if total_cost > agent.internal_state.wealth {
            let affordable_units = (agent.internal_state.wealth / cost_per_unit) as u32;
            if affordable_units == 0 {
                return ActionOutcome::Drinking {
                    success: false,
                    message: "Cannot afford alcohol".to_string(),
                    cost: 0.0,
                    units_consumed: 0,
                    stress_relief: 0.0,
                    mood_change: 0.0,
                };
            }
            units = affordable_units;
            total_cost = f64::from(units) * cost_per_unit;
        }

        let tolerance_factor = 1.0 - agent.alcohol.tolerance_level * 0.7;

        let stress_relief = (0.3 * f64::from(units) * tolerance_factor
            + sample_normal(rng, 0.0, 0.1))
        .max(0.0);

        let mood_change = if agent.alcohol.stock < 0.3 {
            0.2 * f64::from(units) * tolerance_factor + sample_normal(rng, 0.0, 0.1)
        } else {
            let mut change =
                0.1 * f64::from(units) * tolerance_factor + sample_normal(rng, 0.0, 0.15);
            if tolerance_factor < 0.5 {
                change *= sample_uniform(rng, 0.5, 1.0);
            }
            change
        };

        ActionOutcome::Drinking {
            success: true,
            message: format!("Consumed {units} drinks for ${total_cost:.2}"),
            cost: total_cost,
            units_consumed: units,
            stress_relief,
            mood_change,
        }
    }

    fn beg(
        &self,
        agent: &Agent,
        action: &Action,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        let base_income_per_hour = 5.0 * context.district_wealth * context.location_quality;
        let density_multiplier = 0.5 + context.social_density * 0.8;

        // Visible distress draws more sympathy.
        let mut sympathy_factor = 1.0;
        if agent.internal_state.stress > 0.7 {
            sympathy_factor += 0.3;
        }
        if agent.internal_state.mood < -0.5 {
            sympathy_factor += 0.2;
        }

        let expected_income =
            base_income_per_hour * action.time_cost * density_multiplier * sympathy_factor;

        // Heavy right skew, capped to keep outliers plausible.
        let income = sample_exponential(rng, expected_income).min(expected_income * 3.0);

        let social_cost =
            (context.district_wealth * 0.2 + sample_normal(rng, 0.0, 0.05)).max(0.0);

        ActionOutcome::Begging {
            success: true,
            message: format!(
                "Earned ${income:.2} begging for {:.1}h",
                action.time_cost
            ),
            income,
            social_cost,
            location_quality: context.location_quality,
        }
    }

    fn find_job(
        &self,
        agent: &Agent,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        let base_success_prob = 0.3 * context.market_conditions;

        let stress_penalty = agent.internal_state.stress * 0.5;
        let withdrawal_penalty = agent.alcohol.withdrawal_severity * 0.4;
        let mood_bonus = agent.internal_state.mood.max(0.0) * 0.4;

        let success_prob = (base_success_prob
            * (1.0 - stress_penalty - withdrawal_penalty + mood_bonus))
            .clamp(0.01, 0.8);

        let job_found = rng.random::<f64>() < success_prob;

        let (job_quality, stress_change) = if job_found {
            let quality = (sample_uniform(rng, 0.3, 0.9) + agent.internal_state.mood * 0.1)
                .clamp(0.1, 1.0);
            (quality, -0.2)
        } else {
            (0.0, 0.1 + 0.1)
        };

        ActionOutcome::JobSearch {
            success: true,
            message: format!(
                "Job search: {}",
                if job_found {
                    "Found position"
                } else {
                    "No opportunities"
                }
            ),
            job_found,
            job_quality,
            stress_change,
        }
    }

    fn find_housing(
        &self,
        agent: &Agent,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        // Deposits gate the search more than anything else.
        let wealth_factor = (agent.internal_state.wealth / 2000.0).min(1.0);
        let success_prob = 0.2 * wealth_factor * context.market_conditions;

        let housing_found = rng.random::<f64>() < success_prob;

        let (housing_quality, rent_cost) = if housing_found {
            let affordable_rent = agent.internal_state.wealth * 0.3;
            if affordable_rent < 500.0 {
                (sample_uniform(rng, 0.1, 0.4), sample_uniform(rng, 300.0, 500.0))
            } else if affordable_rent < 1000.0 {
                (sample_uniform(rng, 0.3, 0.7), sample_uniform(rng, 500.0, 1000.0))
            } else {
                (sample_uniform(rng, 0.6, 0.9), sample_uniform(rng, 800.0, 1500.0))
            }
        } else {
            (0.0, 0.0)
        };

        ActionOutcome::HousingSearch {
            success: true,
            message: format!(
                "Housing search: {}",
                if housing_found {
                    "Found place"
                } else {
                    "No suitable options"
                }
            ),
            housing_found,
            housing_quality,
            rent_cost,
        }
    }

    fn move_home(&self, agent: &Agent, action: &Action, rng: &mut SmallRng) -> ActionOutcome {
        let move_cost = 200.0 * sample_uniform(rng, 0.8, 1.5);

        if move_cost > agent.internal_state.wealth {
            return ActionOutcome::Move {
                success: false,
                message: "Cannot afford moving costs".to_string(),
                move_cost: 0.0,
                stress_change: 0.0,
                new_location: None,
            };
        }

        let stress_change = 0.1 + sample_normal(rng, 0.0, 0.05);

        ActionOutcome::Move {
            success: true,
            message: format!("Moved to new location for ${move_cost:.2}"),
            move_cost,
            stress_change,
            new_location: action.target.clone(),
        }
    }

    fn rest(
        &self,
        agent: &Agent,
        action: &Action,
        context: &OutcomeContext,
        rng: &mut SmallRng,
    ) -> ActionOutcome {
        let location_multiplier = 0.5 + context.location_quality * 0.5;
        let withdrawal_penalty = agent.alcohol.withdrawal_severity * 0.3;

        let stress_reduction = (0.2 * location_multiplier * (1.0 - withdrawal_penalty)
            + sample_normal(rng, 0.0, 0.05))
        .max(0.0);

        let mood_improvement = 0.1 * location_multiplier * (1.0 - withdrawal_penalty * 0.5)
            + sample_normal(rng, 0.0, 0.03);

        let self_control_restoration = (0.3
            * location_multiplier
            * (1.0 - withdrawal_penalty * 0.2)
            + sample_normal(rng, 0.0, 0.05))
        .max(0.0);

        ActionOutcome::Rest {
            success: true,
            message: format!("Rested for {:.1}h", action.time_cost),
            stress_reduction,
            mood_improvement,
            self_control_restoration,
        }
    }
}
