//! Deterministic outcome application.
//!
//! Folds one [`ActionOutcome`] into the agent, with clamping instead of
//! errors on every numeric drift. The caller contract is exactly-once
//! application per outcome; applying the same outcome twice double-applies
//! its effects. Failed outcomes apply nothing.

use contracts::{ActionOutcome, Employment, GamblingRecord, Housing};
use tracing::trace;

use crate::agent::Agent;
use crate::behavior;

/// Apply an outcome to the agent, exactly once.
pub fn apply_outcome(agent: &mut Agent, outcome: &ActionOutcome) {
    if !outcome.success() {
        return;
    }
    trace!(agent = %agent.id, "applying outcome");

    match outcome {
        ActionOutcome::Work {
            payment,
            performance,
            stress_increase,
            ..
        } => apply_work(agent, *payment, *performance, *stress_increase),
        ActionOutcome::Gambling {
            monetary_change,
            was_near_miss,
            psychological_impact,
            ..
        } => apply_gambling(agent, *monetary_change, *was_near_miss, *psychological_impact),
        ActionOutcome::Drinking {
            cost,
            units_consumed,
            stress_relief,
            mood_change,
            ..
        } => apply_drinking(agent, *cost, *units_consumed, *stress_relief, *mood_change),
        ActionOutcome::Begging {
            income,
            social_cost,
            ..
        } => apply_begging(agent, *income, *social_cost),
        ActionOutcome::JobSearch {
            job_found,
            job_quality,
            stress_change,
            ..
        } => apply_job_search(agent, *job_found, *job_quality, *stress_change),
        ActionOutcome::HousingSearch {
            housing_found,
            housing_quality,
            rent_cost,
            ..
        } => apply_housing_search(agent, *housing_found, *housing_quality, *rent_cost),
        ActionOutcome::Move {
            move_cost,
            stress_change,
            new_location,
            ..
        } => apply_move(agent, *move_cost, *stress_change, new_location.as_deref()),
        ActionOutcome::Rest {
            stress_reduction,
            mood_improvement,
            self_control_restoration,
            ..
        } => apply_rest(agent, *stress_reduction, *mood_improvement, *self_control_restoration),
    }
}

fn apply_work(agent: &mut Agent, payment: f64, performance: f64, stress_increase: f64) {
    agent.internal_state.wealth += payment;
    agent.internal_state.stress += stress_increase;

    // Effort depletes self-control in proportion to the stress taken on.
    let self_control_cost = 0.1 * (stress_increase / 0.05);
    agent.internal_state.self_control_resource -= self_control_cost;
    agent.internal_state.clamp_bounds();

    if let Some(employment) = agent.employment.as_mut() {
        employment.performance_history.record(performance);
        employment.performance_history.months_employed += 1;
    }
}

fn apply_gambling(
    agent: &mut Agent,
    monetary_change: f64,
    was_near_miss: bool,
    psychological_impact: f64,
) {
    agent.internal_state.wealth += monetary_change;
    agent.internal_state.wealth = agent.internal_state.wealth.max(0.0);

    agent.internal_state.mood += psychological_impact;

    // One session reinforces the gambling habit.
    agent.habit_stocks.gambling = behavior::update_habit_stock(
        agent.habit_stocks.gambling,
        1.0,
        behavior::HABIT_LAMBDA,
    );

    agent.internal_state.self_control_resource -= 0.15;

    if monetary_change < 0.0 {
        let stress_increase =
            (monetary_change.abs() / agent.internal_state.wealth.max(1.0)).min(0.2);
        agent.internal_state.stress += stress_increase;
    }
    agent.internal_state.clamp_bounds();

    let context = &mut agent.gambling_context;
    context.total_games += 1;
    if monetary_change > 0.0 {
        context.total_wins += monetary_change;
        context.loss_streak = 0;
    } else {
        context.total_losses += monetary_change.abs();
        context.loss_streak += 1;
    }
    context.push_outcome(GamblingRecord {
        monetary_change,
        was_near_miss,
        psychological_impact,
    });
}

fn apply_drinking(
    agent: &mut Agent,
    cost: f64,
    units_consumed: u32,
    stress_relief: f64,
    mood_change: f64,
) {
    agent.internal_state.wealth -= cost;
    agent.internal_state.mood += mood_change;
    agent.internal_state.stress -= stress_relief;

    // Consumption resets withdrawal and feeds stock, tolerance, and habit.
    agent.alcohol.time_since_last_use = 0;
    agent.alcohol.withdrawal_severity = 0.0;

    let consumption = f64::from(units_consumed) / 10.0;
    agent.alcohol.stock = behavior::update_addiction_stock(
        agent.alcohol.stock,
        consumption,
        behavior::ADDICTION_DECAY_RATE,
        1.0,
    );
    agent.alcohol.tolerance_level =
        (agent.alcohol.tolerance_level + consumption * 0.02).min(1.0);

    agent.habit_stocks.drinking = behavior::update_habit_stock(
        agent.habit_stocks.drinking,
        consumption,
        behavior::HABIT_LAMBDA,
    );

    agent.internal_state.self_control_resource -= 0.1 * consumption;
    agent.internal_state.clamp_bounds();
}

fn apply_begging(agent: &mut Agent, income: f64, social_cost: f64) {
    agent.internal_state.wealth += income;
    agent.internal_state.mood -= social_cost;
    agent.internal_state.stress += social_cost * 0.5;
    agent.internal_state.clamp_bounds();
}

fn apply_job_search(agent: &mut Agent, job_found: bool, job_quality: f64, stress_change: f64) {
    agent.internal_state.stress += stress_change;

    if job_found {
        let base_salary = 1500.0 + job_quality * 2000.0;
        agent.employment = Some(Employment {
            job_quality,
            base_salary,
            ..Employment::default()
        });
        // Better jobs come with a costlier lifestyle.
        agent.internal_state.monthly_expenses = 600.0 + job_quality * 400.0;
        agent.internal_state.mood += 0.3;
    }
    agent.internal_state.clamp_bounds();
}

fn apply_housing_search(
    agent: &mut Agent,
    housing_found: bool,
    housing_quality: f64,
    rent_cost: f64,
) {
    if !housing_found {
        return;
    }

    let previous_rent = agent
        .home
        .as_ref()
        .map(|housing| housing.monthly_rent)
        .unwrap_or(0.0);
    agent.home = Some(Housing {
        housing_quality,
        monthly_rent: rent_cost,
        ..Housing::default()
    });
    agent.internal_state.monthly_expenses += rent_cost - previous_rent;

    agent.internal_state.mood += 0.2;
    agent.internal_state.stress -= 0.1;
    agent.internal_state.clamp_bounds();
}

fn apply_move(agent: &mut Agent, move_cost: f64, stress_change: f64, new_location: Option<&str>) {
    agent.internal_state.wealth -= move_cost;
    agent.internal_state.stress += stress_change;
    if let Some(location) = new_location {
        agent.current_location = Some(location.to_string());
    }
    agent.internal_state.clamp_bounds();
}

fn apply_rest(
    agent: &mut Agent,
    stress_reduction: f64,
    mood_improvement: f64,
    self_control_restoration: f64,
) {
    agent.internal_state.stress -= stress_reduction;
    agent.internal_state.mood += mood_improvement;
    agent.internal_state.self_control_resource += self_control_restoration;
    agent.internal_state.clamp_bounds();
}
