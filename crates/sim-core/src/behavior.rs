//! Behavioral-economics primitives as pure, stateless functions.
//!
//! Everything here is deterministic math over bounded scalars; the callers
//! (utility calculator, state updater, monthly progression) own the state.

use contracts::PersonalityTraits;

/// Monthly exponential discount factor for quasi-hyperbolic discounting.
pub const MONTHLY_DELTA: f64 = 0.95;

/// Monthly decay rate of the addiction stock.
pub const ADDICTION_DECAY_RATE: f64 = 0.93;

/// Persistence parameter for habit-stock exponential smoothing.
pub const HABIT_LAMBDA: f64 = 0.8;

/// Days until withdrawal severity peaks.
pub const WITHDRAWAL_PEAK_DAYS: u32 = 7;

// ---------------------------------------------------------------------------
// Prospect theory
// ---------------------------------------------------------------------------

/// Prospect-theory value of an outcome relative to a reference point.
///
/// Gains are valued with a concave power function (`deviation^alpha`);
/// losses with a convex one scaled by loss aversion
/// (`-lambda * (-deviation)^beta`).
pub fn evaluate_outcome(
    outcome: f64,
    reference_point: f64,
    personality: &PersonalityTraits,
) -> f64 {
    let deviation = outcome - reference_point;
    if deviation >= 0.0 {
        deviation.powf(personality.risk_preference_alpha)
    } else {
        -personality.risk_preference_lambda
            * (-deviation).powf(personality.risk_preference_beta)
    }
}

/// Probability-weighting context; gambling uses a stronger distortion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingContext {
    Gambling,
    General,
}

/// Kahneman-Tversky probability weighting.
///
/// Overweights small probabilities and underweights large ones. Returns the
/// exact bound at 0 and 1.
pub fn weight_probability(probability: f64, context: WeightingContext) -> f64 {
    if probability <= 0.0 {
        return 0.0;
    }
    if probability >= 1.0 {
        return 1.0;
    }
    let gamma = match context {
        WeightingContext::Gambling => 0.69,
        WeightingContext::General => 0.85,
    };
    let p = probability.powf(gamma);
    let q = (1.0 - probability).powf(gamma);
    p / (p + q).powf(1.0 / gamma)
}

// ---------------------------------------------------------------------------
// Temporal discounting
// ---------------------------------------------------------------------------

/// Quasi-hyperbolic (beta-delta) discounting of a future utility.
///
/// The present-bias factor starts at `baseline_impulsivity` and is pushed
/// further toward the present by high cognitive load (>0.7) and strong
/// craving (>0.5), then clamped to [0.1, 1.0]. A delay of one month applies
/// only the present-bias factor; longer delays compound the monthly delta.
pub fn discount_future_utility(
    utility: f64,
    delay_months: u32,
    personality: &PersonalityTraits,
    cognitive_load: f64,
    craving_intensity: f64,
) -> f64 {
    if delay_months == 0 {
        return utility;
    }

    let mut beta = personality.baseline_impulsivity;
    if cognitive_load > 0.7 {
        beta *= 0.8;
    }
    if craving_intensity > 0.5 {
        beta *= 1.0 - craving_intensity * 0.3;
    }
    let beta = beta.clamp(0.1, 1.0);

    if delay_months == 1 {
        beta * utility
    } else {
        beta * MONTHLY_DELTA.powi(delay_months as i32) * utility
    }
}

/// Pure hyperbolic discounting: `utility / (1 + k * delay)`.
pub fn calculate_hyperbolic_discount(utility: f64, delay: u32, k: f64) -> f64 {
    utility / (1.0 + k * f64::from(delay))
}

// ---------------------------------------------------------------------------
// Dual process
// ---------------------------------------------------------------------------

/// Effective System 2 (deliberative) weight for the current state.
///
/// Deliberation starts from the agent's cognitive type scaled by available
/// self-control, is halved per unit of cognitive load, and is further
/// suppressed by strong craving (>0.7) and high stress (>0.6). A floor of
/// 0.1 keeps some deliberative influence alive.
pub fn calculate_effective_theta(
    personality: &PersonalityTraits,
    self_control_resource: f64,
    cognitive_load: f64,
    max_craving: f64,
    stress: f64,
) -> f64 {
    let mut theta = personality.cognitive_type * self_control_resource;
    theta *= 1.0 - cognitive_load * 0.5;
    if max_craving > 0.7 {
        theta *= 1.0 - max_craving * 0.6;
    }
    if stress > 0.6 {
        theta *= 1.0 - stress * 0.3;
    }
    theta.clamp(0.1, 1.0)
}

/// Blend fast and slow evaluations: `(1 - theta) * s1 + theta * s2`.
pub fn combine_system_evaluations(system1: f64, system2: f64, theta: f64) -> f64 {
    (1.0 - theta) * system1 + theta * system2
}

// ---------------------------------------------------------------------------
// Gambling biases
// ---------------------------------------------------------------------------

/// Gambler's fallacy: perceived win probability rises with a loss streak.
///
/// No effect for streaks of two or fewer; beyond that the perceived
/// probability grows linearly with the streak, capped at 0.95.
pub fn apply_gamblers_fallacy(
    objective_probability: f64,
    loss_streak: u32,
    bias_strength: f64,
) -> f64 {
    if loss_streak <= 2 {
        return objective_probability;
    }
    let bias = bias_strength * 0.1 * f64::from(loss_streak - 2);
    (objective_probability + bias).min(0.95)
}

/// Near-miss effect: a just-missed win raises gambling appeal.
pub fn apply_near_miss_effect(base_utility: f64, was_near_miss: bool, bias_strength: f64) -> f64 {
    if !was_near_miss {
        return base_utility;
    }
    base_utility + 0.3 * bias_strength
}

/// Hot-hand fallacy: recent wins raise gambling appeal.
pub fn apply_hot_hand_fallacy(base_utility: f64, recent_wins: u32, bias_strength: f64) -> f64 {
    if recent_wins <= 1 {
        return base_utility;
    }
    base_utility + bias_strength * 0.15 * f64::from(recent_wins)
}

// ---------------------------------------------------------------------------
// Habit formation
// ---------------------------------------------------------------------------

/// Exponentially-smoothed habit stock update.
pub fn update_habit_stock(current_stock: f64, consumption: f64, lambda: f64) -> f64 {
    lambda * current_stock + (1.0 - lambda) * consumption
}

/// Utility of habitual consumption under a multiplicative habit model.
///
/// With no habit formed the utility is `ln(consumption)`; an established
/// habit divides consumption by `stock^phi`, so the same consumption yields
/// less as the habit deepens. The log argument is floored at 0.01.
pub fn calculate_habit_utility(consumption: f64, habit_stock: f64, phi: f64) -> f64 {
    if habit_stock <= 0.0 {
        return consumption.max(0.01).ln();
    }
    let effective = consumption / habit_stock.powf(phi);
    effective.max(0.01).ln()
}

// ---------------------------------------------------------------------------
// Addiction dynamics
// ---------------------------------------------------------------------------

/// Withdrawal severity from addiction stock and days of abstinence.
///
/// Zero with no stock or no abstinence. Severity ramps linearly to a peak
/// at [`WITHDRAWAL_PEAK_DAYS`], then declines back to zero over the
/// following 14 days. Capped at 1.
pub fn calculate_withdrawal_severity(addiction_stock: f64, time_since_use: u32) -> f64 {
    if time_since_use == 0 || addiction_stock == 0.0 {
        return 0.0;
    }
    let base_severity = addiction_stock * 0.5;
    let time_factor = if time_since_use <= WITHDRAWAL_PEAK_DAYS {
        f64::from(time_since_use) / f64::from(WITHDRAWAL_PEAK_DAYS)
    } else {
        (1.0 - f64::from(time_since_use - WITHDRAWAL_PEAK_DAYS) / 14.0).max(0.0)
    };
    (base_severity * time_factor).min(1.0)
}

/// Tolerance dampening of a substance effect.
pub fn calculate_tolerance_effect(base_effect: f64, tolerance_level: f64) -> f64 {
    base_effect * (1.0 - tolerance_level * 0.8)
}

/// Addiction stock update: monthly decay plus diminishing-returns growth
/// from consumption, capped at `max_stock`.
pub fn update_addiction_stock(
    current_stock: f64,
    consumption: f64,
    decay_rate: f64,
    max_stock: f64,
) -> f64 {
    let decayed = current_stock * decay_rate;
    let increase = consumption * 0.1 * (1.0 - current_stock);
    (decayed + increase).min(max_stock)
}
