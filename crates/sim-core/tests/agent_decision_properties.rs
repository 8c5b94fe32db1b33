use contracts::{
    Action, ActionOutcome, ActionType, Employment, Housing, OutcomeContext, PersonalityTraits,
    RngPolicy,
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim_core::actions::generate_available_actions;
use sim_core::agent::Agent;
use sim_core::behavior;
use sim_core::decision::{softmax, DecisionError, DecisionMaker};
use sim_core::outcome::OutcomeGenerator;
use sim_core::round::evaluate_round;
use sim_core::utility::UtilityCalculator;

fn balanced_agent(id: &str) -> Agent {
    Agent::new(id, PersonalityTraits::balanced())
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_unemployed_work_fails_with_employment_message() {
    let agent = balanced_agent("a:1").with_wealth(1000.0);
    let action = Action::new(ActionType::Work, 160.0);
    let outcome = OutcomeGenerator.generate(
        &agent,
        &action,
        &OutcomeContext::default(),
        &mut SmallRng::seed_from_u64(1),
    );
    match outcome {
        ActionOutcome::Work {
            success,
            message,
            payment,
            ..
        } => {
            assert!(!success);
            assert_eq!(payment, 0.0);
            assert!(message.contains("employment"));
        }
        other => panic!("expected work outcome, got {other:?}"),
    }
}

#[test]
fn scenario_overbetting_fails_with_insufficient_message() {
    let agent = balanced_agent("a:1").with_wealth(20.0);
    let action = Action::new(ActionType::Gamble, 4.0).with_param("bet_amount", 50.0);
    let outcome = OutcomeGenerator.generate(
        &agent,
        &action,
        &OutcomeContext::default(),
        &mut SmallRng::seed_from_u64(1),
    );
    match outcome {
        ActionOutcome::Gambling {
            success,
            message,
            monetary_change,
            ..
        } => {
            assert!(!success);
            assert_eq!(monetary_change, 0.0);
            assert!(message.to_lowercase().contains("insufficient"));
        }
        other => panic!("expected gambling outcome, got {other:?}"),
    }
}

#[test]
fn scenario_withdrawal_reduces_rest_recovery() {
    let context = OutcomeContext {
        location_quality: 0.9,
        ..OutcomeContext::default()
    };
    let action = Action::new(ActionType::Rest, 4.0);

    let mut clean = balanced_agent("a:1");
    clean.alcohol.stock = 0.7;
    clean.alcohol.withdrawal_severity = 0.0;

    let mut withdrawing = balanced_agent("a:1");
    withdrawing.alcohol.stock = 0.7;
    withdrawing.alcohol.withdrawal_severity = 0.5;

    // Identical seeds, identical noise; only the withdrawal term differs.
    for seed in 0..20_u64 {
        let clean_outcome =
            OutcomeGenerator.generate(&clean, &action, &context, &mut SmallRng::seed_from_u64(seed));
        let withdrawing_outcome = OutcomeGenerator.generate(
            &withdrawing,
            &action,
            &context,
            &mut SmallRng::seed_from_u64(seed),
        );
        match (clean_outcome, withdrawing_outcome) {
            (
                ActionOutcome::Rest {
                    stress_reduction: clean_reduction,
                    ..
                },
                ActionOutcome::Rest {
                    stress_reduction: withdrawing_reduction,
                    ..
                },
            ) => assert!(withdrawing_reduction < clean_reduction),
            other => panic!("expected rest outcomes, got {other:?}"),
        }
    }
}

#[test]
fn scenario_near_zero_temperature_selects_the_dominant_action() {
    let mut agent = balanced_agent("a:1");
    agent.internal_state.stress = 0.9;
    agent.home = Some(Housing::default());

    let actions = vec![
        Action::new(ActionType::Rest, 4.0),
        Action::new(ActionType::FindJob, 20.0),
        Action::new(ActionType::Beg, 8.0),
    ];
    let maker = DecisionMaker::new(0.01);

    let distribution = maker
        .action_probabilities(&agent, &actions)
        .expect("nonempty candidates");
    let (dominant, probability) = distribution
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .expect("nonempty distribution");
    assert!(*probability > 0.99);

    // Sampling must agree with the distribution it exposes.
    for seed in 0..50_u64 {
        let chosen = maker
            .choose_action(&agent, &actions, &mut SmallRng::seed_from_u64(seed))
            .expect("nonempty candidates");
        assert_eq!(chosen.action_type, dominant.action_type);
    }
}

#[test]
fn scenario_abstinent_stock_decays_strictly_toward_zero() {
    let mut stock = 0.5;
    for _ in 0..12 {
        let next = behavior::update_addiction_stock(stock, 0.0, 0.93, 1.0);
        assert!(next < stock);
        stock = next;
    }
    assert!(stock < 0.5 * 0.93_f64.powi(11));
    assert!(stock > 0.0);
}

// ---------------------------------------------------------------------------
// Full-cycle integration
// ---------------------------------------------------------------------------

#[test]
fn decision_cycle_spends_budget_and_records_history() {
    let mut agent = balanced_agent("a:1");
    agent.employment = Some(Employment::default());
    agent.home = Some(Housing::default());
    let context = OutcomeContext::default();
    let maker = DecisionMaker::default();
    let mut rng = SmallRng::seed_from_u64(404);

    for _ in 0..4 {
        let candidates = generate_available_actions(&agent);
        if candidates.is_empty() {
            break;
        }
        let action = maker
            .choose_action(&agent, &candidates, &mut rng)
            .expect("candidates are nonempty");
        let time_cost = action.time_cost;
        let spent_before = agent.action_budget.spent_hours;
        let history_before = agent.action_history.len();

        agent.execute_action(action, &context, &mut rng);

        assert_eq!(agent.action_budget.spent_hours, spent_before + time_cost);
        assert_eq!(agent.action_history.len(), history_before + 1);
        assert!(agent.internal_state.wealth >= 0.0);
        assert!((0.0..=1.0).contains(&agent.internal_state.stress));
        assert!((-1.0..=1.0).contains(&agent.internal_state.mood));
        assert!((0.0..=1.0).contains(&agent.internal_state.self_control_resource));
    }
}

#[test]
fn monthly_cycle_resets_cleanly() {
    let mut agent = balanced_agent("a:1");
    agent.action_budget.spend(250.0);
    agent.alcohol.stock = 0.4;
    agent.alcohol.time_since_last_use = 2;

    agent.advance_month(1);
    agent.action_budget.reset();

    assert_eq!(agent.action_budget.spent_hours, 0.0);
    assert!(agent.cravings.alcohol > 0.0);
    let candidates = generate_available_actions(&agent);
    assert!(!candidates.is_empty());
}

#[test]
fn per_agent_policy_reproduces_selections_for_a_population() {
    let agents: Vec<Agent> = (0..24)
        .map(|index| {
            let mut agent = balanced_agent(&format!("agent:{index}"));
            agent.internal_state.wealth = 100.0 + 50.0 * index as f64;
            agent
        })
        .collect();
    let candidates: Vec<Vec<Action>> = agents.iter().map(generate_available_actions).collect();
    let maker = DecisionMaker::default();

    let first = evaluate_round(&agents, &candidates, &maker, 1337, 2, RngPolicy::PerAgent)
        .expect("candidates are nonempty");
    let second = evaluate_round(&agents, &candidates, &maker, 1337, 2, RngPolicy::PerAgent)
        .expect("candidates are nonempty");
    assert_eq!(first, second);
}

#[test]
fn empty_candidate_list_is_a_caller_error() {
    let agent = balanced_agent("a:1");
    let maker = DecisionMaker::default();
    let result = maker.choose_action(&agent, &[], &mut SmallRng::seed_from_u64(1));
    assert_eq!(result, Err(DecisionError::NoCandidates));
}

// ---------------------------------------------------------------------------
// Property suites
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn softmax_is_a_distribution(
        utilities in prop::collection::vec(-50.0_f64..50.0, 1..12),
        temperature in 0.01_f64..2.0,
    ) {
        let probabilities = softmax(&utilities, temperature);
        prop_assert_eq!(probabilities.len(), utilities.len());
        for probability in &probabilities {
            prop_assert!(*probability >= 0.0);
            prop_assert!(*probability <= 1.0 + 1e-9);
        }
        let sum: f64 = probabilities.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_candidate_gets_full_probability(utility in -100.0_f64..100.0) {
        let probabilities = softmax(&[utility], 0.1);
        prop_assert!((probabilities[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn state_dependent_weights_always_sum_to_one(
        craving in 0.0_f64..1.0,
        wealth in 0.0_f64..3000.0,
        stress in 0.0_f64..1.0,
    ) {
        let mut agent = balanced_agent("a:prop");
        agent.cravings.alcohol = craving;
        agent.internal_state.wealth = wealth;
        agent.internal_state.stress = stress;
        let weights = UtilityCalculator.state_dependent_weights(&agent);
        prop_assert!((weights.sum() - 1.0).abs() < 1e-9);
        prop_assert!(weights.financial >= 0.0);
        prop_assert!(weights.habit >= 0.0);
        prop_assert!(weights.addiction >= 0.0);
        prop_assert!(weights.psychological >= 0.0);
    }

    #[test]
    fn gambling_bets_never_exceed_wealth(
        wealth in 0.0_f64..500.0,
        streak in 0_u32..12,
        seed in 0_u64..500,
    ) {
        let mut agent = balanced_agent("a:prop");
        agent.internal_state.wealth = wealth;
        agent.gambling_context.loss_streak = streak;
        let action = Action::new(ActionType::Gamble, 4.0);
        let outcome = OutcomeGenerator.generate(
            &agent,
            &action,
            &OutcomeContext::default(),
            &mut SmallRng::seed_from_u64(seed),
        );
        if let ActionOutcome::Gambling { success, monetary_change, .. } = outcome {
            if success {
                prop_assert!(-monetary_change <= wealth + 1e-9);
            } else {
                prop_assert_eq!(monetary_change, 0.0);
            }
        } else {
            prop_assert!(false, "expected gambling outcome");
        }
    }

    #[test]
    fn drinking_never_exceeds_wealth(
        wealth in 0.0_f64..200.0,
        district_wealth in 0.0_f64..1.0,
        units in 1.0_f64..8.0,
        seed in 0_u64..500,
    ) {
        let mut agent = balanced_agent("a:prop");
        agent.internal_state.wealth = wealth;
        let context = OutcomeContext { district_wealth, ..OutcomeContext::default() };
        let action = Action::new(ActionType::Drink, 2.0).with_param("units", units);
        let outcome = OutcomeGenerator.generate(
            &agent,
            &action,
            &context,
            &mut SmallRng::seed_from_u64(seed),
        );
        if let ActionOutcome::Drinking { success, cost, units_consumed, .. } = outcome {
            if success {
                prop_assert!(cost <= wealth + 1e-9);
                prop_assert!(units_consumed >= 1);
            } else {
                prop_assert_eq!(units_consumed, 0);
                prop_assert_eq!(cost, 0.0);
            }
        } else {
            prop_assert!(false, "expected drinking outcome");
        }
    }

    #[test]
    fn begging_income_respects_the_cap(
        district_wealth in 0.01_f64..1.0,
        location_quality in 0.01_f64..1.0,
        social_density in 0.0_f64..1.0,
        seed in 0_u64..500,
    ) {
        let agent = balanced_agent("a:prop");
        let context = OutcomeContext {
            district_wealth,
            location_quality,
            social_density,
            ..OutcomeContext::default()
        };
        let action = Action::new(ActionType::Beg, 8.0);
        let expected = 5.0 * district_wealth * location_quality * 8.0
            * (0.5 + social_density * 0.8);
        let outcome = OutcomeGenerator.generate(
            &agent,
            &action,
            &context,
            &mut SmallRng::seed_from_u64(seed),
        );
        if let ActionOutcome::Begging { income, .. } = outcome {
            prop_assert!(income >= 0.0);
            prop_assert!(income <= expected * 3.0 + 1e-9);
        } else {
            prop_assert!(false, "expected begging outcome");
        }
    }

    #[test]
    fn work_performance_stays_clamped(
        stress in 0.0_f64..1.0,
        withdrawal in 0.0_f64..1.0,
        mood in -1.0_f64..1.0,
        seed in 0_u64..500,
    ) {
        let mut agent = balanced_agent("a:prop");
        agent.employment = Some(Employment::default());
        agent.internal_state.stress = stress;
        agent.internal_state.mood = mood;
        agent.alcohol.withdrawal_severity = withdrawal;
        let action = Action::new(ActionType::Work, 160.0);
        let outcome = OutcomeGenerator.generate(
            &agent,
            &action,
            &OutcomeContext::default(),
            &mut SmallRng::seed_from_u64(seed),
        );
        if let ActionOutcome::Work { performance, payment, .. } = outcome {
            prop_assert!((0.1..=1.5).contains(&performance));
            prop_assert!(payment >= 0.0);
        } else {
            prop_assert!(false, "expected work outcome");
        }
    }

    #[test]
    fn addiction_stock_stays_in_range(
        stock in 0.0_f64..1.0,
        consumption in 0.0_f64..2.0,
    ) {
        let updated = behavior::update_addiction_stock(stock, consumption, 0.93, 1.0);
        prop_assert!(updated >= 0.0);
        prop_assert!(updated <= 1.0);
    }

    #[test]
    fn tolerance_effect_is_monotone(
        base in 0.0_f64..5.0,
        low in 0.0_f64..1.0,
        high in 0.0_f64..1.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        prop_assert!(
            behavior::calculate_tolerance_effect(base, high)
                <= behavior::calculate_tolerance_effect(base, low) + 1e-12
        );
    }

    #[test]
    fn probability_weighting_stays_in_unit_interval(p in 0.0_f64..=1.0) {
        let gambling = behavior::weight_probability(p, behavior::WeightingContext::Gambling);
        let general = behavior::weight_probability(p, behavior::WeightingContext::General);
        prop_assert!((0.0..=1.0).contains(&gambling));
        prop_assert!((0.0..=1.0).contains(&general));
    }

    #[test]
    fn outcome_application_preserves_state_bounds(
        wealth in 0.0_f64..2000.0,
        mood in -1.0_f64..1.0,
        stress in 0.0_f64..1.0,
        seed in 0_u64..500,
    ) {
        let mut agent = balanced_agent("a:prop");
        agent.internal_state.wealth = wealth;
        agent.internal_state.mood = mood;
        agent.internal_state.stress = stress;
        agent.employment = Some(Employment::default());
        agent.home = Some(Housing::default());

        let mut rng = SmallRng::seed_from_u64(seed);
        let context = OutcomeContext::default();
        let candidates = generate_available_actions(&agent);
        prop_assert!(!candidates.is_empty());
        let action = DecisionMaker::default()
            .choose_action(&agent, &candidates, &mut rng)
            .expect("candidates are nonempty");
        agent.execute_action(action, &context, &mut rng);

        prop_assert!(agent.internal_state.wealth >= 0.0);
        prop_assert!((-1.0..=1.0).contains(&agent.internal_state.mood));
        prop_assert!((0.0..=1.0).contains(&agent.internal_state.stress));
        prop_assert!((0.0..=1.0).contains(&agent.internal_state.self_control_resource));
        prop_assert!((0.0..=1.0).contains(&agent.alcohol.stock));
        prop_assert!((0.0..=1.0).contains(&agent.alcohol.tolerance_level));
    }
}
