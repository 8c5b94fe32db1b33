//! Candidate action generation.
//!
//! Location-aware generation (travel-adjusted time costs, reachable
//! targets) belongs to the movement collaborator; this is the fallback set
//! driven purely by agent state and the monthly time budget.

use contracts::{Action, ActionType};

use crate::agent::Agent;

/// List the actions the agent can currently take. Each candidate is gated
/// on the remaining time budget; money gates apply where the action is
/// pointless without cash (drinking, gambling).
pub fn generate_available_actions(agent: &Agent) -> Vec<Action> {
    let mut actions = Vec::new();
    let budget = &agent.action_budget;
    let wealth = agent.internal_state.wealth;

    if budget.can_afford(ActionType::Rest.base_time_cost()) {
        actions.push(Action::new(ActionType::Rest, ActionType::Rest.base_time_cost()));
    }

    // Heading home only makes sense when housed and away.
    if let Some(home) = agent.home.as_ref() {
        let at_home = match (&agent.current_location, &home.plot_id) {
            (Some(current), Some(plot)) => current == plot,
            _ => false,
        };
        if !at_home && budget.can_afford(ActionType::MoveHome.base_time_cost()) {
            let mut action =
                Action::new(ActionType::MoveHome, ActionType::MoveHome.base_time_cost());
            if let Some(plot) = home.plot_id.clone() {
                action = action.with_target(plot);
            }
            actions.push(action);
        }
    }

    if agent.employment.is_some() && budget.can_afford(ActionType::Work.base_time_cost()) {
        actions.push(Action::new(ActionType::Work, ActionType::Work.base_time_cost()));
    }

    if agent.employment.is_none() && budget.can_afford(ActionType::FindJob.base_time_cost()) {
        actions.push(Action::new(
            ActionType::FindJob,
            ActionType::FindJob.base_time_cost(),
        ));
    }

    if agent.home.is_none() && budget.can_afford(ActionType::FindHousing.base_time_cost()) {
        actions.push(Action::new(
            ActionType::FindHousing,
            ActionType::FindHousing.base_time_cost(),
        ));
    }

    if wealth > 20.0 && budget.can_afford(ActionType::Drink.base_time_cost()) {
        actions.push(
            Action::new(ActionType::Drink, ActionType::Drink.base_time_cost())
                .with_param("units", 2.0),
        );
    }

    if wealth > 10.0 && budget.can_afford(ActionType::Gamble.base_time_cost()) {
        actions.push(Action::new(
            ActionType::Gamble,
            ActionType::Gamble.base_time_cost(),
        ));
    }

    // Last resort, always on the table while time remains.
    if budget.can_afford(ActionType::Beg.base_time_cost()) {
        actions.push(Action::new(ActionType::Beg, ActionType::Beg.base_time_cost()));
    }

    actions
}
