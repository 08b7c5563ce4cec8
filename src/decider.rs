use crate::action::Action;
use crate::costs::CostVector;

/// Picks the cheapest action. Ties resolve UP, then DOWN, then LEFT, and
/// RIGHT only when nothing earlier is minimal.
pub fn decide(net: &CostVector) -> Action {
    let is_min = |action: Action| {
        let cost = net.get(action);
        Action::ALL.iter().all(|other| cost <= net.get(*other))
    };

    if is_min(Action::Up) {
        Action::Up
    } else if is_min(Action::Down) {
        Action::Down
    } else if is_min(Action::Left) {
        Action::Left
    } else {
        Action::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_costs_pick_up() {
        assert_eq!(decide(&CostVector::uniform(1.0)), Action::Up);
        assert_eq!(decide(&CostVector::zero()), Action::Up);
    }

    #[test]
    fn ties_follow_precedence_order() {
        assert_eq!(decide(&CostVector::new(2.0, 1.0, 1.0, 1.0)), Action::Down);
        assert_eq!(decide(&CostVector::new(2.0, 2.0, 1.0, 1.0)), Action::Left);
        assert_eq!(decide(&CostVector::new(2.0, 2.0, 2.0, 1.0)), Action::Right);
    }

    #[test]
    fn strict_minimum_wins_regardless_of_position() {
        assert_eq!(decide(&CostVector::new(0.0, -1.0, 5.0, 5.0)), Action::Down);
        assert_eq!(decide(&CostVector::new(3.0, 2.0, 1.0, 0.0)), Action::Right);
        assert_eq!(decide(&CostVector::new(-3.0, 2.0, 1.0, 0.0)), Action::Up);
    }

    #[test]
    fn up_and_right_tie_still_picks_up() {
        assert_eq!(decide(&CostVector::new(-1.0, 0.0, 0.0, -1.0)), Action::Up);
    }
}
