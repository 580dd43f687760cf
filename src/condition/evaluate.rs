use crate::card::{match_cards, Card};
use crate::condition::ast::{CardCondition, Condition, ConditionOperator, Location, LogicOperator};

/// Outcome of evaluating one condition tree against a hand/deck
/// snapshot. `satisfied` holds the canonical rendering of every
/// sub-condition that held, the tree itself stays untouched.
#[derive(Debug, Clone, Default)]
pub struct EvaluationResult {
    pub success: bool,
    pub satisfied: Vec<String>,
}

struct CheckOutcome<'a> {
    success: bool,
    /// Cards consumed by satisfied leaves, identified by reference.
    used: Vec<&'a Card>,
}

fn check<'a>(
    condition: &Condition,
    hand: &[&'a Card],
    deck: &'a [Card],
    satisfied: &mut Vec<String>,
) -> CheckOutcome<'a> {
    let outcome = match condition {
        Condition::Card(leaf) => check_leaf(leaf, hand, deck),
        Condition::Logic(logic) => match logic.operator {
            LogicOperator::And => {
                // Later children must not re-consume cards a sibling
                // already used.
                let mut success = true;
                let mut used: Vec<&Card> = Vec::new();
                for child in [&logic.left, &logic.right] {
                    let remaining: Vec<&Card> = hand
                        .iter()
                        .copied()
                        .filter(|c| !used.iter().any(|u| std::ptr::eq(*u, *c)))
                        .collect();
                    let ret = check(child, &remaining, deck, satisfied);
                    if ret.success {
                        used.extend(ret.used);
                    } else {
                        success = false;
                    }
                }
                CheckOutcome { success, used }
            }
            LogicOperator::Or => {
                // Both children see the same unmodified hand; an OR
                // consumes nothing.
                let left = check(&logic.left, hand, deck, satisfied).success;
                let right = check(&logic.right, hand, deck, satisfied).success;
                CheckOutcome {
                    success: left || right,
                    used: Vec::new(),
                }
            }
        },
    };

    if outcome.success {
        satisfied.push(condition.to_string());
    }
    outcome
}

fn check_leaf<'a>(leaf: &CardCondition, hand: &[&'a Card], deck: &'a [Card]) -> CheckOutcome<'a> {
    let matching: Vec<&Card> = match leaf.location {
        Location::Hand => hand
            .iter()
            .copied()
            .filter(|c| c.matches(&leaf.card_name))
            .collect(),
        Location::Deck => deck.iter().filter(|c| c.matches(&leaf.card_name)).collect(),
    };
    let count = matching.len();

    let (success, used) = match leaf.operator {
        ConditionOperator::AtLeast => (
            count >= leaf.card_count,
            matching.into_iter().take(leaf.card_count).collect(),
        ),
        ConditionOperator::Exactly => (
            count == leaf.card_count,
            matching.into_iter().take(leaf.card_count).collect(),
        ),
        // Absence has no cards to consume.
        ConditionOperator::NoMore => (count <= leaf.card_count, Vec::new()),
    };

    CheckOutcome { success, used }
}

/// Visit permutations of `items` lazily (Heap's algorithm), stopping as
/// soon as the visitor returns true.
fn for_each_permutation<'a, F>(items: &mut [&'a Card], f: &mut F) -> bool
where
    F: FnMut(&[&'a Card]) -> bool,
{
    fn walk<'a, F>(items: &mut [&'a Card], k: usize, f: &mut F) -> bool
    where
        F: FnMut(&[&'a Card]) -> bool,
    {
        if k <= 1 {
            return f(items);
        }
        for i in 0..k {
            if walk(items, k - 1, f) {
                return true;
            }
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
        }
        false
    }

    let len = items.len();
    walk(items, len, f)
}

/// Evaluate a condition tree against a hand and deck.
///
/// A tree with any AND node needs a disjoint card assignment, so the
/// hand ordering is searched exhaustively (greedy consumption depends
/// on order) until one ordering satisfies the whole tree. Trees without
/// AND get a single linear pass.
pub fn evaluate(condition: &Condition, hand: &[Card], deck: &[Card]) -> EvaluationResult {
    let mut refs: Vec<&Card> = hand.iter().collect();

    if condition.has_and() {
        let mut best: Vec<String> = Vec::new();
        let mut success = false;
        for_each_permutation(&mut refs, &mut |ordering| {
            let mut satisfied = Vec::new();
            let outcome = check(condition, ordering, deck, &mut satisfied);
            if satisfied.len() > best.len() {
                best = satisfied;
            }
            if outcome.success {
                success = true;
            }
            outcome.success
        });
        EvaluationResult {
            success,
            satisfied: best,
        }
    } else {
        let mut satisfied = Vec::new();
        let success = check(condition, &refs, deck, &mut satisfied).success;
        EvaluationResult { success, satisfied }
    }
}

/// For each leaf of the tree, every card in `list` that matches it,
/// ignoring count and operator. Used to rank which cards are worth
/// keeping when paying costs.
pub fn cards_that_satisfy<'c, 'a>(
    condition: &'c Condition,
    list: &'a [Card],
) -> Vec<(&'c CardCondition, Vec<&'a Card>)> {
    let mut map = Vec::new();
    collect_leaves(condition, list, &mut map);
    map
}

fn collect_leaves<'c, 'a>(
    condition: &'c Condition,
    list: &'a [Card],
    map: &mut Vec<(&'c CardCondition, Vec<&'a Card>)>,
) {
    match condition {
        Condition::Card(leaf) => {
            map.push((leaf, match_cards(&[leaf.card_name.as_str()], list)));
        }
        Condition::Logic(logic) => {
            collect_leaves(&logic.left, list, map);
            collect_leaves(&logic.right, list, map);
        }
    }
}
