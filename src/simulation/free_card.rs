use crate::card::{Card, CostType, CostValue, PostConditionType, PostConditionValue, RestrictionType};
use crate::condition::{cards_that_satisfy, Condition};
use crate::game::GameState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreeCardError {
    #[error("card '{0}' is not in the player's hand")]
    NotInHand(String),
    #[error("cannot pay the cost for '{0}'")]
    CostUnpayable(String),
}

/// How many of the condition's leaves each card in `list` can help
/// satisfy. Higher means more worth keeping.
fn priority_scores(condition: &Condition, list: &[Card]) -> Vec<usize> {
    let map = cards_that_satisfy(condition, list);
    list.iter()
        .map(|card| {
            map.iter()
                .filter(|(_, matches)| matches.iter().any(|c| std::ptr::eq(*c, card)))
                .count()
        })
        .collect()
}

/// Hand indexes sorted least-useful-first, so cost payment spends the
/// cards least likely to matter for the active condition.
fn ascending_priority(condition: &Condition, hand: &[Card]) -> Vec<usize> {
    let scores = priority_scores(condition, hand);
    let mut indexes: Vec<usize> = (0..hand.len()).collect();
    indexes.sort_by_key(|&i| scores[i]);
    indexes
}

fn can_pay_cost(state: &GameState, card: &Card) -> bool {
    let Some(free) = &card.free else {
        return false;
    };
    let Some(cost) = &free.cost else {
        return true;
    };

    // The card itself leaves the hand on activation, so it can never
    // pay its own hand cost.
    let hand_less_card = state.hand().len().saturating_sub(1);

    match cost.cost_type {
        CostType::BanishFromDeck => match &cost.value {
            CostValue::Count(n) => state.deck().len() >= *n,
            CostValue::Cards(_) => false,
        },
        CostType::BanishFromHand | CostType::Discard => match &cost.value {
            CostValue::Count(n) => hand_less_card >= *n,
            CostValue::Cards(names) => names.iter().all(|name| {
                state
                    .hand()
                    .iter()
                    .any(|c| c.name == *name && !std::ptr::eq(c, card))
            }),
        },
        CostType::PayLife => true,
    }
}

fn passes_restrictions(state: &GameState, card: &Card) -> bool {
    let Some(free) = &card.free else {
        return false;
    };
    for restriction in &free.restrictions {
        match restriction {
            RestrictionType::NoSpecialSummon => {}
            RestrictionType::NoMoreDraws => {}
            RestrictionType::NoPreviousDraws => {
                if !state.free_cards_played().is_empty() {
                    return false;
                }
            }
        }
    }
    true
}

/// Whether a free card can be activated right now.
pub fn is_usable(state: &GameState, card: &Card) -> bool {
    let Some(free) = &card.free else {
        return false;
    };

    if free.once_per_turn && state.cards_played().iter().any(|c| c.name == card.name) {
        return false;
    }

    // Draw count plus any deck-banish cost must still be in the deck.
    if state.deck().len() < card.activation_count() {
        return false;
    }

    // A previously played card may have shut off further draws.
    let draws_blocked = state.free_cards_played().iter().any(|c| {
        c.free
            .as_ref()
            .is_some_and(|f| f.restrictions.contains(&RestrictionType::NoMoreDraws))
    });
    if draws_blocked {
        return false;
    }

    if !passes_restrictions(state, card) {
        return false;
    }

    can_pay_cost(state, card)
}

fn pay_cost(state: &mut GameState, card: &Card, condition: &Condition) -> Result<(), FreeCardError> {
    let Some(cost) = card.free.as_ref().and_then(|f| f.cost.clone()) else {
        return Ok(());
    };

    match cost.cost_type {
        CostType::BanishFromDeck => {
            if let CostValue::Count(n) = cost.value {
                state.banish_from_deck(n);
            }
        }
        CostType::BanishFromHand | CostType::Discard => {
            let ordered = ascending_priority(condition, state.hand());
            let selected: Vec<usize> = match &cost.value {
                CostValue::Count(n) => {
                    if ordered.len() < *n {
                        return Err(FreeCardError::CostUnpayable(card.name.clone()));
                    }
                    ordered.into_iter().take(*n).collect()
                }
                CostValue::Cards(names) => {
                    let mut selected = Vec::new();
                    for name in names {
                        let found = ordered.iter().copied().find(|&i| {
                            !selected.contains(&i) && state.hand()[i].name == *name
                        });
                        match found {
                            Some(i) => selected.push(i),
                            None => return Err(FreeCardError::CostUnpayable(card.name.clone())),
                        }
                    }
                    selected
                }
            };

            if cost.cost_type == CostType::BanishFromHand {
                state.banish_from_hand(selected);
            } else {
                state.discard_from_hand(selected);
            }
        }
        CostType::PayLife => {}
    }

    Ok(())
}

/// Reveal cards off the top of the deck, keep the most useful `pick`
/// of them, and return the rest to the bottom.
fn excavate(state: &mut GameState, card: &Card, condition: &Condition) {
    let Some(excavate) = card.free.as_ref().and_then(|f| f.excavate) else {
        return;
    };

    let mut revealed = Vec::new();
    for _ in 0..excavate.count {
        if let Some(c) = state.deck_mut().draw() {
            revealed.push(c);
        }
    }

    let scores = priority_scores(condition, &revealed);
    let mut order: Vec<usize> = (0..revealed.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(scores[i]));

    let keep: Vec<usize> = order.iter().copied().take(excavate.pick).collect();
    let mut returned = Vec::new();
    for (i, c) in revealed.into_iter().enumerate() {
        if keep.contains(&i) {
            state.hand_mut().push(c);
        } else {
            returned.push(c);
        }
    }
    state.deck_mut().add_to_bottom(returned);
}

/// Resolve the card's post-activation requirement. Returns false when
/// it cannot be met.
fn pay_post_condition(state: &mut GameState, card: &Card, condition: &Condition) -> bool {
    let Some(post) = card.free.as_ref().and_then(|f| f.post_condition.clone()) else {
        return true;
    };

    match post.condition_type {
        PostConditionType::BanishFromDeck => {
            if let PostConditionValue::Count(n) = post.value {
                state.banish_from_deck(n);
            }
            true
        }
        PostConditionType::BanishFromHand | PostConditionType::Discard => {
            let ordered = ascending_priority(condition, state.hand());
            let selected: Vec<usize> = match &post.value {
                PostConditionValue::Count(n) => {
                    if ordered.len() < *n {
                        return false;
                    }
                    ordered.into_iter().take(*n).collect()
                }
                PostConditionValue::Card(name) => {
                    match ordered
                        .into_iter()
                        .find(|&i| state.hand()[i].matches(name))
                    {
                        Some(i) => vec![i],
                        None => return false,
                    }
                }
            };

            if post.condition_type == PostConditionType::BanishFromHand {
                state.banish_from_hand(selected);
            } else {
                state.discard_from_hand(selected);
            }
            true
        }
    }
}

/// Play a free card from hand and resolve its full effect chain:
/// mark played, pay cost, draw, excavate, then the post-condition.
/// A failed post-condition discards the whole hand; the branch keeps
/// going with whatever is left (nothing).
pub fn activate(
    state: &mut GameState,
    hand_index: usize,
    condition: &Condition,
) -> Result<(), FreeCardError> {
    let Some(card) = state.hand().get(hand_index).cloned() else {
        return Err(FreeCardError::NotInHand(format!("index {hand_index}")));
    };

    state.play_card(hand_index);

    pay_cost(state, &card, condition)?;

    let draw_count = card.free.as_ref().map_or(0, |f| f.count);
    state.draw(draw_count);

    excavate(state, &card, condition);

    if !pay_post_condition(state, &card, condition) {
        state.discard_hand();
    }

    Ok(())
}
