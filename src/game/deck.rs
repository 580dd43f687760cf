use crate::card::{Card, CardDetails};
use crate::rng::GameRng;

/// Filler card used to pad a deck list up to its declared size.
pub const BLANK_CARD_NAME: &str = "Empty Card";

fn blank_card() -> Card {
    Card::new(
        BLANK_CARD_NAME,
        &CardDetails {
            tags: vec![
                "Empty".to_string(),
                "Blank".to_string(),
                "Non Engine".to_string(),
            ],
            ..Default::default()
        },
    )
}

/// Ordered stack of cards. The top is index 0; cards only leave via
/// `draw` and only return via `add_to_bottom`.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck, padding with blank cards up to `deck_size`.
    pub fn new(mut cards: Vec<Card>, deck_size: usize) -> Self {
        while cards.len() < deck_size {
            cards.push(blank_card());
        }
        Deck { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn add_to_bottom(&mut self, cards: Vec<Card>) {
        self.cards.extend(cards);
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardDetails;

    fn named(name: &str) -> Card {
        Card::new(name, &CardDetails::default())
    }

    #[test]
    fn pads_to_declared_size_with_blanks() {
        let deck = Deck::new(vec![named("Card A"), named("Card B")], 40);
        assert_eq!(deck.len(), 40);
        let blanks = deck
            .cards()
            .iter()
            .filter(|c| c.name == BLANK_CARD_NAME)
            .count();
        assert_eq!(blanks, 38);
    }

    #[test]
    fn does_not_trim_oversized_lists() {
        let cards: Vec<Card> = (0..45).map(|i| named(&format!("Card {i}"))).collect();
        let deck = Deck::new(cards, 40);
        assert_eq!(deck.len(), 45);
    }

    #[test]
    fn draw_removes_from_top() {
        let mut deck = Deck::new(vec![named("Top"), named("Bottom")], 2);
        assert_eq!(deck.draw().unwrap().name, "Top");
        assert_eq!(deck.draw().unwrap().name, "Bottom");
        assert!(deck.draw().is_none());
    }

    #[test]
    fn add_to_bottom_appends() {
        let mut deck = Deck::new(vec![named("Top")], 1);
        deck.add_to_bottom(vec![named("Returned")]);
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.draw().unwrap().name, "Top");
        assert_eq!(deck.draw().unwrap().name, "Returned");
    }

    #[test]
    fn shuffle_is_seed_deterministic() {
        let cards: Vec<Card> = (0..20).map(|i| named(&format!("Card {i}"))).collect();
        let mut a = Deck::new(cards.clone(), 20);
        let mut b = Deck::new(cards, 20);

        a.shuffle(&mut GameRng::new(Some(7)));
        b.shuffle(&mut GameRng::new(Some(7)));

        let names_a: Vec<&str> = a.cards().iter().map(|c| c.name.as_str()).collect();
        let names_b: Vec<&str> = b.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names_a, names_b);
    }
}
