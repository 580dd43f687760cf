use crate::card::Card;
use crate::game::deck::Deck;

/// One player's zones for a single simulated turn. `Clone` produces a
/// fully independent copy, which is what the branch engine relies on
/// when exploring speculative futures.
#[derive(Debug, Clone)]
pub struct GameState {
    deck: Deck,
    hand: Vec<Card>,
    banish_pile: Vec<Card>,
    graveyard: Vec<Card>,
    cards_played: Vec<Card>,
}

impl GameState {
    pub fn new(deck: Deck) -> Self {
        GameState {
            deck,
            hand: Vec::new(),
            banish_pile: Vec::new(),
            graveyard: Vec::new(),
            cards_played: Vec::new(),
        }
    }

    /// Draw the opening hand.
    pub fn draw_hand(&mut self, hand_size: usize) {
        self.draw(hand_size);
    }

    /// Draw up to `count` cards from the top of the deck into hand.
    pub fn draw(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(card) = self.deck.draw() {
                self.hand.push(card);
            }
        }
    }

    /// Move a hand card to the played-this-turn list.
    pub fn play_card(&mut self, hand_index: usize) -> bool {
        if hand_index >= self.hand.len() {
            return false;
        }
        let card = self.hand.remove(hand_index);
        self.cards_played.push(card);
        true
    }

    /// Move the given hand cards (by index) to the graveyard.
    pub fn discard_from_hand(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();
        for index in indices.into_iter().rev() {
            if index < self.hand.len() {
                let card = self.hand.remove(index);
                self.graveyard.push(card);
            }
        }
    }

    /// Move the given hand cards (by index) to the banish pile.
    pub fn banish_from_hand(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();
        for index in indices.into_iter().rev() {
            if index < self.hand.len() {
                let card = self.hand.remove(index);
                self.banish_pile.push(card);
            }
        }
    }

    /// Banish `count` cards off the top of the deck.
    pub fn banish_from_deck(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(card) = self.deck.draw() {
                self.banish_pile.push(card);
            }
        }
    }

    /// Discard the entire hand to the graveyard.
    pub fn discard_hand(&mut self) {
        self.graveyard.append(&mut self.hand);
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Vec<Card> {
        &mut self.hand
    }

    pub fn banish_pile(&self) -> &[Card] {
        &self.banish_pile
    }

    pub fn graveyard(&self) -> &[Card] {
        &self.graveyard
    }

    pub fn cards_played(&self) -> &[Card] {
        &self.cards_played
    }

    /// Hand indexes of free cards, in hand order.
    pub fn free_card_indexes(&self) -> Vec<usize> {
        self.hand
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_free())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn free_cards_in_hand(&self) -> Vec<&Card> {
        self.hand.iter().filter(|c| c.is_free()).collect()
    }

    pub fn free_cards_played(&self) -> Vec<&Card> {
        self.cards_played.iter().filter(|c| c.is_free()).collect()
    }

    /// Cards across every zone. Conserved within a branch: zone moves
    /// never create or destroy cards.
    pub fn total_cards(&self) -> usize {
        self.deck.len()
            + self.hand.len()
            + self.banish_pile.len()
            + self.graveyard.len()
            + self.cards_played.len()
    }
}
