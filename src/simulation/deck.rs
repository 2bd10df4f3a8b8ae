use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::data::cards::DisruptionCard;

/// Resource: draw pile and discard pile for the disruption extension.
///
/// Every loaded card is always in exactly one of the two piles. When the
/// draw pile runs out, the discard pile is shuffled back in.
#[derive(Resource, Debug, Default)]
pub struct DisruptionDeck {
    draw_pile: Vec<DisruptionCard>,
    discard: Vec<DisruptionCard>,
    enabled: bool,
}

impl DisruptionDeck {
    /// Build an active deck, shuffled once at load time.
    pub fn new(mut cards: Vec<DisruptionCard>, rng: &mut SmallRng) -> Self {
        cards.shuffle(rng);
        Self {
            draw_pile: cards,
            discard: Vec::new(),
            enabled: true,
        }
    }

    /// Placeholder deck for runs without the extension.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether DevB draws consult the deck at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn total_cards(&self) -> usize {
        self.draw_pile.len() + self.discard.len()
    }

    /// Draw the top card, moving it to the discard pile. Reshuffles the
    /// discard pile back into the draw pile on exhaustion. `None` only
    /// when the whole card set is empty.
    pub fn draw(&mut self, rng: &mut SmallRng) -> Option<DisruptionCard> {
        if self.draw_pile.is_empty() {
            if self.discard.is_empty() {
                return None;
            }
            self.reshuffle(rng);
        }
        let card = self.draw_pile.remove(0);
        self.discard.push(card.clone());
        Some(card)
    }

    fn reshuffle(&mut self, rng: &mut SmallRng) {
        self.draw_pile.append(&mut self.discard);
        self.draw_pile.shuffle(rng);
    }
}
