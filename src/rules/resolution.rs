use crate::components::board::{TileState, Token};

/// Base resolution rule, keyed by the drawn token kind.
///
/// `Some(state)` rewrites the drawing stack; `None` leaves it untouched.
/// Wastes tokens are inert. DevB tokens are inert at this tier too; the
/// disruption extension escalates them by drawing a card instead.
pub fn base_outcome(token: Token) -> Option<TileState> {
    match token {
        Token::Wilds => Some(TileState::Wilds),
        Token::DevA => Some(TileState::Wastes),
        Token::Wastes => None,
        Token::DevB => None,
    }
}
