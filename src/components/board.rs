use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of stacks on the board.
pub const STACK_COUNT: usize = 11;

/// One unit drawn from or returned to the token pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    Wilds,
    Wastes,
    DevA,
    DevB,
}

impl Token {
    /// Canonical enumeration order. Weighted draws and the empty-pool
    /// fallback both walk this array, so the order is load-bearing for
    /// reproducibility.
    pub const ALL: [Token; 4] = [Token::Wilds, Token::Wastes, Token::DevA, Token::DevB];

    pub fn index(self) -> usize {
        match self {
            Token::Wilds => 0,
            Token::Wastes => 1,
            Token::DevA => 2,
            Token::DevB => 3,
        }
    }

    /// Token a stack emits into the pool for its current state.
    pub fn from_state(state: TileState) -> Token {
        match state {
            TileState::Wilds => Token::Wilds,
            TileState::Wastes => Token::Wastes,
            TileState::DevA => Token::DevA,
            TileState::DevB => Token::DevB,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Token::Wilds => "WILDS",
            Token::Wastes => "WASTES",
            Token::DevA => "DEVA",
            Token::DevB => "DEVB",
        }
    }

    pub fn from_name(name: &str) -> Option<Token> {
        match name.to_uppercase().as_str() {
            "WILDS" => Some(Token::Wilds),
            "WASTES" => Some(Token::Wastes),
            "DEVA" => Some(Token::DevA),
            "DEVB" => Some(Token::DevB),
            _ => None,
        }
    }
}

/// Current state of a stack. Same four values as [`Token`], kept as a
/// separate type: one is a unit in circulation, the other is board state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Wilds,
    Wastes,
    DevA,
    DevB,
}

impl TileState {
    pub fn from_token(token: Token) -> TileState {
        match token {
            Token::Wilds => TileState::Wilds,
            Token::Wastes => TileState::Wastes,
            Token::DevA => TileState::DevA,
            Token::DevB => TileState::DevB,
        }
    }

    /// Small-integer encoding used by timeline records and the exported
    /// report legend.
    pub fn code(self) -> u8 {
        match self {
            TileState::Wilds => 1,
            TileState::Wastes => 2,
            TileState::DevA => 3,
            TileState::DevB => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<TileState> {
        match code {
            1 => Some(TileState::Wilds),
            2 => Some(TileState::Wastes),
            3 => Some(TileState::DevA),
            4 => Some(TileState::DevB),
            _ => None,
        }
    }

    /// Display color used by external visualizers.
    pub fn color(self) -> &'static str {
        match self {
            TileState::Wilds => "green",
            TileState::Wastes => "brown",
            TileState::DevA => "pink",
            TileState::DevB => "blue",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileState::Wilds => "WILDS",
            TileState::Wastes => "WASTES",
            TileState::DevA => "DEVA",
            TileState::DevB => "DEVB",
        }
    }

    pub fn from_name(name: &str) -> Option<TileState> {
        Token::from_name(name).map(TileState::from_token)
    }
}

/// Ring classification of a stack; fixed at spawn time.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ring {
    Inner,
    Middle,
    Outer,
}

impl Ring {
    /// 1 is inner, 2-7 middle, 8-11 outer.
    pub fn from_id(id: u8) -> Ring {
        match id {
            1 => Ring::Inner,
            2..=7 => Ring::Middle,
            _ => Ring::Outer,
        }
    }

    /// Middle-ring draws go back into the pool at the end of a turn;
    /// inner and outer draws stay on the board.
    pub fn recycles_token(self) -> bool {
        matches!(self, Ring::Middle)
    }
}

/// Stable board identifier for a stack (1..=11).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackId(pub u8);

/// Mutable board state of a stack.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub state: TileState,
}
