use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::board::Token;

/// Default per-kind capacity when no override is supplied.
pub const DEFAULT_POOL_LIMIT: u32 = 20;

/// Resource: the capacity-limited multiset of tokens available for drawing.
///
/// `add` enforces the per-kind limit; `put_back` deliberately does not.
/// Recycled tokens are already-in-play units and must never be rejected,
/// so the asymmetry is part of the contract.
#[derive(Resource, Debug, Clone)]
pub struct TokenPool {
    counts: [u32; Token::ALL.len()],
    limits: [u32; Token::ALL.len()],
}

impl Default for TokenPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_LIMIT)
    }
}

impl TokenPool {
    pub fn new(default_limit_each: u32) -> Self {
        Self {
            counts: [0; Token::ALL.len()],
            limits: [default_limit_each; Token::ALL.len()],
        }
    }

    pub fn with_limits(limits: [u32; Token::ALL.len()]) -> Self {
        Self {
            counts: [0; Token::ALL.len()],
            limits,
        }
    }

    /// Configuration-time limit override; not called mid-run.
    pub fn set_limit(&mut self, token: Token, limit: u32) {
        self.limits[token.index()] = limit;
    }

    pub fn limit(&self, token: Token) -> u32 {
        self.limits[token.index()]
    }

    pub fn count(&self, token: Token) -> u32 {
        self.counts[token.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Add one token, subject to the per-kind limit. A full kind drops the
    /// token silently; this is not an error.
    pub fn add(&mut self, token: Token) {
        let i = token.index();
        if self.counts[i] < self.limits[i] {
            self.counts[i] += 1;
        }
    }

    /// Draw one token, weighted by the current counts; `None` if the pool
    /// is empty. The drawn unit leaves the visible counts immediately.
    pub fn draw_one(&mut self, rng: &mut SmallRng) -> Option<Token> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut r = rng.random_range(0..total);
        for token in Token::ALL {
            let c = self.counts[token.index()];
            if r < c {
                self.counts[token.index()] -= 1;
                return Some(token);
            }
            r -= c;
        }
        None
    }

    /// Return one token, ignoring the limit (recycling is never blocked).
    pub fn put_back(&mut self, token: Token) {
        self.counts[token.index()] += 1;
    }

    /// Read-only copy of the per-kind counts, in `Token::ALL` order.
    pub fn snapshot(&self) -> [u32; Token::ALL.len()] {
        self.counts
    }

    pub fn limits(&self) -> [u32; Token::ALL.len()] {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn add_respects_per_kind_limit() {
        let mut pool = TokenPool::new(3);
        for _ in 0..10 {
            pool.add(Token::Wilds);
        }
        assert_eq!(pool.count(Token::Wilds), 3);
        assert_eq!(pool.total(), 3);
    }

    #[test]
    fn zero_limit_makes_add_a_noop() {
        let mut pool = TokenPool::new(20);
        pool.set_limit(Token::Wilds, 0);
        pool.add(Token::Wilds);
        assert_eq!(pool.count(Token::Wilds), 0);
    }

    #[test]
    fn put_back_bypasses_the_limit() {
        let mut pool = TokenPool::new(1);
        pool.add(Token::DevA);
        pool.put_back(Token::DevA);
        pool.put_back(Token::DevA);
        assert_eq!(pool.count(Token::DevA), 3);
        assert!(pool.count(Token::DevA) > pool.limit(Token::DevA));
    }

    #[test]
    fn draw_from_empty_pool_is_none() {
        let mut pool = TokenPool::default();
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(pool.draw_one(&mut rng), None);
    }

    #[test]
    fn draw_from_single_kind_pool_returns_that_kind() {
        let mut pool = TokenPool::default();
        for _ in 0..5 {
            pool.add(Token::Wastes);
        }
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..5 {
            assert_eq!(pool.draw_one(&mut rng), Some(Token::Wastes));
        }
        assert_eq!(pool.draw_one(&mut rng), None);
    }

    #[test]
    fn draw_and_put_back_conserve_totals() {
        let mut pool = TokenPool::default();
        for token in Token::ALL {
            pool.add(token);
            pool.add(token);
        }
        let mut rng = SmallRng::seed_from_u64(7);
        let before = pool.total();
        let drawn = pool.draw_one(&mut rng).unwrap();
        assert_eq!(pool.total(), before - 1);
        pool.put_back(drawn);
        assert_eq!(pool.total(), before);
    }

    #[test]
    fn draws_are_reproducible_for_a_fixed_seed() {
        let seed_pool = || {
            let mut pool = TokenPool::default();
            for token in Token::ALL {
                for _ in 0..4 {
                    pool.add(token);
                }
            }
            pool
        };
        let mut a = seed_pool();
        let mut b = seed_pool();
        let mut rng_a = SmallRng::seed_from_u64(99);
        let mut rng_b = SmallRng::seed_from_u64(99);
        for _ in 0..16 {
            assert_eq!(a.draw_one(&mut rng_a), b.draw_one(&mut rng_b));
        }
    }
}
