pub mod deck;
pub mod parameters;
pub mod pool;
pub mod timeline;
