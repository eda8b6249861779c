pub mod random;

pub use random::RandomSelector;
