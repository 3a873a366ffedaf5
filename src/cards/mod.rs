pub mod card;
pub use card::*;

pub mod deck;
pub use deck::*;

pub mod evaluator;
pub use evaluator::*;

pub mod rank;
pub use rank::*;

pub mod ranking;
pub use ranking::*;

pub mod showdown;
pub use showdown::*;

pub mod suit;
pub use suit::*;
