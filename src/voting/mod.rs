pub mod estimate;
pub use estimate::*;

pub mod tally;
pub use tally::*;

pub mod vote;
pub use vote::*;
