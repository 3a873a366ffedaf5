pub mod category;
pub use category::*;

pub mod consensus;
pub use consensus::*;

pub mod reward;
pub use reward::*;
