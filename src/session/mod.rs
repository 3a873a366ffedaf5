pub mod controller;
pub use controller::*;

pub mod participant;
pub use participant::*;

pub mod presence;
pub use presence::*;

pub mod state;
pub use state::*;
