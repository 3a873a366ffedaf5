pub mod cards;
pub mod host;
pub mod quality;
pub mod session;
pub mod voting;
