pub mod guess;
pub mod session;
