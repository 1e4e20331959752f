pub mod api;
pub mod controller;
pub mod engine;
pub mod mention;
pub mod protocol;
pub mod replay;
