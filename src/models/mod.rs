pub mod api;
pub mod profile;
pub mod simulation;
pub mod upstream;
