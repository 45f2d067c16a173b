pub mod cancellation;
pub mod favorites;
pub mod orchestrator;
pub mod recipes;
pub mod translator;
