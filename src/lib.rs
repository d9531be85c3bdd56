pub mod agents;
pub mod errors;
pub mod evals;
pub mod providers;
