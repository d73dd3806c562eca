//! Multi-perspective fact-checking: web research feeding four persona
//! agents, aggregated into a verdict with a reliability score.

pub mod agents;
pub mod checker;
pub mod prompts;
pub mod research;
pub mod synthesis;
pub mod verdict;

pub use checker::FactChecker;
pub use research::Researcher;
pub use verdict::aggregate;
