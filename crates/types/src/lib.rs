pub mod outcome;
pub mod provider;
pub mod site;
pub mod task;

pub use outcome::*;
pub use provider::*;
pub use site::*;
pub use task::*;

/// Ordered list of URLs eligible for submission in one run
pub type CandidateList = Vec<String>;
