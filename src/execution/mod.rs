//! Resolution and submission: which rules fire, what steps they produce,
//! and getting the result to the agent

pub mod driver;
pub mod resolver;
pub mod rules;

pub use driver::{upload_args, Driver, DriverOptions, Outcome};
pub use resolver::{dedupe_steps, StepResolver};
pub use rules::evaluate_rules;
