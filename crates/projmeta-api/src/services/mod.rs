pub mod intake;

pub use intake::{IntakeConfig, IntakeOutcome, IntakeService};
