pub mod client;
pub mod outcome;

pub use crate::client::Client;
pub use crate::outcome::{FailureKind, Outcome};
