//! Core functionalities.
mod actor;
mod env;
mod policy;
mod step;
pub use actor::Actor;
pub use env::Env;
pub use policy::{Policy, PolicyActor};
pub use step::{StepType, TimeStep};
