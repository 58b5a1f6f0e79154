#![warn(missing_docs)]
//! A loop running an actor on an environment.
//!
//! [`EnvironmentLoop`] repeatedly resets an [`Env`], lets an [`Actor`] interact with it
//! until the episode ends, adds the episode to a [`Counter`] and writes a
//! [`Record`](record::Record) of the episode to a [`Recorder`](record::Recorder).
pub mod dummy;
pub mod error;
pub mod record;

mod base;
pub use base::{Actor, Env, Policy, PolicyActor, StepType, TimeStep};

mod counter;
pub use counter::{Counter, Counts, SharedCounter};

mod environment_loop;
pub use environment_loop::{EnvironmentLoop, DEFAULT_LABEL};
pub use error::LoopError;
