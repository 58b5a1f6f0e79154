//! Environment.
use super::TimeStep;
use anyhow::Result;
use std::fmt::Debug;

/// Represents an environment, typically an MDP.
///
/// Errors returned from [`Env::reset`] and [`Env::step`] are not handled by
/// [`EnvironmentLoop`](crate::EnvironmentLoop); they abort the running episode
/// and are returned to the caller unchanged.
pub trait Env {
    /// Observation of the environment.
    type Obs: Clone + Debug;

    /// Action of the environment.
    type Act: Clone + Debug;

    /// Starts a new episode and returns its first timestep.
    ///
    /// Implementations must return [`TimeStep::First`].
    fn reset(&mut self) -> Result<TimeStep<Self::Obs>>;

    /// Performes an environment step.
    ///
    /// Implementations must return [`TimeStep::Mid`] or [`TimeStep::Last`].
    fn step(&mut self, act: &Self::Act) -> Result<TimeStep<Self::Obs>>;
}
