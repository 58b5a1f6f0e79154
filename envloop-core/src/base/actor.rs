//! Actor.
use super::{Env, TimeStep};
use anyhow::Result;

/// An entity acting on an environment.
///
/// An actor selects actions from observations and is informed of every
/// transition it caused. Learning, if any, happens inside [`Actor::update`],
/// which is opaque to the caller.
pub trait Actor<E: Env> {
    /// Observes the first timestep of an episode.
    fn observe_first(&mut self, _timestep: &TimeStep<E::Obs>) -> Result<()> {
        Ok(())
    }

    /// Selects an action given an observation.
    fn select_action(&mut self, obs: &E::Obs) -> Result<E::Act>;

    /// Observes the action taken and the timestep it resulted in.
    fn observe(&mut self, _act: &E::Act, _next_timestep: &TimeStep<E::Obs>) -> Result<()> {
        Ok(())
    }

    /// Updates the internal state of the actor, e.g., model parameters.
    fn update(&mut self) -> Result<()> {
        Ok(())
    }
}
