//! Policy.
use super::{Actor, Env};
use anyhow::Result;
use std::marker::PhantomData;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Sample an action given an observation.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// An [`Actor`] that acts with a [`Policy`] and never learns.
///
/// Useful for evaluation runs and for driving an environment with a fixed or
/// random policy.
pub struct PolicyActor<E, P>
where
    E: Env,
    P: Policy<E>,
{
    policy: P,
    phantom: PhantomData<E>,
}

impl<E, P> PolicyActor<E, P>
where
    E: Env,
    P: Policy<E>,
{
    /// Wraps a policy.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            phantom: PhantomData,
        }
    }

    /// Returns a reference to the wrapped policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Unwraps the policy.
    pub fn into_inner(self) -> P {
        self.policy
    }
}

impl<E, P> Actor<E> for PolicyActor<E, P>
where
    E: Env,
    P: Policy<E>,
{
    fn select_action(&mut self, obs: &E::Obs) -> Result<E::Act> {
        Ok(self.policy.sample(obs))
    }
}
