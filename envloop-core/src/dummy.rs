//! Deterministic environments and actors. This module is used for tests.
use crate::{Actor, Env, TimeStep};
use anyhow::{bail, Result};

/// An environment whose episodes end after a fixed number of steps.
///
/// The observation is the number of steps remaining in the episode and every
/// step yields the same reward. Actions are ignored.
#[derive(Clone, Debug)]
pub struct CountdownEnv {
    episode_length: usize,
    reward: f32,
    remaining: usize,
    n_resets: usize,
    n_steps: usize,
    fail_on_step: Option<usize>,
}

impl CountdownEnv {
    /// Constructs the environment.
    ///
    /// `episode_length` is expected to be at least one.
    pub fn new(episode_length: usize, reward: f32) -> Self {
        Self {
            episode_length,
            reward,
            remaining: 0,
            n_resets: 0,
            n_steps: 0,
            fail_on_step: None,
        }
    }

    /// Makes the `n`-th call of [`Env::step`] (counting from 1) fail.
    pub fn fail_on_step(mut self, n: usize) -> Self {
        self.fail_on_step = Some(n);
        self
    }

    /// The number of calls of [`Env::reset`].
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }

    /// The number of calls of [`Env::step`].
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }
}

impl Env for CountdownEnv {
    type Obs = usize;
    type Act = i32;

    fn reset(&mut self) -> Result<TimeStep<usize>> {
        self.n_resets += 1;
        self.remaining = self.episode_length;
        Ok(TimeStep::first(self.remaining))
    }

    fn step(&mut self, _act: &i32) -> Result<TimeStep<usize>> {
        self.n_steps += 1;
        if self.fail_on_step == Some(self.n_steps) {
            bail!("CountdownEnv failed at step {}", self.n_steps);
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Ok(TimeStep::termination(0, self.reward))
        } else {
            Ok(TimeStep::transition(self.remaining, self.reward))
        }
    }
}

/// An actor logging the names of its methods in the order they are called.
///
/// It always selects action `0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedActor {
    calls: Vec<&'static str>,
    n_select_action: usize,
    fail_on_select_action: Option<usize>,
}

impl ScriptedActor {
    /// Constructs the actor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `n`-th call of [`Actor::select_action`] (counting from 1) fail.
    pub fn fail_on_select_action(mut self, n: usize) -> Self {
        self.fail_on_select_action = Some(n);
        self
    }

    /// Names of the methods called so far.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    /// Forgets the calls logged so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Actor<CountdownEnv> for ScriptedActor {
    fn observe_first(&mut self, _timestep: &TimeStep<usize>) -> Result<()> {
        self.calls.push("observe_first");
        Ok(())
    }

    fn select_action(&mut self, _obs: &usize) -> Result<i32> {
        self.calls.push("select_action");
        self.n_select_action += 1;
        if self.fail_on_select_action == Some(self.n_select_action) {
            bail!("ScriptedActor failed at call {}", self.n_select_action);
        }
        Ok(0)
    }

    fn observe(&mut self, _act: &i32, _next_timestep: &TimeStep<usize>) -> Result<()> {
        self.calls.push("observe");
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        self.calls.push("update");
        Ok(())
    }
}
