//! Run interaction between [`Actor`] and [`Env`].
use crate::{
    error::LoopError,
    record::{make_default_recorder, Record, RecordValue, Recorder},
    Actor, Counter, Env, SharedCounter,
};
use anyhow::Result;
use log::{debug, info};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

/// Label of the default recorder.
pub const DEFAULT_LABEL: &str = "environment_loop";

/// Lower bound of the episode duration in seconds used to compute `steps_per_second`.
const MIN_ELAPSED_SECS: f64 = 1e-9;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Coordinates the interaction of an [`Actor`] and an [`Env`].
///
/// # Episode loop
///
/// [`EnvironmentLoop::run()`] repeats episodes until a termination condition holds.
/// The condition is checked only between episodes, so an episode is never cut off.
/// In each episode:
///
/// 1. Reset [`Env`] and give the first timestep to [`Actor::observe_first`].
/// 2. Until a terminal timestep is reached:
///     1. Select an action with [`Actor::select_action`].
///     2. Step [`Env`] with the action.
///     3. Give the action and the resulting timestep to [`Actor::observe`].
///     4. Call [`Actor::update`].
/// 3. Add `episodes = 1` and `steps = (episode length)` to the [`Counter`].
/// 4. Write a [`Record`] with `episode_length`, `episode_return`, `steps_per_second`
///    and the totals of the [`Counter`] to the [`Recorder`]. Counter totals overwrite
///    computed fields with the same name.
///
/// ```mermaid
/// graph LR
///     A[Actor]-->|Env::Act|B[Env]
///     B -->|"TimeStep&lt;Env::Obs&gt;"|A
///     L[EnvironmentLoop]-->|episodes, steps|C[Counter]
///     C -->|Counts|L
///     L -->|Record|R[Recorder]
/// ```
///
/// # Usage
///
/// ```ignore
/// let counter = SharedCounter::new();
/// let mut env_loop = EnvironmentLoop::new(&mut env, &mut actor)
///     .with_counter(counter.clone())
///     .with_label("train");
/// env_loop.run(Some(10), None)?;
/// ```
///
/// The same [`SharedCounter`] can be given to loops running in other threads;
/// the totals written by each loop then include the episodes and steps of all of them.
pub struct EnvironmentLoop<'a, E, A>
where
    E: Env,
    A: Actor<E>,
{
    env: &'a mut E,
    actor: &'a mut A,
    counter: Box<dyn Counter + 'a>,
    recorder: Box<dyn Recorder + 'a>,

    /// `true` once a recorder is given explicitly, after which the label is ignored.
    custom_recorder: bool,

    stop: Option<Arc<AtomicBool>>,
}

impl<'a, E, A> EnvironmentLoop<'a, E, A>
where
    E: Env,
    A: Actor<E>,
{
    /// Constructs a loop with a fresh [`SharedCounter`] and the default recorder
    /// labelled [`DEFAULT_LABEL`].
    pub fn new(env: &'a mut E, actor: &'a mut A) -> Self {
        Self {
            env,
            actor,
            counter: Box::new(SharedCounter::new()),
            recorder: make_default_recorder(DEFAULT_LABEL),
            custom_recorder: false,
            stop: None,
        }
    }

    /// Sets the counter, typically a clone of a [`SharedCounter`] held elsewhere.
    pub fn with_counter<C: Counter + 'a>(mut self, counter: C) -> Self {
        self.counter = Box::new(counter);
        self
    }

    /// Sets the recorder. The label given with [`EnvironmentLoop::with_label`]
    /// is ignored afterwards.
    pub fn with_recorder<R: Recorder + 'a>(mut self, recorder: R) -> Self {
        self.recorder = Box::new(recorder);
        self.custom_recorder = true;
        self
    }

    /// Sets the label of the default recorder.
    ///
    /// Has no effect if a recorder has been given with [`EnvironmentLoop::with_recorder`].
    pub fn with_label(mut self, label: &str) -> Self {
        if self.custom_recorder {
            debug!("A recorder is given, label {:?} is ignored", label);
        } else {
            self.recorder = make_default_recorder(label);
        }
        self
    }

    /// Sets a flag stopping [`EnvironmentLoop::run`] before the next episode once set to `true`.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn is_stopped(&self) -> bool {
        self.stop
            .as_ref()
            .map_or(false, |stop| stop.load(Ordering::Relaxed))
    }

    /// Runs episodes.
    ///
    /// Runs `num_episodes` episodes, or episodes until at least `num_steps` environment
    /// steps are taken. As the last episode is always run to completion, the number of
    /// steps may exceed `num_steps` by less than the length of one episode. If both are
    /// `None`, episodes are run until the stop signal is set, or forever.
    ///
    /// # Errors
    ///
    /// * [`LoopError::InvalidArgument`] if both `num_episodes` and `num_steps` are given.
    ///   Nothing is done in this case.
    /// * [`LoopError::InvalidTimeStep`] if [`Env::reset`] does not return a first timestep
    ///   or [`Env::step`] returns one.
    /// * Errors returned by [`Env`] or [`Actor`] as they are. The episode in progress is
    ///   neither counted nor recorded.
    pub fn run(&mut self, num_episodes: Option<usize>, num_steps: Option<usize>) -> Result<()> {
        if num_episodes.is_some() && num_steps.is_some() {
            return Err(LoopError::InvalidArgument(
                "Either num_episodes or num_steps should be None".to_string(),
            )
            .into());
        }

        let should_terminate = |episode_count: usize, step_count: usize| {
            num_episodes.map_or(false, |n| episode_count >= n)
                || num_steps.map_or(false, |n| step_count >= n)
        };

        let (mut episode_count, mut step_count) = (0, 0);
        while !should_terminate(episode_count, step_count) {
            if self.is_stopped() {
                info!("Stop signal received");
                break;
            }

            let (episode_steps, _) = self.episode()?;
            episode_count += 1;
            step_count += episode_steps;
        }

        info!(
            "Finished running {} episodes, {} steps",
            episode_count, step_count
        );
        Ok(())
    }

    /// Runs a single episode and returns the record written to the recorder.
    pub fn run_episode(&mut self) -> Result<Record> {
        let (_, record) = self.episode()?;
        Ok(record)
    }

    /// Runs an episode, updates the counter and writes the record.
    fn episode(&mut self) -> Result<(usize, Record)> {
        let start = Instant::now();
        let mut episode_steps = 0usize;
        let mut episode_return = 0f32;

        let mut timestep = self.env.reset()?;
        if !timestep.is_first() {
            return Err(LoopError::InvalidTimeStep(format!(
                "reset() returned {:?}, expected First",
                timestep.step_type()
            ))
            .into());
        }
        self.actor.observe_first(&timestep)?;

        while !timestep.is_last() {
            let act = self.actor.select_action(timestep.observation())?;
            timestep = self.env.step(&act)?;
            let reward = timestep.reward().ok_or_else(|| {
                LoopError::InvalidTimeStep(
                    "step() returned First in the middle of an episode".to_string(),
                )
            })?;
            self.actor.observe(&act, &timestep)?;
            self.actor.update()?;

            episode_steps += 1;
            episode_return += reward;
        }

        let counts = self
            .counter
            .increment(&[("episodes", 1), ("steps", episode_steps as u64)]);

        let elapsed = start.elapsed().as_secs_f64().max(MIN_ELAPSED_SECS);
        let steps_per_second = (episode_steps as f64 / elapsed) as f32;

        let record = Record::from_slice(&[
            ("episode_length", RecordValue::Count(episode_steps as u64)),
            ("episode_return", RecordValue::Scalar(episode_return)),
            ("steps_per_second", RecordValue::Scalar(steps_per_second)),
        ])
        .merge(Record::from_counts(&counts));
        debug!(
            "Episode finished: {} steps, return {}",
            episode_steps, episode_return
        );

        self.recorder.write(record.clone());
        Ok((episode_steps, record))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dummy::{CountdownEnv, ScriptedActor},
        record::BufferedRecorder,
    };
    use test_log::test;

    #[test]
    fn test_run_episode_record() -> Result<()> {
        let mut env = CountdownEnv::new(4, 0.5);
        let mut actor = ScriptedActor::new();
        let mut recorder = BufferedRecorder::new();

        let record = EnvironmentLoop::new(&mut env, &mut actor)
            .with_recorder(&mut recorder)
            .run_episode()?;

        assert_eq!(record.get_count("episode_length")?, 4);
        assert_eq!(record.get_scalar("episode_return")?, 2.0);
        assert_eq!(record.get_count("episodes")?, 1);
        assert_eq!(record.get_count("steps")?, 4);
        assert_eq!(recorder.records(), &[record]);
        Ok(())
    }

    #[test]
    fn test_call_sequence() -> Result<()> {
        let mut env = CountdownEnv::new(2, 1.0);
        let mut actor = ScriptedActor::new();

        EnvironmentLoop::new(&mut env, &mut actor)
            .with_recorder(BufferedRecorder::new())
            .run(Some(1), None)?;

        assert_eq!(
            actor.calls(),
            &[
                "observe_first",
                "select_action",
                "observe",
                "update",
                "select_action",
                "observe",
                "update",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_label_ignored_after_recorder() -> Result<()> {
        let mut env = CountdownEnv::new(1, 1.0);
        let mut actor = ScriptedActor::new();
        let mut recorder = BufferedRecorder::new();

        EnvironmentLoop::new(&mut env, &mut actor)
            .with_recorder(&mut recorder)
            .with_label("ignored")
            .run(Some(2), None)?;

        assert_eq!(recorder.len(), 2);
        Ok(())
    }
}
