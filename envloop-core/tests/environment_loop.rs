use anyhow::Result;
use envloop_core::{
    dummy::{CountdownEnv, ScriptedActor},
    record::{BufferedRecorder, NullRecorder, Record},
    Actor, Counter, Counts, Env, EnvironmentLoop, LoopError, Policy, PolicyActor,
    SharedCounter, TimeStep,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};
use test_log::test;

/// Never terminates by itself; the last timestep is forced after `cap` steps.
struct EndlessEnv {
    cap: usize,
    t: usize,
}

impl Env for EndlessEnv {
    type Obs = usize;
    type Act = i32;

    fn reset(&mut self) -> Result<TimeStep<usize>> {
        self.t = 0;
        Ok(TimeStep::first(0))
    }

    fn step(&mut self, _act: &i32) -> Result<TimeStep<usize>> {
        self.t += 1;
        if self.t >= self.cap {
            Ok(TimeStep::truncation(self.t, 0.0, 1.0))
        } else {
            Ok(TimeStep::transition(self.t, 0.0))
        }
    }
}

/// Steps into the first timestep of a new episode.
struct RestartingEnv;

impl Env for RestartingEnv {
    type Obs = usize;
    type Act = i32;

    fn reset(&mut self) -> Result<TimeStep<usize>> {
        Ok(TimeStep::first(0))
    }

    fn step(&mut self, _act: &i32) -> Result<TimeStep<usize>> {
        Ok(TimeStep::first(0))
    }
}

struct ZeroPolicy;

impl<E: Env<Act = i32>> Policy<E> for ZeroPolicy {
    fn sample(&mut self, _obs: &E::Obs) -> i32 {
        0
    }
}

/// Sets the stop signal after a given number of updates.
struct StoppingActor {
    stop: Arc<AtomicBool>,
    updates_before_stop: usize,
}

impl<E: Env<Act = i32>> Actor<E> for StoppingActor {
    fn select_action(&mut self, _obs: &E::Obs) -> Result<i32> {
        Ok(0)
    }

    fn update(&mut self) -> Result<()> {
        self.updates_before_stop = self.updates_before_stop.saturating_sub(1);
        if self.updates_before_stop == 0 {
            self.stop.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}

/// Reports a total that collides with a computed field.
struct CollidingCounter(SharedCounter);

impl Counter for CollidingCounter {
    fn increment(&self, deltas: &[(&str, u64)]) -> Counts {
        let mut counts = self.0.increment(deltas);
        counts.insert("episode_length".to_string(), 999);
        counts
    }

    fn get_counts(&self) -> Counts {
        self.0.get_counts()
    }
}

fn counts_of(record: &Record) -> Result<(u64, u64)> {
    Ok((record.get_count("episodes")?, record.get_count("steps")?))
}

#[test]
fn test_num_episodes() -> Result<()> {
    let mut env = CountdownEnv::new(5, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();
    let counter = SharedCounter::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_counter(counter.clone())
        .with_recorder(&mut recorder)
        .run(Some(4), None)?;

    assert_eq!(recorder.len(), 4);
    assert_eq!(env.n_resets(), 4);
    assert_eq!(env.n_steps(), 20);
    assert_eq!(counter.get_counts()["episodes"], 4);
    assert_eq!(counter.get_counts()["steps"], 20);
    Ok(())
}

#[test]
fn test_num_steps_overshoots_by_less_than_an_episode() -> Result<()> {
    let mut env = CountdownEnv::new(3, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .run(None, Some(5))?;

    // 3 steps are not enough, 6 are
    assert_eq!(recorder.len(), 2);
    assert_eq!(env.n_steps(), 6);
    assert_eq!(counts_of(&recorder.records()[1])?, (2, 6));
    Ok(())
}

#[test]
fn test_zero_budget_runs_nothing() -> Result<()> {
    let mut env = CountdownEnv::new(3, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();

    let mut env_loop = EnvironmentLoop::new(&mut env, &mut actor).with_recorder(&mut recorder);
    env_loop.run(Some(0), None)?;
    env_loop.run(None, Some(0))?;
    drop(env_loop);

    assert!(recorder.is_empty());
    assert_eq!(env.n_resets(), 0);
    Ok(())
}

#[test]
fn test_both_bounds_is_invalid_argument() {
    let mut env = CountdownEnv::new(3, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();
    let counter = SharedCounter::new();

    let err = EnvironmentLoop::new(&mut env, &mut actor)
        .with_counter(counter.clone())
        .with_recorder(&mut recorder)
        .run(Some(1), Some(1))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LoopError>(),
        Some(LoopError::InvalidArgument(_))
    ));
    assert_eq!(env.n_resets(), 0);
    assert_eq!(env.n_steps(), 0);
    assert!(actor.calls().is_empty());
    assert!(counter.get_counts().is_empty());
    assert!(recorder.is_empty());
}

#[test]
fn test_single_step_episodes() -> Result<()> {
    let mut env = CountdownEnv::new(1, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .run(Some(3), None)?;

    assert_eq!(recorder.len(), 3);
    for (i, record) in recorder.iter().enumerate() {
        let n = i as u64 + 1;
        assert_eq!(record.get_count("episode_length")?, 1);
        assert_eq!(record.get_scalar("episode_return")?, 1.0);
        assert_eq!(counts_of(record)?, (n, n));
    }
    Ok(())
}

#[test]
fn test_deterministic_episodes() -> Result<()> {
    let mut results = vec![];
    for _ in 0..2 {
        let mut env = CountdownEnv::new(7, 0.25);
        let mut actor = ScriptedActor::new();
        let record = EnvironmentLoop::new(&mut env, &mut actor)
            .with_recorder(NullRecorder::new())
            .run_episode()?;
        results.push((
            record.get_count("episode_length")?,
            record.get_scalar("episode_return")?,
        ));
    }
    assert_eq!(results[0], (7, 1.75));
    assert_eq!(results[0], results[1]);
    Ok(())
}

#[test]
fn test_counter_increases_by_episode() -> Result<()> {
    let mut env = CountdownEnv::new(4, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();
    let counter = SharedCounter::new();
    counter.increment(&[("episodes", 10), ("steps", 100)]);

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_counter(counter)
        .with_recorder(&mut recorder)
        .run(Some(3), None)?;

    let totals = recorder
        .iter()
        .map(counts_of)
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(totals, vec![(11, 104), (12, 108), (13, 112)]);
    Ok(())
}

#[test]
fn test_steps_per_second_is_finite() -> Result<()> {
    let mut env = CountdownEnv::new(1, 0.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .run(Some(20), None)?;

    for record in recorder.iter() {
        let sps = record.get_scalar("steps_per_second")?;
        assert!(sps.is_finite());
        assert!(sps >= 0.0);
    }
    Ok(())
}

#[test]
fn test_counter_overwrites_computed_field() -> Result<()> {
    let mut env = CountdownEnv::new(2, 1.0);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_counter(CollidingCounter(SharedCounter::new()))
        .with_recorder(&mut recorder)
        .run(Some(1), None)?;

    assert_eq!(recorder.records()[0].get_count("episode_length")?, 999);
    Ok(())
}

#[test]
fn test_actor_failure_propagates_without_record() {
    let mut env = CountdownEnv::new(3, 1.0);
    let mut actor = ScriptedActor::new().fail_on_select_action(2);
    let mut recorder = BufferedRecorder::new();
    let counter = SharedCounter::new();

    let err = EnvironmentLoop::new(&mut env, &mut actor)
        .with_counter(counter.clone())
        .with_recorder(&mut recorder)
        .run(Some(2), None)
        .unwrap_err();

    assert_eq!(err.to_string(), "ScriptedActor failed at call 2");
    assert!(recorder.is_empty());
    assert!(counter.get_counts().is_empty());
    assert_eq!(env.n_steps(), 1);
}

#[test]
fn test_env_failure_propagates_without_record() {
    let mut env = CountdownEnv::new(2, 1.0).fail_on_step(3);
    let mut actor = ScriptedActor::new();
    let mut recorder = BufferedRecorder::new();

    let err = EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .run(Some(5), None)
        .unwrap_err();

    // The first episode completes before the failure
    assert_eq!(err.to_string(), "CountdownEnv failed at step 3");
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_first_timestep_in_episode_is_rejected() {
    let mut env = RestartingEnv;
    let mut actor: PolicyActor<RestartingEnv, _> = PolicyActor::new(ZeroPolicy);
    let mut recorder = BufferedRecorder::new();

    let err = EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .run(Some(1), None)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LoopError>(),
        Some(LoopError::InvalidTimeStep(_))
    ));
    assert!(recorder.is_empty());
}

#[test]
fn test_endless_episode_runs_to_completion() -> Result<()> {
    // A step budget cannot cut an episode; only the forced last timestep ends it.
    let mut env = EndlessEnv { cap: 50, t: 0 };
    let mut actor: PolicyActor<EndlessEnv, _> = PolicyActor::new(ZeroPolicy);
    let mut recorder = BufferedRecorder::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .run(None, Some(5))?;

    assert_eq!(recorder.len(), 1);
    assert_eq!(recorder.records()[0].get_count("episode_length")?, 50);
    Ok(())
}

#[test]
fn test_stop_signal_ends_unbounded_run() -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let mut env = CountdownEnv::new(4, 1.0);
    let mut actor = StoppingActor {
        stop: stop.clone(),
        updates_before_stop: 10,
    };
    let mut recorder = BufferedRecorder::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_recorder(&mut recorder)
        .with_stop_signal(stop)
        .run(None, None)?;

    // The signal is raised in the third episode, which still runs to the end
    assert_eq!(recorder.len(), 3);
    assert_eq!(env.n_steps(), 12);
    Ok(())
}

#[test]
fn test_shared_counter_between_threads() -> Result<()> {
    let counter = SharedCounter::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || -> Result<Vec<Record>> {
                let mut env = CountdownEnv::new(3, 1.0);
                let mut actor = ScriptedActor::new();
                let mut recorder = BufferedRecorder::new();
                EnvironmentLoop::new(&mut env, &mut actor)
                    .with_counter(counter)
                    .with_recorder(&mut recorder)
                    .run(Some(5), None)?;
                Ok(recorder.into_records())
            })
        })
        .collect();

    for h in handles {
        let records = h.join().unwrap()?;
        assert_eq!(records.len(), 5);
        let totals = records.iter().map(counts_of).collect::<Result<Vec<_>>>()?;
        for (episodes, steps) in totals.iter() {
            assert_eq!(*steps, 3 * *episodes);
        }
        assert!(totals.windows(2).all(|w| w[0].0 < w[1].0));
    }

    let counts = counter.get_counts();
    assert_eq!(counts["episodes"], 20);
    assert_eq!(counts["steps"], 60);
    Ok(())
}

#[test]
fn test_default_recorder_and_label() -> Result<()> {
    let mut env = CountdownEnv::new(2, 1.0);
    let mut actor = ScriptedActor::new();

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_label("eval_loop")
        .run(Some(2), None)?;

    assert_eq!(env.n_resets(), 2);
    Ok(())
}
