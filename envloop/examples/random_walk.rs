use anyhow::Result;
use clap::Parser;
use envloop_core::{
    record::{make_recorder, Dispatcher, Recorder, RecorderConfig},
    Counter, Env, EnvironmentLoop, Policy, PolicyActor, SharedCounter, TimeStep,
};
use envloop_tensorboard::TensorboardRecorder;
use log::info;

const BOUND: i64 = 10;
const MAX_EPISODE_STEPS: usize = 1000;

/// A walker on the integer line starting at zero.
///
/// An episode terminates with reward `1` when the walker reaches `+bound`, and with
/// reward `-1` when it reaches `-bound`. It is truncated after `max_steps` steps.
struct RandomWalkEnv {
    bound: i64,
    max_steps: usize,
    pos: i64,
    t: usize,
}

impl RandomWalkEnv {
    fn new(bound: i64, max_steps: usize) -> Self {
        Self {
            bound,
            max_steps,
            pos: 0,
            t: 0,
        }
    }
}

impl Env for RandomWalkEnv {
    type Obs = i64;
    type Act = i64;

    fn reset(&mut self) -> Result<TimeStep<i64>> {
        self.pos = 0;
        self.t = 0;
        Ok(TimeStep::first(self.pos))
    }

    fn step(&mut self, act: &i64) -> Result<TimeStep<i64>> {
        self.pos += act.signum();
        self.t += 1;

        let timestep = if self.pos >= self.bound {
            TimeStep::termination(self.pos, 1.0)
        } else if self.pos <= -self.bound {
            TimeStep::termination(self.pos, -1.0)
        } else if self.t >= self.max_steps {
            TimeStep::truncation(self.pos, 0.0, 1.0)
        } else {
            TimeStep::transition(self.pos, 0.0)
        };
        Ok(timestep)
    }
}

/// Moves left or right with equal probability.
struct RandomPolicy {
    rng: fastrand::Rng,
}

impl Policy<RandomWalkEnv> for RandomPolicy {
    fn sample(&mut self, _obs: &i64) -> i64 {
        if self.rng.bool() {
            1
        } else {
            -1
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes to run
    #[arg(long)]
    episodes: Option<usize>,

    /// Minimum number of environment steps to run
    #[arg(long)]
    steps: Option<usize>,

    /// Label of the records
    #[arg(long, default_value = "random_walk")]
    label: String,

    /// Directory of the CSV file
    #[arg(long)]
    csv_dir: Option<String>,

    /// Directory of TensorBoard logs
    #[arg(long)]
    logdir: Option<String>,

    /// Minimum interval of printed records in seconds
    #[arg(long, default_value_t = 0.0)]
    time_delta: f64,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn run(args: &Args) -> Result<SharedCounter> {
    let mut config = RecorderConfig::default()
        .label(args.label.as_str())
        .time_delta(args.time_delta);
    if let Some(dir) = &args.csv_dir {
        config = config.csv_dir(dir.as_str());
    }

    let mut recorders: Vec<Box<dyn Recorder>> = vec![make_recorder(&config)?];
    if let Some(logdir) = &args.logdir {
        recorders.push(Box::new(TensorboardRecorder::new(logdir)));
    }

    let counter = SharedCounter::new();
    let mut env = RandomWalkEnv::new(BOUND, MAX_EPISODE_STEPS);
    let mut actor = PolicyActor::new(RandomPolicy {
        rng: fastrand::Rng::with_seed(args.seed),
    });

    EnvironmentLoop::new(&mut env, &mut actor)
        .with_counter(counter.clone())
        .with_recorder(Dispatcher::new(recorders))
        .run(args.episodes, args.steps)?;

    Ok(counter)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let counter = run(&args)?;
    info!("Totals: {:?}", counter.get_counts());

    Ok(())
}
