//! Running actors on environments.
//!
//! envloop consists of the following crates:
//!
//! * `envloop-core` provides the traits of environments, actors, counters and
//!   recorders, and [`EnvironmentLoop`](envloop_core::EnvironmentLoop) coordinating them.
//! * `envloop-tensorboard` has `TensorboardRecorder` struct to write records which can
//!   be shown in Tensorboard. It is based on
//!   [tensorboard-rs](https://crates.io/crates/tensorboard-rs).
//! * `envloop` is this crate, re-exporting the above together with a runnable example,
//!   `random_walk`.
pub use envloop_core as core;
pub use envloop_tensorboard as tensorboard;
