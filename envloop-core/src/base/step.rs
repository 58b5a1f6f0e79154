//! Environment timestep.

/// Position of a [`TimeStep`] within an episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepType {
    /// The first timestep of an episode, emitted by [`Env::reset`](crate::Env::reset).
    First,

    /// A timestep in the middle of an episode.
    Mid,

    /// The terminal timestep of an episode.
    Last,
}

/// Represents what an environment emits at every interaction step.
///
/// An episode is the sequence of timesteps starting from a [`TimeStep::First`]
/// and ending with a [`TimeStep::Last`]. Reward and discount are defined only for
/// transitions, so the first timestep of an episode carries the observation alone.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeStep<O> {
    /// Initial timestep returned by [`Env::reset`](crate::Env::reset).
    ///
    /// It has no discount as well as no reward: both describe a transition, and no
    /// transition leads to the first timestep. [`TimeStep::discount`] returns `None`.
    First {
        /// Observation.
        observation: O,
    },

    /// Intermediate timestep.
    Mid {
        /// Observation.
        observation: O,

        /// Reward for the transition leading to this timestep.
        reward: f32,

        /// Discount for the transition leading to this timestep.
        discount: f32,
    },

    /// Terminal timestep.
    Last {
        /// Observation.
        observation: O,

        /// Reward for the transition leading to this timestep.
        reward: f32,

        /// Discount for the transition leading to this timestep.
        discount: f32,
    },
}

impl<O> TimeStep<O> {
    /// Constructs the first timestep of an episode.
    pub fn first(observation: O) -> Self {
        Self::First { observation }
    }

    /// Constructs an intermediate timestep with discount `1.0`.
    pub fn transition(observation: O, reward: f32) -> Self {
        Self::Mid {
            observation,
            reward,
            discount: 1.0,
        }
    }

    /// Constructs a terminal timestep with discount `0.0`.
    pub fn termination(observation: O, reward: f32) -> Self {
        Self::Last {
            observation,
            reward,
            discount: 0.0,
        }
    }

    /// Constructs a terminal timestep for an episode cut off by a time limit.
    ///
    /// The discount is kept so that bootstrapping from the last observation
    /// remains possible.
    pub fn truncation(observation: O, reward: f32, discount: f32) -> Self {
        Self::Last {
            observation,
            reward,
            discount,
        }
    }

    /// Returns the position of the timestep within the episode.
    pub fn step_type(&self) -> StepType {
        match self {
            Self::First { .. } => StepType::First,
            Self::Mid { .. } => StepType::Mid,
            Self::Last { .. } => StepType::Last,
        }
    }

    #[inline]
    /// Returns `true` for the first timestep of an episode.
    pub fn is_first(&self) -> bool {
        matches!(self, Self::First { .. })
    }

    #[inline]
    /// Returns `true` for an intermediate timestep.
    pub fn is_mid(&self) -> bool {
        matches!(self, Self::Mid { .. })
    }

    #[inline]
    /// Returns `true` for the terminal timestep of an episode.
    pub fn is_last(&self) -> bool {
        matches!(self, Self::Last { .. })
    }

    /// Observation.
    pub fn observation(&self) -> &O {
        match self {
            Self::First { observation }
            | Self::Mid { observation, .. }
            | Self::Last { observation, .. } => observation,
        }
    }

    /// Reward, `None` for the first timestep.
    pub fn reward(&self) -> Option<f32> {
        match self {
            Self::First { .. } => None,
            Self::Mid { reward, .. } | Self::Last { reward, .. } => Some(*reward),
        }
    }

    /// Discount, `None` for the first timestep.
    pub fn discount(&self) -> Option<f32> {
        match self {
            Self::First { .. } => None,
            Self::Mid { discount, .. } | Self::Last { discount, .. } => Some(*discount),
        }
    }

    /// Consumes the timestep and returns the observation.
    pub fn into_observation(self) -> O {
        match self {
            Self::First { observation }
            | Self::Mid { observation, .. }
            | Self::Last { observation, .. } => observation,
        }
    }
}
