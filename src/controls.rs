use std::{collections::VecDeque, num::NonZeroUsize};

use pipeline::GenerationParameters;

/// The parameter input surface: yields the parameter set for each cycle to
/// run, one at a time. The driver consumes it sequentially, so cycles are
/// serialized by construction.
///
/// Which variant to use is the caller's choice; the core never probes its
/// environment to decide.
pub trait ParameterFeed {
    fn next_parameters(&mut self) -> Option<GenerationParameters>;
}

/// Yields one parameter set, then ends. The headless one-shot run.
#[derive(Debug)]
pub struct FixedFeed {
    params: Option<GenerationParameters>,
}

impl FixedFeed {
    pub fn new(params: GenerationParameters) -> Self {
        Self {
            params: Some(params),
        }
    }
}

impl ParameterFeed for FixedFeed {
    fn next_parameters(&mut self) -> Option<GenerationParameters> {
        self.params.take()
    }
}

/// Replays a series of control adjustments against a base parameter set:
/// the base itself, then one copy per noise step, then one per epoch step.
/// Each yielded set derives from the base alone, not from earlier steps.
#[derive(Debug)]
pub struct SweepFeed {
    queue: VecDeque<GenerationParameters>,
}

impl SweepFeed {
    pub fn new(
        base: GenerationParameters,
        noise_steps: &[f64],
        epoch_steps: &[NonZeroUsize],
    ) -> Self {
        let mut queue = VecDeque::with_capacity(1 + noise_steps.len() + epoch_steps.len());

        queue.push_back(base);
        for &noise_percent in noise_steps {
            queue.push_back(base.with_noise_percent(noise_percent));
        }
        for &epochs in epoch_steps {
            queue.push_back(base.with_epochs(epochs));
        }

        Self { queue }
    }
}

impl ParameterFeed for SweepFeed {
    fn next_parameters(&mut self) -> Option<GenerationParameters> {
        self.queue.pop_front()
    }
}
