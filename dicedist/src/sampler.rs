use std::time::Duration;

use tracing::trace;

use crate::{
    scheduler::{LoopState, Scheduler, Task},
    DiceModel, Error, Result, Roller,
};

/// Records one roll per tick, then waits `delay` before the next.
#[derive(Clone, Debug)]
pub struct SamplerLoop {
    delay: Duration,
    state: LoopState,
}

impl SamplerLoop {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: LoopState::Stopped,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Changes the delay between rolls. Only allowed while stopped.
    pub fn set_delay(&mut self, delay: Duration) -> Result<()> {
        if self.is_running() {
            return Err(Error::InvalidTransition {
                command: "change the sampling delay",
                state: "sampling",
            });
        }
        self.delay = delay;
        Ok(())
    }

    /// Starts the loop with a tick due immediately. Starting a running loop does nothing.
    pub(crate) fn start(&mut self, scheduler: &mut Scheduler) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running;
        scheduler.schedule(Task::Sample, Duration::ZERO);
    }

    pub(crate) fn stop(&mut self, scheduler: &mut Scheduler) {
        self.state = LoopState::Stopped;
        scheduler.cancel(Task::Sample);
    }

    pub(crate) fn tick<R>(
        &self,
        model: &mut DiceModel,
        roller: &mut R,
        scheduler: &mut Scheduler,
    ) -> Result<()>
    where
        R: Roller + ?Sized,
    {
        if !self.is_running() {
            trace!("sampler stopped; dropping tick");
            return Ok(());
        }

        model.record_roll(roller)?;
        scheduler.schedule(Task::Sample, self.delay);
        Ok(())
    }
}

impl Default for SamplerLoop {
    fn default() -> Self {
        SamplerLoop::new(Duration::from_millis(10))
    }
}
