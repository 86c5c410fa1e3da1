use std::time::Duration;

use tracing::trace;

use crate::{
    scheduler::{LoopState, Scheduler, Task},
    DiceModel, Renderer,
};

pub const DEFAULT_RENDER_PERIOD: Duration = Duration::from_millis(100);

/// Hands a fresh snapshot to the renderer every `period`.
///
/// The period is independent of the sampler's delay, so a slow renderer never throttles
/// sampling and fast sampling never forces extra redraws.
#[derive(Clone, Debug)]
pub struct RenderLoop {
    period: Duration,
    state: LoopState,
}

impl RenderLoop {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: LoopState::Stopped,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub(crate) fn start(&mut self, scheduler: &mut Scheduler) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running;
        scheduler.schedule(Task::Render, Duration::ZERO);
    }

    pub(crate) fn stop(&mut self, scheduler: &mut Scheduler) {
        self.state = LoopState::Stopped;
        scheduler.cancel(Task::Render);
    }

    pub(crate) fn tick<D>(&self, model: &DiceModel, renderer: &mut D, scheduler: &mut Scheduler)
    where
        D: Renderer + ?Sized,
    {
        if !self.is_running() {
            trace!("render loop stopped; dropping tick");
            return;
        }

        renderer.render(&model.snapshot());
        scheduler.schedule(Task::Render, self.period);
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        RenderLoop::new(DEFAULT_RENDER_PERIOD)
    }
}
