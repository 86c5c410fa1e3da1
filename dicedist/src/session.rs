//! The start/pause/resume/reset state machine.
//!
//! A [`Session`] owns the model, both periodic loops, the scheduler and the two collaborators.
//! Commands and ticks all take `&mut self`, so a command can never land in the middle of a tick.

use std::{fmt, time::Duration};

use tracing::{debug, trace};

use crate::{
    scheduler::{Scheduler, Task},
    DiceModel, Error, RenderLoop, Renderer, Result, Roller, SamplerLoop, Snapshot,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Session<R, D> {
    state: SessionState,
    model: DiceModel,
    sampler: SamplerLoop,
    render: RenderLoop,
    scheduler: Scheduler,
    roller: R,
    renderer: D,
}

impl<R: Roller, D: Renderer> Session<R, D> {
    pub fn new(roller: R, renderer: D) -> Self {
        Self {
            state: SessionState::Idle,
            model: DiceModel::new(),
            sampler: SamplerLoop::default(),
            render: RenderLoop::default(),
            scheduler: Scheduler::new(),
            roller,
            renderer,
        }
    }

    /// Sets how often the renderer is handed a snapshot.
    pub fn with_render_period(mut self, period: Duration) -> Self {
        self.render = RenderLoop::new(period);
        self
    }

    /// Applies a configuration without starting anything. Not allowed while running.
    pub fn configure(&mut self, dice: u32, sides: u32) -> Result<()> {
        self.require(
            "configure",
            &[SessionState::Idle, SessionState::Paused],
        )?;
        self.model.configure(dice, sides)
    }

    /// Configures the model and starts both loops with a fresh tally.
    pub fn start(&mut self, dice: u32, sides: u32, delay: Duration) -> Result<()> {
        self.require("start", &[SessionState::Idle, SessionState::Paused])?;
        self.model.configure(dice, sides)?;
        self.sampler.set_delay(delay)?;
        self.run_loops();
        self.transition(SessionState::Running);
        Ok(())
    }

    /// Pauses both loops. The tally is kept.
    pub fn stop(&mut self) -> Result<()> {
        self.require("stop", &[SessionState::Running])?;
        self.halt_loops();
        self.transition(SessionState::Paused);
        Ok(())
    }

    /// Restarts both loops on the existing tally, with a possibly different delay.
    pub fn resume(&mut self, delay: Duration) -> Result<()> {
        self.require("resume", &[SessionState::Paused])?;
        self.sampler.set_delay(delay)?;
        self.run_loops();
        self.transition(SessionState::Running);
        Ok(())
    }

    /// Returns to `Idle` from any state, stopping the loops if they run.
    ///
    /// The tally is left alone; the next [`start`](Session::start) replaces it.
    pub fn reset_controls(&mut self) {
        if self.state == SessionState::Running {
            self.halt_loops();
        }
        self.transition(SessionState::Idle);
    }

    /// Zeroes the tally in any state.
    pub fn clear(&mut self) {
        self.model.reset();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.model.snapshot()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> &DiceModel {
        &self.model
    }

    pub fn sampler(&self) -> &SamplerLoop {
        &self.sampler
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    pub fn renderer(&self) -> &D {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut D {
        &mut self.renderer
    }

    /// Virtual time of the most recent turn.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next tick is due, if any loop is running.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Runs every tick due at `now` that was queued before this call. Returns the tick count.
    pub fn turn(&mut self, now: Duration) -> Result<usize> {
        let turn = self.scheduler.begin_turn(now);
        let mut ticks = 0;

        while let Some(task) = self.scheduler.pop_due(&turn) {
            trace!(?task, now = ?turn.now(), "tick");
            match task {
                Task::Sample => {
                    self.sampler
                        .tick(&mut self.model, &mut self.roller, &mut self.scheduler)?
                }
                Task::Render => {
                    self.render
                        .tick(&self.model, &mut self.renderer, &mut self.scheduler)
                }
            }
            ticks += 1;
        }

        Ok(ticks)
    }

    /// Runs turns at each deadline up to and including `until`, then moves the clock there.
    ///
    /// A sampler with zero delay is due again at the same instant after every turn, so virtual
    /// time would never pass `until`. Drive such sessions with [`turn`](Session::turn).
    pub fn run_until(&mut self, until: Duration) -> Result<usize> {
        let mut ticks = 0;
        while let Some(due) = self.scheduler.next_deadline() {
            if due > until {
                break;
            }
            ticks += self.turn(due)?;
        }
        self.scheduler.advance(until);
        Ok(ticks)
    }

    fn run_loops(&mut self) {
        self.sampler.start(&mut self.scheduler);
        self.render.start(&mut self.scheduler);
    }

    fn halt_loops(&mut self) {
        self.sampler.stop(&mut self.scheduler);
        self.render.stop(&mut self.scheduler);
    }

    fn require(&self, command: &'static str, allowed: &[SessionState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                command,
                state: self.state.name(),
            })
        }
    }

    fn transition(&mut self, state: SessionState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, samples = self.model.sample_count(), "session");
            self.state = state;
        }
    }
}
