mod config;
mod distribution;
mod error;
mod histogram;
mod model;
mod parser;
mod render;
mod sampler;
mod snapshot;

pub mod outcomes;
pub mod scheduler;
pub mod session;

pub use config::{DieConfig, MAX_BINS};
pub use distribution::TheoreticalDistribution;
pub use error::Error;
pub use histogram::Histogram;
pub use model::DiceModel;
pub use parser::DieParser;
pub use render::{RenderLoop, DEFAULT_RENDER_PERIOD};
pub use sampler::SamplerLoop;
pub use session::{Session, SessionState};
pub use snapshot::Snapshot;

use serde::Serialize;
use smallvec::SmallVec;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Source of die faces.
pub trait Roller {
    /// Returns a uniformly distributed integer in `low..=high`.
    fn uniform(&mut self, low: u32, high: u32) -> u32;

    fn roll(&mut self, config: DieConfig) -> Roll {
        let faces = (0..config.dice())
            .map(|_| self.uniform(1, config.sides()))
            .collect();

        Roll {
            faces,
            sides: config.sides(),
        }
    }
}

impl<R: Roller + ?Sized> Roller for Box<R> {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        (**self).uniform(low, high)
    }
}

/// Receives a snapshot each time the render loop fires.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &Snapshot) {
        (**self).render(snapshot)
    }
}

/// The faces of one roll of every configured die.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Roll {
    faces: SmallVec<[u32; 8]>,
    sides: u32,
}

impl Roll {
    pub fn sum(&self) -> u32 {
        self.faces.iter().sum()
    }

    pub fn faces(&'_ self) -> impl Iterator<Item = (Highlight, u32)> + '_ {
        self.faces.iter().map(move |&x| match x {
            1 => (Highlight::Low, 1),
            x if x == self.sides => (Highlight::High, x),
            x => (Highlight::Normal, x),
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Highlight {
    High,
    Low,
    Normal,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, rc::Rc};

    use crate::{Renderer, Roller, Snapshot};

    /// Replays a fixed script of faces, cycling when it runs out.
    pub struct ScriptedRoller {
        script: Vec<u32>,
        position: usize,
    }

    impl ScriptedRoller {
        pub fn new(script: impl Into<Vec<u32>>) -> Self {
            Self {
                script: script.into(),
                position: 0,
            }
        }
    }

    impl Roller for ScriptedRoller {
        fn uniform(&mut self, low: u32, high: u32) -> u32 {
            let value = self.script[self.position % self.script.len()];
            self.position += 1;
            assert!((low..=high).contains(&value), "scripted face out of range");
            value
        }
    }

    /// Keeps every snapshot it is handed; clones share the same record.
    #[derive(Clone, Default)]
    pub struct RecordingRenderer {
        pub frames: Rc<RefCell<Vec<Snapshot>>>,
    }

    impl RecordingRenderer {
        pub fn count(&self) -> usize {
            self.frames.borrow().len()
        }

        pub fn last(&self) -> Option<Snapshot> {
            self.frames.borrow().last().cloned()
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, snapshot: &Snapshot) {
            self.frames.borrow_mut().push(snapshot.clone());
        }
    }
}
