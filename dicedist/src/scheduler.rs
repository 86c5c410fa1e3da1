//! Single-threaded timer queue in virtual time.
//!
//! Periodic work is expressed as one-shot entries: each tick ends by scheduling its successor.
//! Entries run strictly one after another, so the state they touch needs no locking. A loop is
//! cancelled by removing its queued entry.

use std::{cmp::Reverse, collections::BinaryHeap, fmt, time::Duration};

/// The kinds of periodic work a session runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Task {
    Sample,
    Render,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Stopped => f.write_str("stopped"),
            LoopState::Running => f.write_str("running"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Bounds one pass over the queue; see [`Scheduler::begin_turn`].
#[derive(Copy, Clone, Debug)]
pub struct Turn {
    now: Duration,
    seq_limit: u64,
}

impl Turn {
    pub fn now(&self) -> Duration {
        self.now
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Time of the most recent turn.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues `task` to run `delay` after the current time.
    pub fn schedule(&mut self, task: Task, delay: Duration) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Drops every queued entry for `task`.
    pub fn cancel(&mut self, task: Task) {
        self.queue.retain(|Reverse(entry)| entry.task != task);
    }

    pub fn is_scheduled(&self, task: Task) -> bool {
        self.queue.iter().any(|Reverse(entry)| entry.task == task)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Moves the clock forward to `now` (never backward) and opens a turn.
    ///
    /// Only entries that are already queued belong to the turn. Anything scheduled while the
    /// turn runs waits for the next one, even with a zero delay.
    pub fn begin_turn(&mut self, now: Duration) -> Turn {
        self.advance(now);
        Turn {
            now: self.now,
            seq_limit: self.next_seq,
        }
    }

    /// Removes and returns the next task of `turn` that is due, in (due time, queue order).
    pub fn pop_due(&mut self, turn: &Turn) -> Option<Task> {
        match self.queue.peek() {
            Some(Reverse(entry)) if entry.due <= turn.now && entry.seq < turn.seq_limit => {
                self.queue.pop().map(|Reverse(entry)| entry.task)
            }
            _ => None,
        }
    }

    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}
