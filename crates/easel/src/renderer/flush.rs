//! Join barrier for animated flushes.
//!
//! An animated flush starts one transition per queued node and waits for
//! all of them. Several cycles may be running at once; [`FlushState`] keeps
//! them by cycle id together with the interruption flag, so a completed
//! ticket is routed to its own cycle in one lookup.

use std::fmt;

use indexmap::IndexMap;

use easel_core::shape::NodeId;

use super::queue::{Completion, Queue};
use crate::engine::AnimationTicket;

/// Callback fired once a flush has been fully applied.
pub type UpdateCallback = Box<dyn FnOnce()>;

/// A running animated flush.
pub struct FlushCycle {
    cycle: u64,
    total: usize,
    completed: usize,
    pending: IndexMap<NodeId, Option<Completion>>,
    callback: Option<UpdateCallback>,
}

impl FlushCycle {
    pub(crate) fn new(cycle: u64, entries: &Queue, callback: Option<UpdateCallback>) -> Self {
        Self {
            cycle,
            total: entries.len(),
            completed: 0,
            pending: entries
                .iter()
                .map(|(node, entry)| (*node, entry.completion()))
                .collect(),
            callback,
        }
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Number of transitions started by this cycle.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Accounts for a finished transition.
    ///
    /// Returns the entry's completion action, or `None` when the ticket does
    /// not belong to this cycle or was already accounted for.
    pub(crate) fn complete(&mut self, ticket: AnimationTicket) -> Option<Option<Completion>> {
        if ticket.cycle() != self.cycle {
            return None;
        }
        let completion = self.pending.shift_remove(&ticket.node())?;
        self.completed += 1;
        Some(completion)
    }

    pub(crate) fn is_done(&self) -> bool {
        self.completed == self.total
    }

    /// Nodes whose transitions have not finished yet, with their actions.
    pub(crate) fn into_pending(
        self,
    ) -> (
        IndexMap<NodeId, Option<Completion>>,
        Option<UpdateCallback>,
    ) {
        (self.pending, self.callback)
    }

    pub(crate) fn take_callback(&mut self) -> Option<UpdateCallback> {
        self.callback.take()
    }
}

impl fmt::Debug for FlushCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlushCycle")
            .field("cycle", &self.cycle)
            .field("total", &self.total)
            .field("completed", &self.completed)
            .field("pending", &self.pending)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Where the renderer is in the animated part of a flush.
#[derive(Debug, Default)]
pub enum FlushState {
    /// No animated pass is running.
    #[default]
    Idle,
    /// Animated passes waiting for their transitions, by cycle id. Never
    /// empty.
    Flushing(IndexMap<u64, FlushCycle>),
    /// A running pass is being force-finished.
    Interrupted,
}

impl FlushState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_flushing(&self) -> bool {
        matches!(self, Self::Flushing(_))
    }

    /// The running cycle with id `cycle`.
    pub fn cycle(&self, cycle: u64) -> Option<&FlushCycle> {
        match self {
            Self::Flushing(cycles) => cycles.get(&cycle),
            _ => None,
        }
    }

    /// Number of running cycles.
    pub fn running(&self) -> usize {
        match self {
            Self::Flushing(cycles) => cycles.len(),
            _ => 0,
        }
    }
}
