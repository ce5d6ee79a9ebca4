//! Immediate and animated attribute queues.
//!
//! Every write the renderer wants to make to a backing node is routed into
//! one of two queues keyed by [`NodeId`]. Writes for a node that already
//! has an entry are merged into it, so each node appears at most once per
//! queue and per flush.

use indexmap::IndexMap;
use log::trace;

use easel_core::{attr::Attributes, identifier::Id, shape::NodeId};

/// Action run once the writes of a queue entry reached the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Detach the shape's node from the global group and forget the nodes
    /// of the shape and its sub-shapes.
    Detach { shape: Id },
}

/// Pending writes for one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueEntry {
    props: Attributes,
    completion: Option<Completion>,
}

impl QueueEntry {
    pub fn props(&self) -> &Attributes {
        &self.props
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub(crate) fn into_parts(self) -> (Attributes, Option<Completion>) {
        (self.props, self.completion)
    }
}

/// Entries in first-write order.
pub type Queue = IndexMap<NodeId, QueueEntry>;

/// The pair of queues filled between two flushes.
#[derive(Debug)]
pub struct UpdateQueues {
    immediate: Queue,
    animated: Queue,
    animations_enabled: bool,
}

impl UpdateQueues {
    pub fn new(animations_enabled: bool) -> Self {
        Self {
            immediate: Queue::new(),
            animated: Queue::new(),
            animations_enabled,
        }
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    /// Queues `props` for `node`.
    ///
    /// With animations disabled every write goes to the immediate queue.
    /// Later values win per attribute and a later completion replaces an
    /// earlier one; writes without a completion keep the existing one.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        props: Attributes,
        animate: bool,
        completion: Option<Completion>,
    ) {
        let animate = animate && self.animations_enabled;
        trace!(node:% = node, animate = animate, attrs = props.len(); "Queue attributes");

        let queue = if animate {
            &mut self.animated
        } else {
            &mut self.immediate
        };
        let entry = queue.entry(node).or_default();
        entry.props.merge(props);
        if completion.is_some() {
            entry.completion = completion;
        }
    }

    pub fn immediate(&self) -> &Queue {
        &self.immediate
    }

    pub fn animated(&self) -> &Queue {
        &self.animated
    }

    pub fn take_immediate(&mut self) -> Queue {
        std::mem::take(&mut self.immediate)
    }

    pub fn take_animated(&mut self) -> Queue {
        std::mem::take(&mut self.animated)
    }

    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.animated.is_empty()
    }

    pub fn clear(&mut self) {
        self.immediate.clear();
        self.animated.clear();
    }
}
