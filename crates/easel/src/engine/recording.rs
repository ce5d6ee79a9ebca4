//! In-memory scene-graph engine.
//!
//! [`RecordingEngine`] keeps every node it creates together with its
//! attributes and children, and runs transitions on a manual clock:
//! [`RecordingEngine::advance`] moves time forward and
//! [`RecordingEngine::complete_animations`] finishes everything in flight.

use std::time::Duration;

use indexmap::IndexMap;
use log::{trace, warn};

use easel_core::{
    attr::{AttrName, AttrValue, Attributes},
    geometry::{Point, Size},
    shape::{NodeId, Primitive},
};

use super::{AnimationTicket, Easing, SceneEngine};
use crate::error::EngineError;

/// What a recorded node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Primitive(Primitive),
}

/// A node owned by the [`RecordingEngine`].
#[derive(Debug, Clone)]
pub struct RecordedNode {
    kind: NodeKind,
    attrs: Attributes,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl RecordedNode {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attr(&self, name: AttrName) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Transition {
    node: NodeId,
    from: Attributes,
    target: Attributes,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    ticket: AnimationTicket,
}

impl Transition {
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Scene-graph engine that records everything in memory.
#[derive(Debug)]
pub struct RecordingEngine {
    container: Size,
    pending_container: Option<Size>,
    next_id: u64,
    nodes: IndexMap<NodeId, RecordedNode>,
    roots: Vec<NodeId>,
    transitions: Vec<Transition>,
    completed: Vec<AnimationTicket>,
    fail_creation: bool,
}

impl RecordingEngine {
    /// Creates an engine drawing into a container of the given size.
    pub fn new(container: Size) -> Self {
        Self {
            container,
            pending_container: None,
            next_id: 0,
            nodes: IndexMap::new(),
            roots: Vec::new(),
            transitions: Vec::new(),
            completed: Vec::new(),
            fail_creation: false,
        }
    }

    /// Changes the container size seen after the next [`SceneEngine::resize`].
    pub fn set_container_size(&mut self, size: Size) {
        self.pending_container = Some(size);
    }

    /// Makes every subsequent node creation fail.
    pub fn set_fail_creation(&mut self, fail: bool) {
        self.fail_creation = fail;
    }

    pub fn node(&self, id: NodeId) -> Option<&RecordedNode> {
        self.nodes.get(&id)
    }

    /// All nodes ever created, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &RecordedNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of transitions still running.
    pub fn in_flight(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if `node` is reachable from a root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if self.roots.contains(&current) {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Moves the transition clock forward by `elapsed`.
    ///
    /// Numeric and point attributes are interpolated with the transition's
    /// easing; other attributes snap to their target when the transition
    /// finishes.
    pub fn advance(&mut self, elapsed: Duration) {
        for transition in &mut self.transitions {
            transition.elapsed += elapsed;
        }

        let mut running = Vec::with_capacity(self.transitions.len());
        for transition in std::mem::take(&mut self.transitions) {
            if transition.is_done() {
                self.finish(transition);
            } else {
                self.interpolate(&transition);
                running.push(transition);
            }
        }
        self.transitions = running;
    }

    /// Finishes every running transition.
    pub fn complete_animations(&mut self) {
        for transition in std::mem::take(&mut self.transitions) {
            self.finish(transition);
        }
    }

    fn finish(&mut self, transition: Transition) {
        self.apply(transition.node, transition.target);
        self.completed.push(transition.ticket);
    }

    fn interpolate(&mut self, transition: &Transition) {
        let t = transition.easing.apply(transition.progress());
        let Some(node) = self.nodes.get_mut(&transition.node) else {
            return;
        };
        for (name, target) in transition.target.iter() {
            let value = match (transition.from.get(name), target) {
                (Some(AttrValue::Number(from)), AttrValue::Number(to)) => {
                    AttrValue::Number(lerp(*from, *to, t))
                }
                (Some(AttrValue::Point(from)), AttrValue::Point(to)) => AttrValue::Point(
                    Point::new(lerp(from.x(), to.x(), t), lerp(from.y(), to.y(), t)),
                ),
                _ => continue,
            };
            node.attrs.set(name, value);
        }
    }

    fn apply(&mut self, id: NodeId, attrs: Attributes) {
        match self.nodes.get_mut(&id) {
            Some(node) => node.attrs.merge(attrs),
            None => warn!(node:% = id; "Attribute write on unknown node"),
        }
    }

    fn insert(&mut self, kind: NodeKind, attrs: &Attributes) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        self.nodes.insert(
            id,
            RecordedNode {
                kind,
                attrs: attrs.clone(),
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get_mut(&child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|id| *id != child);
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    (to - from).mul_add(t, from)
}

impl SceneEngine for RecordingEngine {
    fn create_group(&mut self, attrs: &Attributes) -> Result<NodeId, EngineError> {
        if self.fail_creation {
            return Err(EngineError::Create {
                kind: "group",
                reason: "creation disabled".to_string(),
            });
        }
        Ok(self.insert(NodeKind::Group, attrs))
    }

    fn create_primitive(
        &mut self,
        primitive: &Primitive,
        attrs: &Attributes,
    ) -> Result<NodeId, EngineError> {
        if self.fail_creation {
            return Err(EngineError::Create {
                kind: "primitive",
                reason: "creation disabled".to_string(),
            });
        }
        Ok(self.insert(NodeKind::Primitive(primitive.clone()), attrs))
    }

    fn add_to_root(&mut self, node: NodeId) {
        self.detach(node);
        if !self.roots.contains(&node) {
            self.roots.push(node);
        }
    }

    fn add(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            warn!(parent:% = parent, child:% = child; "Attach with unknown node");
            return;
        }
        self.detach(child);
        self.roots.retain(|id| *id != child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn remove(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes.get(&child).and_then(|n| n.parent) == Some(parent) {
            self.detach(child);
        }
    }

    fn attr(&mut self, node: NodeId, name: AttrName, value: AttrValue) {
        trace!(node:% = node, name:% = name; "Set attribute");
        self.apply(node, Attributes::new().with(name, value));
    }

    fn animate_to(
        &mut self,
        node: NodeId,
        target: &Attributes,
        duration: Duration,
        easing: Easing,
        ticket: AnimationTicket,
    ) {
        let from = self
            .nodes
            .get(&node)
            .map(|n| n.attrs.clone())
            .unwrap_or_default();
        self.transitions.push(Transition {
            node,
            from,
            target: target.clone(),
            duration,
            elapsed: Duration::ZERO,
            easing,
            ticket,
        });
    }

    fn stop_animation(&mut self, node: NodeId, apply_final: bool) {
        let (stopped, running) = std::mem::take(&mut self.transitions)
            .into_iter()
            .partition::<Vec<_>, _>(|transition| transition.node == node);
        self.transitions = running;
        if apply_final {
            for transition in stopped {
                self.apply(node, transition.target);
            }
        }
    }

    fn drain_completed(&mut self) -> Vec<AnimationTicket> {
        std::mem::take(&mut self.completed)
    }

    fn resize(&mut self) {
        if let Some(size) = self.pending_container.take() {
            self.container = size;
        }
    }

    fn container_size(&self) -> Size {
        self.container
    }
}
