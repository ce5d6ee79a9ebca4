//! Interface to the external 2D scene-graph engine.
//!
//! The renderer is the only component that talks to a [`SceneEngine`]. All
//! node creation, attachment and attribute traffic goes through this trait,
//! which keeps the render lifecycle independent of the backend drawing the
//! pixels. [`RecordingEngine`] is an in-memory implementation used by the
//! tests and the CLI.

pub mod recording;

pub use recording::RecordingEngine;

use std::time::Duration;

use serde::Deserialize;

use easel_core::{
    attr::{AttrName, AttrValue, Attributes},
    geometry::Size,
    shape::{NodeId, Primitive},
};

use crate::error::EngineError;

/// Identifies one animated transition of one flush cycle.
///
/// The renderer hands a ticket to the engine with every animated
/// transition, and the engine hands it back through
/// [`SceneEngine::drain_completed`] once the transition finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket {
    cycle: u64,
    node: NodeId,
}

impl AnimationTicket {
    pub fn new(cycle: u64, node: NodeId) -> Self {
        Self { cycle, node }
    }

    /// Flush cycle this transition belongs to.
    pub fn cycle(self) -> u64 {
        self.cycle
    }

    pub fn node(self) -> NodeId {
        self.node
    }
}

/// Timing function of animated transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    QuadraticOut,
    CubicOut,
    CubicInOut,
    #[default]
    QuinticOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticOut => t * (2.0 - t),
            Self::CubicOut => {
                let k = t - 1.0;
                k * k * k + 1.0
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let k = 2.0 * t - 2.0;
                    0.5 * k * k * k + 1.0
                }
            }
            Self::QuinticOut => {
                let k = t - 1.0;
                k * k * k * k * k + 1.0
            }
        }
    }
}

/// Operations the renderer needs from a scene-graph engine.
///
/// Node creation is fallible; every other call addresses a node the
/// renderer created earlier and is expected to succeed.
pub trait SceneEngine {
    /// Creates a group node carrying `attrs`.
    fn create_group(&mut self, attrs: &Attributes) -> Result<NodeId, EngineError>;

    /// Creates a primitive node carrying `attrs`.
    fn create_primitive(
        &mut self,
        primitive: &Primitive,
        attrs: &Attributes,
    ) -> Result<NodeId, EngineError>;

    /// Attaches `node` to the engine root.
    fn add_to_root(&mut self, node: NodeId);

    /// Attaches `child` to `parent`, detaching it from any previous parent.
    fn add(&mut self, parent: NodeId, child: NodeId);

    /// Detaches `child` from `parent`.
    fn remove(&mut self, parent: NodeId, child: NodeId);

    /// Writes one attribute without animation.
    fn attr(&mut self, node: NodeId, name: AttrName, value: AttrValue);

    /// Starts a timed transition of `node` towards `target`.
    ///
    /// When it finishes, `ticket` must be reported by
    /// [`drain_completed`](Self::drain_completed).
    fn animate_to(
        &mut self,
        node: NodeId,
        target: &Attributes,
        duration: Duration,
        easing: Easing,
        ticket: AnimationTicket,
    );

    /// Stops every transition of `node`. With `apply_final`, the target
    /// values are written immediately. Stopped transitions are not reported
    /// as completed.
    fn stop_animation(&mut self, node: NodeId, apply_final: bool);

    /// Returns the tickets of transitions that finished since the last call.
    fn drain_completed(&mut self) -> Vec<AnimationTicket>;

    /// Re-reads the container size.
    fn resize(&mut self);

    /// Current size of the drawing container.
    fn container_size(&self) -> Size;
}
