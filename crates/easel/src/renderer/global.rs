//! The viewport transform.
//!
//! Every mounted shape's node is a child of one group node, the global
//! shape. Translating or scaling that group pans or zooms the whole canvas.
//! The global shape also tracks the bounds of its members so interactions
//! can reason about the content extent.

use indexmap::IndexMap;
use log::trace;

use easel_core::{
    attr::{AttrName, Attributes},
    geometry::{Bounds, Point},
    identifier::Id,
    shape::{NodeId, Shape},
};

use super::queue::UpdateQueues;
use crate::{engine::SceneEngine, error::EngineError};

#[derive(Debug, Clone, Copy)]
struct Member {
    node: NodeId,
    bounds: Bounds,
}

/// Group node carrying the pan/zoom transform of all rendered content.
#[derive(Debug)]
pub struct GlobalShape {
    node: NodeId,
    origin: Point,
    position: Point,
    scale: [f32; 2],
    members: IndexMap<Id, Member>,
}

impl GlobalShape {
    /// Creates the group node, attaches it to the engine root and sets its
    /// scaling origin.
    pub fn new<E: SceneEngine>(engine: &mut E, origin: Point) -> Result<Self, EngineError> {
        let node = engine.create_group(
            &Attributes::new()
                .with(AttrName::Position, Point::default())
                .with(AttrName::Scale, Point::new(1.0, 1.0))
                .with(AttrName::Origin, origin),
        )?;
        engine.add_to_root(node);

        Ok(Self {
            node,
            origin,
            position: Point::default(),
            scale: [1.0, 1.0],
            members: IndexMap::new(),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Point the group scales and rotates about.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Current translation.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current `[sx, sy]` scale factors.
    pub fn scale_factors(&self) -> [f32; 2] {
        self.scale
    }

    /// Moves the scaling origin. Written straight to the node.
    pub fn set_origin<E: SceneEngine>(&mut self, engine: &mut E, origin: Point) {
        self.origin = origin;
        engine.attr(self.node, AttrName::Origin, origin.into());
    }

    /// Translates the group by `(dx, dy)`.
    pub fn translate(&mut self, queues: &mut UpdateQueues, dx: f32, dy: f32, animate: bool) {
        self.position = self.position.add_point(Point::new(dx, dy));
        trace!(dx = dx, dy = dy, animate = animate; "Translate global shape");
        queues.set_attribute(
            self.node,
            Attributes::new().with(AttrName::Position, self.position),
            animate,
            None,
        );
    }

    /// Sets the absolute scale factors of the group.
    pub fn scale(&mut self, queues: &mut UpdateQueues, sx: f32, sy: f32, animate: bool) {
        self.scale = [sx, sy];
        trace!(sx = sx, sy = sy, animate = animate; "Scale global shape");
        queues.set_attribute(
            self.node,
            Attributes::new().with(AttrName::Scale, Point::new(sx, sy)),
            animate,
            None,
        );
    }

    /// Attaches the shape's node to the group and records its bounds.
    ///
    /// Does nothing for a shape without a node.
    pub fn add<E: SceneEngine>(&mut self, engine: &mut E, shape: &Shape) {
        let Some(node) = shape.node() else {
            return;
        };
        engine.add(self.node, node);
        self.members.insert(
            shape.id(),
            Member {
                node,
                bounds: shape.bounds(),
            },
        );
    }

    /// Refreshes the recorded bounds of a member.
    pub fn update(&mut self, shape: &Shape) {
        if let Some(member) = self.members.get_mut(&shape.id()) {
            member.bounds = shape.bounds();
        }
    }

    /// Detaches the shape's node from the group and forgets its bounds.
    pub fn remove<E: SceneEngine>(&mut self, engine: &mut E, shape: &Shape) {
        let member = self.members.shift_remove(&shape.id());
        if let Some(node) = shape.node().or(member.map(|m| m.node)) {
            engine.remove(self.node, node);
        }
    }

    pub fn contains(&self, id: Id) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Union of the member bounds, or empty bounds without members.
    pub fn bound(&self) -> Bounds {
        Bounds::union(self.members.values().map(|m| m.bounds)).unwrap_or_default()
    }

    /// Detaches every member and resets the transform.
    pub fn clear<E: SceneEngine>(&mut self, engine: &mut E) {
        for member in self.members.values() {
            engine.remove(self.node, member.node);
        }
        self.members.clear();
        self.position = Point::default();
        self.scale = [1.0, 1.0];
        engine.attr(self.node, AttrName::Position, self.position.into());
        engine.attr(self.node, AttrName::Scale, Point::new(1.0, 1.0).into());
    }
}

#[cfg(test)]
mod tests {
    use easel_core::{attr::AttrValue, geometry::Size};

    use super::*;
    use crate::engine::RecordingEngine;

    fn engine() -> RecordingEngine {
        RecordingEngine::new(Size::new(800.0, 600.0))
    }

    fn placed(engine: &mut RecordingEngine, id: &str, x: f32, y: f32) -> Shape {
        let mut shape = Shape::from_type(Id::new(id), "rect").unwrap();
        shape.set_position(Point::new(x, y));
        shape.set_size(Size::new(10.0, 10.0));
        let node = engine
            .create_primitive(&shape.primitive().unwrap(), &Attributes::new())
            .unwrap();
        shape.set_node(Some(node));
        shape
    }

    #[test]
    fn test_new_group_is_attached_to_root() {
        let mut engine = engine();
        let global = GlobalShape::new(&mut engine, Point::new(400.0, 300.0)).unwrap();

        assert_eq!(engine.roots(), &[global.node()]);
        assert_eq!(global.scale_factors(), [1.0, 1.0]);
        assert_eq!(global.origin(), Point::new(400.0, 300.0));
    }

    #[test]
    fn test_translate_accumulates() {
        let mut engine = engine();
        let mut queues = UpdateQueues::new(true);
        let mut global = GlobalShape::new(&mut engine, Point::default()).unwrap();

        global.translate(&mut queues, 10.0, 5.0, false);
        global.translate(&mut queues, -4.0, 5.0, false);

        assert_eq!(global.position(), Point::new(6.0, 10.0));
        let props = queues.immediate()[&global.node()].props();
        assert_eq!(
            props.get(AttrName::Position),
            Some(&AttrValue::Point(Point::new(6.0, 10.0)))
        );
    }

    #[test]
    fn test_scale_is_absolute() {
        let mut engine = engine();
        let mut queues = UpdateQueues::new(true);
        let mut global = GlobalShape::new(&mut engine, Point::default()).unwrap();

        global.scale(&mut queues, 2.0, 2.0, true);
        global.scale(&mut queues, 1.5, 1.5, true);

        assert_eq!(global.scale_factors(), [1.5, 1.5]);
        assert_eq!(queues.animated().len(), 1);
    }

    #[test]
    fn test_members_bound() {
        let mut engine = engine();
        let mut global = GlobalShape::new(&mut engine, Point::default()).unwrap();
        let a = placed(&mut engine, "a", 0.0, 0.0);
        let b = placed(&mut engine, "b", 90.0, 40.0);

        global.add(&mut engine, &a);
        global.add(&mut engine, &b);

        let bound = global.bound();
        assert_eq!(bound.width(), 100.0);
        assert_eq!(bound.height(), 50.0);
        assert!(engine.is_attached(b.node().unwrap()));

        global.remove(&mut engine, &b);
        assert_eq!(global.bound().width(), 10.0);
        assert!(!engine.is_attached(b.node().unwrap()));
    }

    #[test]
    fn test_clear_resets_transform() {
        let mut engine = engine();
        let mut queues = UpdateQueues::new(true);
        let mut global = GlobalShape::new(&mut engine, Point::default()).unwrap();
        let a = placed(&mut engine, "a", 0.0, 0.0);
        global.add(&mut engine, &a);
        global.translate(&mut queues, 10.0, 10.0, false);
        global.scale(&mut queues, 2.0, 2.0, false);

        global.clear(&mut engine);

        assert!(global.is_empty());
        assert_eq!(global.position(), Point::default());
        assert_eq!(global.scale_factors(), [1.0, 1.0]);
        assert_eq!(global.bound(), Bounds::default());
        assert!(!engine.is_attached(a.node().unwrap()));
    }
}
