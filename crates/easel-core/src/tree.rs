//! Storage for the logical shape lists and the remove list.
//!
//! The view-model layer decides which shapes exist and files them into
//! named lists; the renderer walks those lists to mount new shapes and
//! walks the remove list to unmount the ones that were taken away.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    identifier::Id,
    shape::{MountState, Shape},
};

/// Named shape lists plus the shapes waiting to be unmounted.
#[derive(Debug, Default)]
pub struct ShapeTree {
    lists: IndexMap<String, Vec<Shape>>,
    removed: Vec<Shape>,
}

impl ShapeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shape to the named list, creating the list if needed.
    pub fn add_shape(&mut self, list: &str, shape: Shape) {
        trace!(list = list, shape_id = shape.id().to_string(); "Adding shape");
        self.lists.entry(list.to_string()).or_default().push(shape);
    }

    /// Takes a shape out of the logical lists.
    ///
    /// A mounted shape moves to the remove list as `NeedUnmount` so the next
    /// render pass hides and detaches it. A shape that never reached the
    /// scene graph is dropped right away. Returns `false` if no shape with
    /// that id is listed.
    pub fn remove_shape(&mut self, id: Id) -> bool {
        let found = self.lists.values_mut().find_map(|shapes| {
            shapes
                .iter()
                .position(|shape| shape.id() == id)
                .map(|idx| shapes.remove(idx))
        });
        let Some(mut shape) = found else {
            return false;
        };

        if shape.mount_state() == MountState::Mounted {
            // Mounted -> NeedUnmount is always legal.
            let _ = shape.transition(MountState::NeedUnmount);
            debug!(shape_id = id.to_string(); "Shape queued for unmount");
            self.removed.push(shape);
        } else {
            debug!(shape_id = id.to_string(), state:? = shape.mount_state(); "Dropping unmounted shape");
        }
        true
    }

    /// Iterates the named lists in insertion order.
    pub fn lists(&self) -> impl Iterator<Item = (&str, &[Shape])> {
        self.lists
            .iter()
            .map(|(name, shapes)| (name.as_str(), shapes.as_slice()))
    }

    /// All listed shapes, list by list.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.lists.values().flatten()
    }

    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.lists.values_mut().flatten()
    }

    /// Shapes taken out of the lists that still own scene-graph state.
    pub fn removed(&self) -> &[Shape] {
        &self.removed
    }

    pub fn removed_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.removed.iter_mut()
    }

    /// Finds a shape by id in the lists or the remove list.
    pub fn get(&self, id: Id) -> Option<&Shape> {
        self.shapes()
            .chain(self.removed.iter())
            .find(|shape| shape.id() == id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut Shape> {
        self.lists
            .values_mut()
            .flatten()
            .chain(self.removed.iter_mut())
            .find(|shape| shape.id() == id)
    }

    /// Drops removed shapes that finished unmounting. Returns how many went.
    pub fn purge_unmounted(&mut self) -> usize {
        let before = self.removed.len();
        self.removed.retain(|shape| {
            shape.mount_state() != MountState::Unmounted || shape.node().is_some()
        });
        before - self.removed.len()
    }

    /// Number of listed shapes.
    pub fn len(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.lists.clear();
        self.removed.clear();
    }
}
