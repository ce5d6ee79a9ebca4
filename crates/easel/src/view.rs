//! The upward-facing view API.
//!
//! [`View`] owns the [`ShapeTree`] and the [`Renderer`] and sequences a
//! complete render: finish the previous update, run the before-update
//! hooks, lay out composite sub-shapes, mount/unmount, fit the view and
//! flush. The after-update hooks fire once the flush has fully landed.

use std::{cell::RefCell, fmt, rc::Rc};

use log::{debug, info};

use easel_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    shape::Shape,
    tree::ShapeTree,
};

use crate::{
    config::{Adjust, AppConfig, ViewConfig},
    engine::SceneEngine,
    error::EaselError,
    interaction::Viewport,
    renderer::{Renderer, flush::UpdateCallback},
};

type Hook = Box<dyn FnMut()>;

#[derive(Default)]
struct UpdateHooks {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

/// Shapes plus the renderer that keeps them on screen.
pub struct View<E: SceneEngine> {
    tree: ShapeTree,
    renderer: Renderer<E>,
    hooks: Rc<RefCell<UpdateHooks>>,
    config: ViewConfig,
}

impl<E: SceneEngine> View<E> {
    /// Creates an empty view drawing through `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`EaselError::Engine`] if the renderer cannot set up its
    /// global group.
    pub fn new(engine: E, config: &AppConfig) -> Result<Self, EaselError> {
        Ok(Self {
            tree: ShapeTree::new(),
            renderer: Renderer::new(engine, config.animation())?,
            hooks: Rc::new(RefCell::new(UpdateHooks::default())),
            config: config.view().clone(),
        })
    }

    pub fn tree(&self) -> &ShapeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ShapeTree {
        &mut self.tree
    }

    pub fn renderer(&self) -> &Renderer<E> {
        &self.renderer
    }

    pub fn engine(&self) -> &E {
        self.renderer.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.renderer.engine_mut()
    }

    /// Adds a shape to the named list. It is mounted by the next render.
    pub fn add_shape(&mut self, list: &str, shape: Shape) {
        self.tree.add_shape(list, shape);
    }

    /// Removes a shape. A mounted shape is unmounted by the next render.
    pub fn remove_shape(&mut self, id: Id) -> bool {
        self.tree.remove_shape(id)
    }

    /// Registers a hook run at the start of every render.
    pub fn on_before_update(&mut self, hook: impl FnMut() + 'static) {
        self.hooks.borrow_mut().before.push(Box::new(hook));
    }

    /// Registers a hook run once a render's updates have fully landed.
    pub fn on_after_update(&mut self, hook: impl FnMut() + 'static) {
        self.hooks.borrow_mut().after.push(Box::new(hook));
    }

    fn after_update_callback(&self) -> UpdateCallback {
        let hooks = Rc::clone(&self.hooks);
        Box::new(move || {
            for hook in hooks.borrow_mut().after.iter_mut() {
                hook();
            }
        })
    }

    /// Renders the current shape tree.
    ///
    /// A previous update still animating is finished first (its after-update
    /// hooks fire once). Composite sub-shapes are created and laid out,
    /// shapes are mounted or unmounted, the view is fitted according to the
    /// view configuration, and everything is flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if a sub-shape type is unknown or a backing node
    /// cannot be created.
    pub fn render_shapes(&mut self) -> Result<(), EaselError> {
        let callback = self.after_update_callback();
        self.renderer
            .skip_update_shapes(&mut self.tree, Some(callback));

        for hook in self.hooks.borrow_mut().before.iter_mut() {
            hook();
        }

        let mut composites = 0;
        for shape in self.tree.shapes_mut() {
            let id = shape.id();
            if let Some(composite) = shape.composite_mut() {
                composite.create_sub_shapes(id)?;
                shape.update_sub_shapes();
                composites += 1;
            }
        }
        debug!(composites = composites; "Composites laid out");

        self.renderer.render_shapes(&mut self.tree)?;
        self.renderer.adjust_view(
            &self.tree,
            Some(self.config.translate()),
            Some(self.config.scale()),
        );
        let callback = self.after_update_callback();
        self.renderer.update_shapes(&mut self.tree, Some(callback));

        info!(shapes = self.tree.len(); "View rendered");
        Ok(())
    }

    /// Advances animations: completed transitions are accounted for,
    /// deferred passes start, and fully unmounted shapes are dropped.
    pub fn tick(&mut self) {
        self.renderer.tick(&mut self.tree);
        let purged = self.tree.purge_unmounted();
        if purged > 0 {
            debug!(purged = purged; "Purged unmounted shapes");
        }
    }

    /// True when no animated work is queued or running.
    pub fn is_settled(&self) -> bool {
        !self.renderer.has_pending_animations()
    }

    /// Pans the view by `(dx, dy)` and flushes.
    pub fn translate_view(&mut self, dx: f32, dy: f32, animate: bool) {
        self.renderer.translate_view(dx, dy, animate);
        self.renderer.update_shapes(&mut self.tree, None);
    }

    /// Sets the view scale and flushes.
    pub fn scale_view(&mut self, sx: f32, sy: f32, animate: bool) {
        self.renderer.scale_view(sx, sy, animate);
        self.renderer.update_shapes(&mut self.tree, None);
    }

    /// Picks up a new container size, keeping the content centred and
    /// re-applying the configured scale.
    pub fn resize_view(&mut self) {
        self.renderer
            .resize_view(&mut self.tree, Some(self.config.scale()));
    }

    /// Content bounds; see [`Renderer::global_bound`].
    pub fn global_bound(&self, use_shape_bounds: bool) -> Bounds {
        self.renderer.global_bound(&self.tree, use_shape_bounds)
    }

    /// Fits the view with explicit settings and flushes.
    pub fn adjust_view(&mut self, translate: Option<Adjust>, scale: Option<Adjust>) {
        self.renderer.adjust_view(&self.tree, translate, scale);
        self.renderer.update_shapes(&mut self.tree, None);
    }

    /// Drops every shape and all pending work.
    pub fn clear(&mut self) {
        self.renderer.clear();
        self.tree.clear();
        info!("View cleared");
    }
}

impl<E: SceneEngine> Viewport for View<E> {
    fn container_size(&self) -> Size {
        self.renderer.container_size()
    }

    fn content_bound(&self) -> Bounds {
        self.renderer.global().bound()
    }

    fn global_scale(&self) -> [f32; 2] {
        self.renderer.global().scale_factors()
    }

    fn global_position(&self) -> Point {
        self.renderer.global().position()
    }

    fn translate_view(&mut self, dx: f32, dy: f32, animate: bool) {
        View::translate_view(self, dx, dy, animate);
    }

    fn scale_view(&mut self, sx: f32, sy: f32, animate: bool) {
        View::scale_view(self, sx, sy, animate);
    }
}

impl<E: SceneEngine + fmt::Debug> fmt::Debug for View<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("tree", &self.tree)
            .field("engine", self.renderer.engine())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use easel_core::{
        composite::SubShapeConfig,
        shape::{MountState, ShapeOption},
    };

    use super::*;
    use crate::engine::RecordingEngine;

    fn view() -> View<RecordingEngine> {
        View::new(
            RecordingEngine::new(Size::new(800.0, 600.0)),
            &AppConfig::default(),
        )
        .unwrap()
    }

    fn settle(view: &mut View<RecordingEngine>) {
        for _ in 0..4 {
            view.tick();
            view.engine_mut().complete_animations();
        }
        view.tick();
    }

    fn card(id: &str, x: f32, y: f32) -> Shape {
        let mut shape = Shape::from_type(Id::new(id), "composite").unwrap();
        shape.set_position(Point::new(x, y));
        shape.set_size(Size::new(80.0, 40.0));
        shape
            .composite_mut()
            .unwrap()
            .add_sub_shape([(
                "body",
                SubShapeConfig::new("rect")
                    .with_init(|_, _| {
                        easel_core::shape::ShapeConfig::option(
                            ShapeOption::new().with_size(Size::new(80.0, 40.0)),
                        )
                    })
                    .with_draw(|parent: &Shape, sub_shape: &mut Shape| {
                        sub_shape.set_position(parent.position().add_point(Point::new(4.0, 2.0)));
                    }),
            )])
            .unwrap();
        shape
    }

    #[test]
    fn test_render_lays_out_composites() {
        let mut view = view();
        view.add_shape("nodes", card("c", 100.0, 100.0));

        view.render_shapes().unwrap();

        let shape = view.tree().get(Id::new("c")).unwrap();
        let body = shape.composite().unwrap().sub_shape("body").unwrap();
        assert_eq!(body.position(), Point::new(4.0, 2.0));
        assert!(body.node().is_some());
        assert_eq!(shape.mount_state(), MountState::Mounted);
    }

    #[test]
    fn test_hooks_fire_once_per_render() {
        let mut view = view();
        let before = Rc::new(Cell::new(0));
        let after = Rc::new(Cell::new(0));
        let (b, a) = (Rc::clone(&before), Rc::clone(&after));
        view.on_before_update(move || b.set(b.get() + 1));
        view.on_after_update(move || a.set(a.get() + 1));
        view.add_shape("nodes", card("c", 0.0, 0.0));

        view.render_shapes().unwrap();
        assert_eq!((before.get(), after.get()), (1, 0));

        settle(&mut view);
        assert_eq!(after.get(), 1);
        assert!(view.is_settled());
    }

    #[test]
    fn test_render_mid_flight_finishes_previous_update() {
        let mut view = view();
        let after = Rc::new(Cell::new(0));
        let a = Rc::clone(&after);
        view.on_after_update(move || a.set(a.get() + 1));
        view.add_shape("nodes", card("c", 0.0, 0.0));

        view.render_shapes().unwrap();
        view.tick();
        view.remove_shape(Id::new("c"));
        view.render_shapes().unwrap();
        assert_eq!(after.get(), 1);

        settle(&mut view);
        assert_eq!(after.get(), 2);
        assert!(view.tree().removed().is_empty());
        assert!(view.tree().get(Id::new("c")).is_none());
    }

    #[test]
    fn test_viewport_translate_flushes() {
        let mut view = view();

        Viewport::translate_view(&mut view, 10.0, -5.0, false);

        assert_eq!(view.global_position(), Point::new(10.0, -5.0));
        assert!(view.renderer().queues().is_empty());
    }

    #[test]
    fn test_clear_empties_view() {
        let mut view = view();
        view.add_shape("nodes", card("c", 0.0, 0.0));
        view.render_shapes().unwrap();

        view.clear();

        assert!(view.tree().is_empty());
        assert!(view.is_settled());
        assert_eq!(view.global_bound(false), Bounds::default());
    }
}
