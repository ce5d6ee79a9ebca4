//! Panning by dragging.
//!
//! A drag gesture starts on pointer-down when the scaled content is larger
//! than the container on at least one axis. The draggable extent is the
//! [`ViewWindow`]: the container grown outward on every side where the
//! content reaches into the edge margin (a quarter of the container). While
//! dragging, the window origin follows the pointer but never leaves
//! `[container - window_extent, 0]`, and the view is translated by the
//! clamped delta.

use log::{debug, trace};

use easel_core::geometry::{Point, Size};

use super::{InteractionEvent, InteractionState, Viewport};

/// Draggable extent of the view, in container coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewWindow {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl ViewWindow {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Computes the window for the current view.
    ///
    /// `edge_offset` is the margin kept free along each container edge.
    /// Scaling is about the content centre.
    pub fn compute<V: Viewport>(viewport: &V, container: Size, edge_offset: Point) -> Self {
        let mut window = Self::new(0.0, 0.0, container.width(), container.height());
        let bound = viewport.content_bound();
        let [sx, sy] = viewport.global_scale();
        let position = viewport.global_position();

        let scaled_width = bound.width() * sx;
        let scaled_height = bound.height() * sy;
        let min_x = bound.min_x() + position.x() + (bound.width() - scaled_width) / 2.0;
        let max_x = min_x + scaled_width;
        let min_y = bound.min_y() + position.y() + (bound.height() - scaled_height) / 2.0;
        let max_y = min_y + scaled_height;

        if min_x < edge_offset.x() {
            window.x = min_x - edge_offset.x();
            window.width += (min_x - edge_offset.x()).abs();
        }
        if max_x > container.width() - edge_offset.x() {
            window.width += max_x - (container.width() - edge_offset.x());
        }
        if min_y < edge_offset.y() {
            window.y = min_y - edge_offset.y();
            window.height += (min_y - edge_offset.y()).abs();
        }
        if max_y > container.height() - edge_offset.y() {
            window.height += max_y - (container.height() - edge_offset.y());
        }
        window
    }
}

/// Drag-to-pan handler.
#[derive(Debug, Clone, Default)]
pub struct Move {
    dragging: bool,
    horizontal: bool,
    vertical: bool,
    cursor: Point,
    container: Size,
    view_window: ViewWindow,
}

impl Move {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Axes enabled for the current gesture, as `(horizontal, vertical)`.
    pub fn axes(&self) -> (bool, bool) {
        (self.horizontal, self.vertical)
    }

    /// Window of the current (or last) gesture.
    pub fn view_window(&self) -> ViewWindow {
        self.view_window
    }

    /// Feeds one event. Returns true if the view was translated.
    pub fn handle<V: Viewport>(
        &mut self,
        event: &InteractionEvent,
        state: &mut InteractionState,
        viewport: &mut V,
    ) -> bool {
        match event {
            InteractionEvent::PointerDown(point) => {
                self.start(*point, state, viewport);
                false
            }
            InteractionEvent::PointerMove(point) if self.dragging => {
                self.drag(*point, viewport);
                true
            }
            InteractionEvent::PointerUp | InteractionEvent::PointerLeave => {
                self.reset(state);
                false
            }
            _ => false,
        }
    }

    fn start<V: Viewport>(&mut self, point: Point, state: &mut InteractionState, viewport: &V) {
        self.container = viewport.container_size();
        let edge_offset = Point::new(self.container.width() / 4.0, self.container.height() / 4.0);
        self.view_window = ViewWindow::compute(viewport, self.container, edge_offset);
        self.cursor = point;

        let bound = viewport.content_bound();
        let [sx, sy] = viewport.global_scale();
        self.horizontal = bound.width() * sx > self.container.width();
        self.vertical = bound.height() * sy > self.container.height();

        if self.horizontal || self.vertical {
            self.dragging = true;
            state.set_moving(true);
            debug!(
                horizontal = self.horizontal,
                vertical = self.vertical,
                window:? = self.view_window;
                "Drag started"
            );
        }
    }

    fn drag<V: Viewport>(&mut self, point: Point, viewport: &mut V) {
        let mut dx = 0.0;
        let mut dy = 0.0;

        if self.horizontal {
            dx = point.x() - self.cursor.x();
            self.view_window.x += dx;

            if self.view_window.x > 0.0 {
                self.view_window.x = 0.0;
                dx = 0.0;
            }
            if self.view_window.x < self.container.width() - self.view_window.width {
                self.view_window.x = self.container.width() - self.view_window.width;
                dx = 0.0;
            }
        }

        if self.vertical {
            dy = point.y() - self.cursor.y();
            self.view_window.y += dy;

            if self.view_window.y > 0.0 {
                self.view_window.y = 0.0;
                dy = 0.0;
            }
            if self.view_window.y < self.container.height() - self.view_window.height {
                self.view_window.y = self.container.height() - self.view_window.height;
                dy = 0.0;
            }
        }

        self.cursor = point;
        trace!(dx = dx, dy = dy; "Drag step");
        viewport.translate_view(dx, dy, false);
    }

    fn reset(&mut self, state: &mut InteractionState) {
        if self.dragging {
            self.dragging = false;
            state.set_moving(false);
            self.horizontal = false;
            self.vertical = false;
            debug!("Drag ended");
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::interaction::test_viewport::FakeViewport;

    fn wide() -> FakeViewport {
        FakeViewport::new(Size::new(800.0, 600.0), Size::new(1600.0, 600.0))
    }

    #[test]
    fn test_wide_content_drags_horizontally_only() {
        let mut viewport = wide();
        let mut state = InteractionState::default();
        let mut handler = Move::new();

        handler.handle(
            &InteractionEvent::PointerDown(Point::new(400.0, 300.0)),
            &mut state,
            &mut viewport,
        );

        assert!(handler.is_dragging());
        assert!(state.is_moving());
        assert_eq!(handler.axes(), (true, false));
    }

    #[test]
    fn test_view_window_extends_into_edge_margins() {
        let viewport = wide();
        let window = ViewWindow::compute(
            &viewport,
            Size::new(800.0, 600.0),
            Point::new(200.0, 150.0),
        );

        assert_approx_eq!(f32, window.x(), -200.0);
        assert_approx_eq!(f32, window.width(), 2000.0);
        assert_approx_eq!(f32, window.y(), -150.0);
        assert_approx_eq!(f32, window.height(), 900.0);
    }

    #[test]
    fn test_leftward_drag_moves_window() {
        let mut viewport = wide();
        let mut state = InteractionState::default();
        let mut handler = Move::new();
        handler.handle(
            &InteractionEvent::PointerDown(Point::new(400.0, 300.0)),
            &mut state,
            &mut viewport,
        );
        let before = handler.view_window().x();

        let responded = handler.handle(
            &InteractionEvent::PointerMove(Point::new(350.0, 320.0)),
            &mut state,
            &mut viewport,
        );

        assert!(responded);
        assert_approx_eq!(f32, handler.view_window().x(), before - 50.0);
        assert_eq!(viewport.position, Point::new(-50.0, 0.0));
    }

    #[test]
    fn test_drag_is_clamped() {
        let mut viewport = wide();
        let mut state = InteractionState::default();
        let mut handler = Move::new();
        handler.handle(
            &InteractionEvent::PointerDown(Point::new(400.0, 300.0)),
            &mut state,
            &mut viewport,
        );

        // Rightward: the window already starts at x = -200.
        handler.handle(
            &InteractionEvent::PointerMove(Point::new(700.0, 300.0)),
            &mut state,
            &mut viewport,
        );

        assert_eq!(handler.view_window().x(), 0.0);
        assert_eq!(viewport.position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_release_clears_moving() {
        let mut viewport = wide();
        let mut state = InteractionState::default();
        let mut handler = Move::new();
        handler.handle(
            &InteractionEvent::PointerDown(Point::new(0.0, 0.0)),
            &mut state,
            &mut viewport,
        );

        handler.handle(&InteractionEvent::PointerLeave, &mut state, &mut viewport);

        assert!(!handler.is_dragging());
        assert!(!state.is_moving());
        assert_eq!(handler.axes(), (false, false));
        assert!(!handler.handle(
            &InteractionEvent::PointerMove(Point::new(10.0, 0.0)),
            &mut state,
            &mut viewport,
        ));
    }

    #[test]
    fn test_fitting_content_does_not_drag() {
        let mut viewport = FakeViewport::new(Size::new(800.0, 600.0), Size::new(200.0, 200.0));
        let mut state = InteractionState::default();
        let mut handler = Move::new();

        handler.handle(
            &InteractionEvent::PointerDown(Point::new(0.0, 0.0)),
            &mut state,
            &mut viewport,
        );

        assert!(!handler.is_dragging());
        assert!(!state.is_moving());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::interaction::test_viewport::FakeViewport;

    /// Whatever the pointer does, the window origin stays within
    /// `[container - extent, 0]` on both axes.
    fn check_window_stays_clamped(
        content: (f32, f32),
        steps: Vec<(f32, f32)>,
    ) -> Result<(), TestCaseError> {
        let container = Size::new(800.0, 600.0);
        let mut viewport = FakeViewport::new(container, Size::new(content.0, content.1));
        let mut state = InteractionState::default();
        let mut handler = Move::new();
        handler.handle(
            &InteractionEvent::PointerDown(Point::new(400.0, 300.0)),
            &mut state,
            &mut viewport,
        );

        let mut pointer = Point::new(400.0, 300.0);
        for (dx, dy) in steps {
            pointer = pointer.add_point(Point::new(dx, dy));
            handler.handle(&InteractionEvent::PointerMove(pointer), &mut state, &mut viewport);

            let window = handler.view_window();
            prop_assert!(window.x() <= 0.0);
            prop_assert!(window.x() >= container.width() - window.width() - 1e-3);
            prop_assert!(window.y() <= 0.0);
            prop_assert!(window.y() >= container.height() - window.height() - 1e-3);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn window_stays_clamped(
            content in (100.0f32..4000.0, 100.0f32..4000.0),
            steps in prop::collection::vec((-300.0f32..300.0, -300.0f32..300.0), 0..24),
        ) {
            check_window_stays_clamped(content, steps)?;
        }
    }
}
