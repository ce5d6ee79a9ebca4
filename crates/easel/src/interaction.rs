//! Pointer interactions driving the viewport transform.
//!
//! Input arrives as [`InteractionEvent`]s, already decoupled from any
//! windowing system. [`Interactions`] dispatches each event to every
//! registered [`Interaction`]; the handlers share one [`InteractionState`]
//! so a drag in progress can suppress zooming.
//!
//! Handlers never touch the renderer directly. They read and mutate the
//! view through the [`Viewport`] trait.

pub mod drag;
pub mod zoom;

pub use drag::{Move, ViewWindow};
pub use zoom::Zoom;

use std::fmt;

use log::debug;

use easel_core::geometry::{Bounds, Point, Size};

use crate::config::InteractionConfig;

/// The view as seen by interaction handlers.
pub trait Viewport {
    /// Size of the drawing container.
    fn container_size(&self) -> Size;

    /// Unscaled bounds of the mounted content.
    fn content_bound(&self) -> Bounds;

    /// Current `[sx, sy]` scale of the view.
    fn global_scale(&self) -> [f32; 2];

    /// Current translation of the view.
    fn global_position(&self) -> Point;

    fn translate_view(&mut self, dx: f32, dy: f32, animate: bool);

    fn scale_view(&mut self, sx: f32, sy: f32, animate: bool);
}

/// Platform-agnostic pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    /// Wheel notch. A positive delta zooms in.
    Wheel { delta: f32 },
}

/// State shared by all interaction handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    moving: bool,
}

impl InteractionState {
    /// True while a drag gesture is panning the view.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }
}

/// A registered interaction handler.
#[derive(Debug, Clone)]
pub enum Interaction {
    Move(Move),
    Zoom(Zoom),
}

impl Interaction {
    /// Feeds one event to the handler. Returns true if the handler
    /// responded by changing the view.
    pub fn handle<V: Viewport>(
        &mut self,
        event: &InteractionEvent,
        state: &mut InteractionState,
        viewport: &mut V,
    ) -> bool {
        match self {
            Self::Move(handler) => handler.handle(event, state, viewport),
            Self::Zoom(handler) => handler.handle(event, state, viewport),
        }
    }
}

type InteractionListener = Box<dyn FnMut(&InteractionEvent)>;

/// Dispatches input events to the registered handlers.
#[derive(Default)]
pub struct Interactions {
    handlers: Vec<Interaction>,
    state: InteractionState,
    listener: Option<InteractionListener>,
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handlers enabled in `config`.
    pub fn from_config(config: &InteractionConfig) -> Self {
        let mut interactions = Self::new();
        if config.drag() {
            interactions.add(Interaction::Move(Move::new()));
        }
        if config.zoom() {
            interactions.add(Interaction::Zoom(Zoom::from_config(config)));
        }
        debug!(handlers = interactions.handlers.len(); "Interactions configured");
        interactions
    }

    pub fn add(&mut self, interaction: Interaction) {
        self.handlers.push(interaction);
    }

    /// Applies a new configuration to the registered zoom handlers.
    pub fn update(&mut self, config: &InteractionConfig) {
        for handler in &mut self.handlers {
            if let Interaction::Zoom(zoom) = handler {
                zoom.update(config);
            }
        }
    }

    /// Sets the listener invoked after a handler responded to an event.
    pub fn on_interaction(&mut self, listener: impl FnMut(&InteractionEvent) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn handlers(&self) -> &[Interaction] {
        &self.handlers
    }

    /// Feeds `event` to every handler in registration order.
    ///
    /// Returns true if any handler responded.
    pub fn dispatch<V: Viewport>(&mut self, event: InteractionEvent, viewport: &mut V) -> bool {
        let mut responded = false;
        for handler in &mut self.handlers {
            if handler.handle(&event, &mut self.state, viewport) {
                responded = true;
                if let Some(listener) = self.listener.as_mut() {
                    listener(&event);
                }
            }
        }
        responded
    }
}

impl fmt::Debug for Interactions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interactions")
            .field("handlers", &self.handlers)
            .field("state", &self.state)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// Minimal viewport used by the handler tests.
#[cfg(test)]
pub(crate) mod test_viewport {
    use super::*;

    #[derive(Debug)]
    pub struct FakeViewport {
        pub container: Size,
        pub bound: Bounds,
        pub position: Point,
        pub scale: [f32; 2],
        pub animated_scales: usize,
    }

    impl FakeViewport {
        pub fn new(container: Size, content: Size) -> Self {
            Self {
                container,
                bound: Bounds::new_from_top_left(Point::default(), content),
                position: Point::default(),
                scale: [1.0, 1.0],
                animated_scales: 0,
            }
        }
    }

    impl Viewport for FakeViewport {
        fn container_size(&self) -> Size {
            self.container
        }

        fn content_bound(&self) -> Bounds {
            self.bound
        }

        fn global_scale(&self) -> [f32; 2] {
            self.scale
        }

        fn global_position(&self) -> Point {
            self.position
        }

        fn translate_view(&mut self, dx: f32, dy: f32, _animate: bool) {
            self.position = self.position.add_point(Point::new(dx, dy));
        }

        fn scale_view(&mut self, sx: f32, sy: f32, animate: bool) {
            self.scale = [sx, sy];
            if animate {
                self.animated_scales += 1;
            }
        }
    }
}
