//! Zooming with the wheel.

use log::{trace, warn};

use super::{InteractionEvent, InteractionState, Viewport};
use crate::config::{InteractionConfig, ZoomRange};

const DEFAULT_ZOOM_DELTA: f32 = 0.25;
const DEFAULT_MIN_ZOOM: f32 = 0.25;
const DEFAULT_MAX_ZOOM: f32 = 4.0;

/// Wheel-to-zoom handler.
///
/// Each wheel notch steps both scale axes by `zoom_delta` and clamps them
/// into `[min_zoom, max_zoom]`. Wheel input is ignored while a drag is in
/// progress.
#[derive(Debug, Clone)]
pub struct Zoom {
    zoom_delta: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            zoom_delta: DEFAULT_ZOOM_DELTA,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl Zoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        let mut zoom = Self {
            zoom_delta: config.zoom_delta(),
            ..Self::default()
        };
        zoom.set_range(config.zoom_range());
        zoom
    }

    /// Re-applies the zoom step and range of `config`.
    pub fn update(&mut self, config: &InteractionConfig) {
        self.zoom_delta = config.zoom_delta();
        self.set_range(config.zoom_range());
    }

    /// Sets the zoom limits.
    ///
    /// Each bound is clamped to be non-negative; an inverted range is
    /// swapped. A boolean range leaves the limits unchanged.
    pub fn set_range(&mut self, range: ZoomRange) {
        let ZoomRange::Range([min, max]) = range else {
            return;
        };
        let mut min = min.max(0.0);
        let mut max = max.max(0.0);
        if min > max {
            warn!(min = min, max = max; "Inverted zoom range, swapping bounds");
            std::mem::swap(&mut min, &mut max);
        }
        self.min_zoom = min;
        self.max_zoom = max;
    }

    /// Current `(min, max)` zoom limits.
    pub fn range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn zoom_delta(&self) -> f32 {
        self.zoom_delta
    }

    /// Feeds one event. Returns true if the view was scaled.
    pub fn handle<V: Viewport>(
        &mut self,
        event: &InteractionEvent,
        state: &mut InteractionState,
        viewport: &mut V,
    ) -> bool {
        let InteractionEvent::Wheel { delta } = event else {
            return false;
        };
        if state.is_moving() {
            return false;
        }

        let step = if *delta > 0.0 {
            self.zoom_delta
        } else {
            -self.zoom_delta
        };
        let [sx, sy] = viewport.global_scale();
        let sx = (sx + step).clamp(self.min_zoom, self.max_zoom);
        let sy = (sy + step).clamp(self.min_zoom, self.max_zoom);

        trace!(sx = sx, sy = sy; "Zoom step");
        viewport.scale_view(sx, sy, true);
        true
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use easel_core::geometry::Size;

    use super::*;
    use crate::interaction::test_viewport::FakeViewport;

    fn viewport() -> FakeViewport {
        FakeViewport::new(Size::new(800.0, 600.0), Size::new(400.0, 300.0))
    }

    fn wheel(zoom: &mut Zoom, viewport: &mut FakeViewport, delta: f32) -> bool {
        zoom.handle(
            &InteractionEvent::Wheel { delta },
            &mut InteractionState::default(),
            viewport,
        )
    }

    #[test]
    fn test_wheel_up_steps_scale() {
        let mut zoom = Zoom::new();
        let mut viewport = viewport();

        assert!(wheel(&mut zoom, &mut viewport, 1.0));

        assert_approx_eq!(f32, viewport.scale[0], 1.25);
        assert_approx_eq!(f32, viewport.scale[1], 1.25);
        assert_eq!(viewport.animated_scales, 1);
    }

    #[test]
    fn test_fifteen_wheel_ups_clamp_at_max() {
        let mut zoom = Zoom::new();
        let mut viewport = viewport();

        for _ in 0..15 {
            wheel(&mut zoom, &mut viewport, 1.0);
        }

        assert_approx_eq!(f32, viewport.scale[0], 4.0);
        assert_approx_eq!(f32, viewport.scale[1], 4.0);
    }

    #[test]
    fn test_wheel_down_clamps_at_min() {
        let mut zoom = Zoom::new();
        let mut viewport = viewport();

        for _ in 0..10 {
            wheel(&mut zoom, &mut viewport, -1.0);
        }

        assert_approx_eq!(f32, viewport.scale[0], 0.25);
    }

    #[test]
    fn test_ignored_while_moving() {
        let mut zoom = Zoom::new();
        let mut viewport = viewport();
        let mut state = InteractionState::default();
        state.set_moving(true);

        let responded = zoom.handle(&InteractionEvent::Wheel { delta: 1.0 }, &mut state, &mut viewport);

        assert!(!responded);
        assert_eq!(viewport.scale, [1.0, 1.0]);
    }

    #[test]
    fn test_range_is_clamped_and_swapped() {
        let mut zoom = Zoom::new();

        zoom.set_range(ZoomRange::Range([-1.0, 2.0]));
        assert_eq!(zoom.range(), (0.0, 2.0));

        zoom.set_range(ZoomRange::Range([3.0, 0.5]));
        assert_eq!(zoom.range(), (0.5, 3.0));

        zoom.set_range(ZoomRange::Enabled(false));
        assert_eq!(zoom.range(), (0.5, 3.0));
    }

    #[test]
    fn test_from_config() {
        let config = InteractionConfig::new(true, true, ZoomRange::Range([0.5, 2.0]), 0.5);
        let zoom = Zoom::from_config(&config);

        assert_eq!(zoom.range(), (0.5, 2.0));
        assert_eq!(zoom.zoom_delta(), 0.5);
    }
}
