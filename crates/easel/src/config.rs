//! Configuration types for the Easel canvas engine.
//!
//! This module provides configuration structures that control animation,
//! interaction and view fitting. All types implement [`serde::Deserialize`]
//! for flexible loading from external sources, and every field falls back
//! to its default when missing.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`AnimationConfig`] - Whether and how attribute updates are animated.
//! - [`InteractionConfig`] - Drag and zoom handlers and the zoom range.
//! - [`ViewConfig`] - How the view is translated and scaled after a render.
//!
//! # Example
//!
//! ```
//! # use easel::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.animation().enable_animation());
//! assert!(config.view().background_color().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use easel_core::color::Color;

use crate::engine::Easing;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Animation configuration section.
    #[serde(default)]
    animation: AnimationConfig,

    /// Interaction configuration section.
    #[serde(default)]
    interaction: InteractionConfig,

    /// View configuration section.
    #[serde(default)]
    view: ViewConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        animation: AnimationConfig,
        interaction: InteractionConfig,
        view: ViewConfig,
    ) -> Self {
        Self {
            animation,
            interaction,
            view,
        }
    }

    /// Returns the animation configuration.
    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    /// Returns the interaction configuration.
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    /// Returns the view configuration.
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }
}

fn default_true() -> bool {
    true
}

fn default_duration() -> u64 {
    1000
}

fn default_zoom_delta() -> f32 {
    0.25
}

/// Animation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    /// Global switch; when off every update is applied immediately.
    #[serde(default = "default_true")]
    enable_animation: bool,

    /// Transition duration in milliseconds.
    #[serde(default = "default_duration")]
    duration: u64,

    /// Timing function.
    #[serde(default)]
    easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enable_animation: true,
            duration: default_duration(),
            easing: Easing::default(),
        }
    }
}

impl AnimationConfig {
    /// Creates a new [`AnimationConfig`].
    ///
    /// # Arguments
    ///
    /// * `enable_animation` - Whether updates are animated at all.
    /// * `duration` - Transition duration.
    /// * `easing` - Timing function of transitions.
    pub fn new(enable_animation: bool, duration: Duration, easing: Easing) -> Self {
        Self {
            enable_animation,
            duration: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            easing,
        }
    }

    pub fn enable_animation(&self) -> bool {
        self.enable_animation
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration)
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}

/// Zoom limits: an explicit `[min, max]` range, or a flag keeping the
/// default range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ZoomRange {
    Range([f32; 2]),
    Enabled(bool),
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Interaction settings.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    /// Enables panning by dragging.
    #[serde(default = "default_true")]
    drag: bool,

    /// Enables zooming with the wheel.
    #[serde(default = "default_true")]
    zoom: bool,

    /// Zoom limits.
    #[serde(default)]
    zoom_range: ZoomRange,

    /// Scale step of one wheel notch.
    #[serde(default = "default_zoom_delta")]
    zoom_delta: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag: true,
            zoom: true,
            zoom_range: ZoomRange::default(),
            zoom_delta: default_zoom_delta(),
        }
    }
}

impl InteractionConfig {
    pub fn new(drag: bool, zoom: bool, zoom_range: ZoomRange, zoom_delta: f32) -> Self {
        Self {
            drag,
            zoom,
            zoom_range,
            zoom_delta,
        }
    }

    pub fn drag(&self) -> bool {
        self.drag
    }

    pub fn zoom(&self) -> bool {
        self.zoom
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    pub fn zoom_delta(&self) -> f32 {
        self.zoom_delta
    }
}

/// How a view transform is chosen: fitted automatically or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "AdjustRepr")]
pub enum Adjust {
    #[default]
    Auto,
    Fixed([f32; 2]),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum AdjustKeyword {
    Auto,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AdjustRepr {
    Keyword(AdjustKeyword),
    Fixed([f32; 2]),
}

impl From<AdjustRepr> for Adjust {
    fn from(repr: AdjustRepr) -> Self {
        match repr {
            AdjustRepr::Keyword(AdjustKeyword::Auto) => Self::Auto,
            AdjustRepr::Fixed(values) => Self::Fixed(values),
        }
    }
}

/// View fitting and styling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewConfig {
    /// Translation applied after a render.
    #[serde(default)]
    translate: Adjust,

    /// Scale applied after a render.
    #[serde(default)]
    scale: Adjust,

    /// Background [`Color`] of exported snapshots, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl ViewConfig {
    pub fn new(translate: Adjust, scale: Adjust, background_color: Option<String>) -> Self {
        Self {
            translate,
            scale,
            background_color,
        }
    }

    pub fn translate(&self) -> Adjust {
        self.translate
    }

    pub fn scale(&self) -> Adjust {
        self.scale
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.animation().enable_animation());
        assert_eq!(config.animation().duration(), Duration::from_millis(1000));
        assert_eq!(config.animation().easing(), Easing::QuinticOut);
        assert!(config.interaction().drag());
        assert_eq!(config.interaction().zoom_range(), ZoomRange::Enabled(true));
        assert_eq!(config.interaction().zoom_delta(), 0.25);
        assert_eq!(config.view().translate(), Adjust::Auto);
        assert_eq!(config.view().background_color(), Ok(None));
    }

    #[test]
    fn test_deserialize_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [animation]
            enable_animation = false
            duration = 300
            easing = "cubicInOut"

            [interaction]
            drag = false
            zoom_range = [0.5, 2.0]
            zoom_delta = 0.1

            [view]
            translate = [10, 20]
            scale = "auto"
            background_color = "white"
            "#,
        )
        .unwrap();

        assert!(!config.animation().enable_animation());
        assert_eq!(config.animation().duration(), Duration::from_millis(300));
        assert_eq!(config.animation().easing(), Easing::CubicInOut);
        assert!(!config.interaction().drag());
        assert!(config.interaction().zoom());
        assert_eq!(config.interaction().zoom_range(), ZoomRange::Range([0.5, 2.0]));
        assert_eq!(config.interaction().zoom_delta(), 0.1);
        assert_eq!(config.view().translate(), Adjust::Fixed([10.0, 20.0]));
        assert_eq!(config.view().scale(), Adjust::Auto);
        assert!(config.view().background_color().unwrap().is_some());
    }

    #[test]
    fn test_deserialize_flag_zoom_range_and_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [interaction]
            zoom_range = false

            [view]
            scale = [1.5, 1.5]
            "#,
        )
        .unwrap();

        assert_eq!(config.interaction().zoom_range(), ZoomRange::Enabled(false));
        assert_eq!(config.view().translate(), Adjust::Auto);
        assert_eq!(config.view().scale(), Adjust::Fixed([1.5, 1.5]));
        assert!(config.animation().enable_animation());
    }

    #[test]
    fn test_deserialize_rejects_unknown_adjust_keyword() {
        let result = toml::from_str::<AppConfig>(
            r#"
            [view]
            scale = "fit"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_background_color() {
        let view = ViewConfig::new(Adjust::Auto, Adjust::Auto, Some("nope".to_string()));
        assert!(view.background_color().is_err());
    }

    #[test]
    fn test_animation_new_round_trips_duration() {
        let config = AnimationConfig::new(false, Duration::from_millis(250), Easing::Linear);
        assert_eq!(config.duration(), Duration::from_millis(250));
        assert!(!config.enable_animation());
    }
}
