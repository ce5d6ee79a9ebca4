//! Easel - render lifecycle and viewport engine for animated diagram canvases.
//!
//! Logical shapes live in a [`tree::ShapeTree`]. A [`View`] mounts them onto a
//! retained scene graph through a [`engine::SceneEngine`], batches attribute
//! changes into immediate and animated queues, and reports through one
//! after-update callback per render once every animated transition landed.
//! All content hangs under a single global group whose translation and scale
//! form the viewport; [`interaction`] handlers pan and zoom it.
//!
//! # Examples
//!
//! ```rust
//! use easel::{
//!     View,
//!     config::AppConfig,
//!     engine::RecordingEngine,
//!     geometry::{Point, Size},
//!     identifier::Id,
//!     shape::Shape,
//! };
//!
//! let engine = RecordingEngine::new(Size::new(800.0, 600.0));
//! let mut view = View::new(engine, &AppConfig::default()).expect("view");
//!
//! let mut node = Shape::from_type(Id::new("node"), "rect").expect("rect");
//! node.set_position(Point::new(100.0, 80.0));
//! node.set_size(Size::new(120.0, 60.0));
//! view.add_shape("nodes", node);
//!
//! view.render_shapes().expect("render");
//! view.tick();
//! view.engine_mut().complete_animations();
//! view.tick();
//! assert!(view.is_settled());
//! ```

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod interaction;
pub mod renderer;
pub mod view;

pub use easel_core::{attr, color, composite, geometry, identifier, shape, tree};

pub use error::EaselError;
pub use renderer::Renderer;
pub use view::View;
