//! Logical shapes and their mount lifecycle.
//!
//! A [`Shape`] is the logical counterpart of a node in the external scene
//! graph. It owns its geometry, style and options, and at most one
//! [`NodeId`] referencing the backing node once the renderer has created
//! it. The [`MountState`] tracks where the shape is in its lifecycle
//! relative to the scene graph.

use std::fmt;

use crate::{
    color::Color,
    composite::Composite,
    error::ShapeError,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// Identifier of a node owned by the external scene-graph engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle stage of a shape relative to the scene graph.
///
/// The only legal path is `NeedMount -> Mounted -> NeedUnmount -> Unmounted`.
/// `Unmounted` is terminal: a shape that is shown again is a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MountState {
    #[default]
    NeedMount,
    Mounted,
    NeedUnmount,
    Unmounted,
}

impl MountState {
    /// Returns true if a shape in this state may move to `next`.
    pub fn can_transition_to(self, next: MountState) -> bool {
        matches!(
            (self, next),
            (Self::NeedMount, Self::Mounted)
                | (Self::Mounted, Self::NeedUnmount)
                | (Self::NeedUnmount, Self::Unmounted)
        )
    }
}

/// Visual style of a shape. Unset fields fall back to engine defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    fill: Option<Color>,
    stroke: Option<Color>,
    line_width: Option<f32>,
    opacity: Option<f32>,
    font_size: Option<f32>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }

    pub fn line_width(&self) -> Option<f32> {
        self.line_width
    }

    pub fn opacity(&self) -> Option<f32> {
        self.opacity
    }

    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    /// Overlays every field set in `other` onto this style.
    pub fn merge(&mut self, other: &Style) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.stroke.is_some() {
            self.stroke = other.stroke;
        }
        if other.line_width.is_some() {
            self.line_width = other.line_width;
        }
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
    }
}

/// Non-visual options of a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeOption {
    z_index: i32,
    content: Option<String>,
    size: Option<Size>,
}

impl ShapeOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Stacking order of the shape's node.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Text content, used by text shapes.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Requested size, if any.
    pub fn size(&self) -> Option<Size> {
        self.size
    }
}

/// Partial style/option update applied to a shape.
///
/// Sub-shape `init` functions return one of these, derived from the parent
/// composite's option and style.
#[derive(Debug, Clone, Default)]
pub struct ShapeConfig {
    pub style: Option<Style>,
    pub option: Option<ShapeOption>,
}

impl ShapeConfig {
    pub fn style(style: Style) -> Self {
        Self {
            style: Some(style),
            option: None,
        }
    }

    pub fn option(option: ShapeOption) -> Self {
        Self {
            style: None,
            option: Some(option),
        }
    }
}

/// Primitive node kinds the scene-graph engine can create.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect { size: Size },
    Circle { radius: f32 },
    Text { content: String },
}

/// Concrete geometry of a shape.
#[derive(Debug)]
pub enum ShapeKind {
    Rect,
    Circle,
    Text,
    Composite(Composite),
}

/// A logical shape in the shape tree.
#[derive(Debug)]
pub struct Shape {
    id: Id,
    name: String,
    kind: ShapeKind,
    style: Style,
    option: ShapeOption,
    position: Point,
    size: Size,
    rotation: f32,
    visible: bool,
    dirty: bool,
    element: Option<Id>,
    mount_state: MountState,
    node: Option<NodeId>,
}

impl Shape {
    /// Creates a shape of the given kind.
    pub fn new(id: Id, name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            style: Style::default(),
            option: ShapeOption::default(),
            position: Point::default(),
            size: Size::default(),
            rotation: 0.0,
            visible: false,
            dirty: false,
            element: None,
            mount_state: MountState::NeedMount,
            node: None,
        }
    }

    /// Creates a shape from one of the built-in shape type names:
    /// `rect`, `circle`, `text` or `composite`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::UnknownShapeType`] for any other name.
    pub fn from_type(id: Id, type_name: &str) -> Result<Self, ShapeError> {
        let kind = match type_name {
            "rect" => ShapeKind::Rect,
            "circle" => ShapeKind::Circle,
            "text" => ShapeKind::Text,
            "composite" => ShapeKind::Composite(Composite::new()),
            other => return Err(ShapeError::UnknownShapeType(other.to_string())),
        };
        Ok(Self::new(id, type_name, kind))
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Shape type name this shape was created from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ShapeKind {
        &mut self.kind
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ShapeKind::Text)
    }

    pub fn composite(&self) -> Option<&Composite> {
        match &self.kind {
            ShapeKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn composite_mut(&mut self) -> Option<&mut Composite> {
        match &mut self.kind {
            ShapeKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn option(&self) -> &ShapeOption {
        &self.option
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Data element this shape visualises.
    pub fn element(&self) -> Option<Id> {
        self.element
    }

    pub fn set_element(&mut self, element: Option<Id>) {
        self.element = element;
    }

    pub fn mount_state(&self) -> MountState {
        self.mount_state
    }

    /// Moves the shape to `next` if the lifecycle allows it.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::IllegalTransition`] for any step outside
    /// `NeedMount -> Mounted -> NeedUnmount -> Unmounted`.
    pub fn transition(&mut self, next: MountState) -> Result<(), ShapeError> {
        if !self.mount_state.can_transition_to(next) {
            return Err(ShapeError::IllegalTransition {
                id: self.id,
                from: self.mount_state,
                to: next,
            });
        }
        self.mount_state = next;
        Ok(())
    }

    /// Backing node, if created.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn set_node(&mut self, node: Option<NodeId>) {
        self.node = node;
    }

    /// Clears this shape's node and the nodes of all its sub-shapes.
    pub fn clear_nodes(&mut self) {
        self.node = None;
        if let ShapeKind::Composite(composite) = &mut self.kind {
            for sub_shape in composite.sub_shapes_mut() {
                sub_shape.clear_nodes();
            }
        }
    }

    /// Bounding box of the shape in canvas coordinates.
    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    /// Applies a partial style/option update.
    ///
    /// Style fields are overlaid; an option replaces the current one and,
    /// when it carries a size, resizes the shape.
    pub fn apply_config(&mut self, config: ShapeConfig) {
        if let Some(style) = config.style {
            self.style.merge(&style);
        }
        if let Some(option) = config.option {
            if let Some(size) = option.size {
                self.size = size;
            }
            self.option = option;
        }
    }

    /// Primitive node backing this shape, or `None` for composites which
    /// are backed by a group.
    pub fn primitive(&self) -> Option<Primitive> {
        match self.kind {
            ShapeKind::Rect => Some(Primitive::Rect { size: self.size }),
            ShapeKind::Circle => Some(Primitive::Circle {
                radius: self.size.width().min(self.size.height()) / 2.0,
            }),
            ShapeKind::Text => Some(Primitive::Text {
                content: self.option.content().unwrap_or_default().to_string(),
            }),
            ShapeKind::Composite(_) => None,
        }
    }

    /// Recomputes the relative geometry of every sub-shape of a composite.
    ///
    /// For each binding, in insertion order, the parent's style is
    /// propagated, `init` is applied, `draw` positions the sub-shape, and the
    /// drawn position is made relative to the parent. When the parent is
    /// rotated, every offset is then rotated about `(-width / 2, -height / 2)`.
    /// Does nothing for non-composite shapes.
    pub fn update_sub_shapes(&mut self) {
        let mut bindings = match &mut self.kind {
            ShapeKind::Composite(composite) => composite.take_bindings(),
            _ => return,
        };

        for binding in bindings.values_mut() {
            binding.update_from(self);
        }

        if self.rotation != 0.0 {
            let origin = Point::new(-self.size.width() / 2.0, -self.size.height() / 2.0);
            for sub_shape in bindings.values_mut().filter_map(|b| b.shape_mut()) {
                let offset = sub_shape.position().rotate_around(origin, self.rotation);
                sub_shape.set_position(offset);
                sub_shape.set_rotation(self.rotation);
            }
        }

        if let ShapeKind::Composite(composite) = &mut self.kind {
            composite.restore_bindings(bindings);
        }
    }
}
