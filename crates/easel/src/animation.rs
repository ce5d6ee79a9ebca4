//! Named animations and the attribute targets they produce.
//!
//! An animation maps a shape to the attribute set each of its backing
//! nodes should reach. A primitive shape has a single node; a composite
//! has a group node carrying its position plus one node per sub-shape.
//! The first target returned always belongs to the shape's own node.

use std::fmt;

use easel_core::{
    attr::{AttrName, Attributes},
    geometry::Point,
    shape::{NodeId, Shape, Style},
};

/// Named animations applied by the render lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationName {
    /// Fade in at the shape's current geometry.
    Show,
    /// Fade out.
    Hide,
    /// Move to the shape's current geometry and style.
    Update,
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Update => "update",
        };
        f.write_str(name)
    }
}

/// Target attributes of `name` for every node backing `shape`.
///
/// Nodes that were not created yet are skipped.
pub fn animation_props(shape: &Shape, name: AnimationName) -> Vec<(NodeId, Attributes)> {
    let mut targets = Vec::new();
    let Some(node) = shape.node() else {
        return targets;
    };

    match shape.composite() {
        Some(composite) => {
            targets.push((
                node,
                Attributes::new().with(AttrName::Position, shape.position()),
            ));
            for sub_shape in composite.sub_shapes() {
                if let Some(sub_node) = sub_shape.node() {
                    targets.push((sub_node, primitive_props(sub_shape, name)));
                }
            }
        }
        None => targets.push((node, primitive_props(shape, name))),
    }
    targets
}

fn primitive_props(shape: &Shape, name: AnimationName) -> Attributes {
    match name {
        AnimationName::Hide => Attributes::new().with(AttrName::Opacity, 0.0_f32),
        AnimationName::Show => Attributes::new()
            .with(AttrName::Position, shape.position())
            .with(AttrName::Rotation, shape.rotation())
            .with(AttrName::Scale, Point::new(1.0, 1.0))
            .with(AttrName::Opacity, shape.style().opacity().unwrap_or(1.0)),
        AnimationName::Update => {
            let mut attrs = Attributes::new()
                .with(AttrName::Position, shape.position())
                .with(AttrName::Rotation, shape.rotation())
                .with(AttrName::Size, shape.size());
            style_props(&mut attrs, shape.style());
            attrs.set(AttrName::Opacity, shape.style().opacity().unwrap_or(1.0));
            if let Some(content) = shape.option().content() {
                attrs.set(AttrName::Text, content.to_string());
            }
            attrs
        }
    }
}

/// Writes every style field that is set.
pub(crate) fn style_props(attrs: &mut Attributes, style: &Style) {
    if let Some(fill) = style.fill() {
        attrs.set(AttrName::Fill, fill);
    }
    if let Some(stroke) = style.stroke() {
        attrs.set(AttrName::Stroke, stroke);
    }
    if let Some(width) = style.line_width() {
        attrs.set(AttrName::LineWidth, width);
    }
    if let Some(size) = style.font_size() {
        attrs.set(AttrName::FontSize, size);
    }
}
