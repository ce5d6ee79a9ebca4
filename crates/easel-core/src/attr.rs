//! Typed attributes written to backing scene-graph nodes.
//!
//! An [`Attributes`] map is the unit of work of the update queues: it maps
//! an [`AttrName`] to the pending [`AttrValue`] for a single node. Merging
//! two maps keeps the key order of the first insertion and lets the later
//! value win.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    color::Color,
    geometry::{Point, Size},
};

/// Name of a node attribute understood by the scene-graph engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrName {
    /// Node position (top-left), relative to the parent node.
    Position,
    /// Rotation in radians.
    Rotation,
    /// Scale factors, stored as a point `(sx, sy)`.
    Scale,
    /// Origin used for rotation and scaling.
    Origin,
    /// Stacking order among siblings.
    ZIndex,
    /// Geometry extent of a primitive.
    Size,
    /// Fill color.
    Fill,
    /// Stroke color.
    Stroke,
    /// Stroke width.
    LineWidth,
    /// Overall opacity in `[0, 1]`.
    Opacity,
    /// Text content of text primitives.
    Text,
    /// Font size of text primitives.
    FontSize,
}

impl AttrName {
    /// Returns the attribute name as the engine spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Origin => "origin",
            Self::ZIndex => "z",
            Self::Size => "shape.size",
            Self::Fill => "style.fill",
            Self::Stroke => "style.stroke",
            Self::LineWidth => "style.lineWidth",
            Self::Opacity => "style.opacity",
            Self::Text => "style.text",
            Self::FontSize => "style.fontSize",
        }
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a node attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Number(f32),
    Point(Point),
    Size(Size),
    Color(Color),
    Text(String),
}

impl AttrValue {
    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the point value, if this is a point.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(point) => Some(*point),
            _ => None,
        }
    }

    /// Returns the size value, if this is a size.
    pub fn as_size(&self) -> Option<Size> {
        match self {
            Self::Size(size) => Some(*size),
            _ => None,
        }
    }

    /// Returns the color value, if this is a color.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<Point> for AttrValue {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<Size> for AttrValue {
    fn from(value: Size) -> Self {
        Self::Size(value)
    }
}

impl From<Color> for AttrValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered set of pending attribute values for one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: IndexMap<AttrName, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute (builder style).
    pub fn with(mut self, name: AttrName, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set(&mut self, name: AttrName, value: impl Into<AttrValue>) {
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: AttrName) -> Option<&AttrValue> {
        self.values.get(&name)
    }

    /// Merges `other` into this set. Values from `other` win.
    pub fn merge(&mut self, other: Attributes) {
        self.values.extend(other.values);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates attributes in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AttrName, &AttrValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

impl IntoIterator for Attributes {
    type Item = (AttrName, AttrValue);
    type IntoIter = indexmap::map::IntoIter<AttrName, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<(AttrName, AttrValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (AttrName, AttrValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_value_wins() {
        let mut attrs = Attributes::new()
            .with(AttrName::Opacity, 0.0_f32)
            .with(AttrName::Position, Point::new(1.0, 2.0));

        attrs.merge(Attributes::new().with(AttrName::Opacity, 1.0_f32));

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get(AttrName::Opacity), Some(&AttrValue::Number(1.0)));
        assert_eq!(
            attrs.get(AttrName::Position).and_then(AttrValue::as_point),
            Some(Point::new(1.0, 2.0))
        );
    }

    #[test]
    fn test_merge_keeps_first_insertion_order() {
        let mut attrs = Attributes::new()
            .with(AttrName::ZIndex, 1.0_f32)
            .with(AttrName::Opacity, 0.0_f32);
        attrs.merge(
            Attributes::new()
                .with(AttrName::Opacity, 1.0_f32)
                .with(AttrName::Rotation, 0.5_f32),
        );

        let names: Vec<_> = attrs.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![AttrName::ZIndex, AttrName::Opacity, AttrName::Rotation]
        );
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(AttrValue::from(2.0_f32).as_number(), Some(2.0));
        assert_eq!(AttrValue::from("hi".to_string()).as_text(), Some("hi"));
        assert!(AttrValue::from(2.0_f32).as_point().is_none());
    }

    #[test]
    fn test_attr_name_display() {
        assert_eq!(AttrName::Opacity.to_string(), "style.opacity");
        assert_eq!(AttrName::ZIndex.to_string(), "z");
    }
}
