//! SVG snapshots of a recorded scene.
//!
//! Every attached node of a [`RecordingEngine`] becomes an SVG element:
//! groups become `<g>`, primitives become `<rect>`, `<circle>` or `<text>`.
//! Position, rotation and scale are expressed as a `transform`, with scaling
//! and rotation about the node's origin. Siblings are emitted by ascending
//! z-index.

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{Document, Node, node::element as svg_element};

use easel_core::{
    attr::{AttrName, Attributes},
    color::Color,
    geometry::Point,
    shape::{NodeId, Primitive},
};

use crate::{
    engine::{
        SceneEngine,
        recording::{NodeKind, RecordedNode, RecordingEngine},
    },
    export,
};

const DEFAULT_FONT_SIZE: f32 = 12.0;

/// SVG exporter writing to a file.
#[derive(Debug, Clone)]
pub struct Svg {
    file_name: String,
    background: Option<Color>,
}

impl Svg {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            background: None,
        }
    }

    /// Fills the whole canvas with `background` before drawing.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Renders the attached nodes of `engine` into a document sized like
    /// the engine's container.
    pub fn render_scene(&self, engine: &RecordingEngine) -> Document {
        let size = engine.container_size();
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        if let Some(background) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        let mut rendered = 0;
        for id in sorted_by_z(engine, engine.roots()) {
            if let Some(node) = render_node(engine, id, &mut rendered) {
                doc = doc.add(node);
            }
        }
        debug!(nodes = rendered; "Scene rendered to SVG");
        doc
    }

    /// Writes an SVG document to the configured file
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_scene(&self, engine: &RecordingEngine) -> Result<(), export::Error> {
        if engine.roots().is_empty() {
            return Err(export::Error::Render(
                "scene has no attached nodes".to_string(),
            ));
        }
        let doc = self.render_scene(engine);
        self.write_document(doc)
    }
}

fn sorted_by_z(engine: &RecordingEngine, ids: &[NodeId]) -> Vec<NodeId> {
    let mut ids = ids.to_vec();
    ids.sort_by(|a, b| z_index(engine, *a).total_cmp(&z_index(engine, *b)));
    ids
}

fn z_index(engine: &RecordingEngine, id: NodeId) -> f32 {
    engine
        .node(id)
        .and_then(|node| node.attr(AttrName::ZIndex))
        .and_then(|value| value.as_number())
        .unwrap_or_default()
}

fn render_node(engine: &RecordingEngine, id: NodeId, rendered: &mut usize) -> Option<Box<dyn Node>> {
    let node = engine.node(id)?;
    *rendered += 1;
    let attrs = node.attrs();

    let element: Box<dyn Node> = match node.kind() {
        NodeKind::Group => {
            let mut group = svg_element::Group::new().set("data-node", id.to_string());
            for child in sorted_by_z(engine, node.children()) {
                if let Some(child) = render_node(engine, child, rendered) {
                    group = group.add(child);
                }
            }
            if let Some(transform) = transform(attrs) {
                group = group.set("transform", transform);
            }
            if let Some(opacity) = number(attrs, AttrName::Opacity) {
                group = group.set("opacity", opacity);
            }
            Box::new(group)
        }
        NodeKind::Primitive(primitive) => render_primitive(node, primitive),
    };
    Some(element)
}

fn render_primitive(node: &RecordedNode, primitive: &Primitive) -> Box<dyn Node> {
    let attrs = node.attrs();
    match primitive {
        Primitive::Rect { size } => {
            let size = attrs
                .get(AttrName::Size)
                .and_then(|value| value.as_size())
                .unwrap_or(*size);
            let rect = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height());
            Box::new(paint(rect, attrs, "none"))
        }
        Primitive::Circle { radius } => {
            let radius = attrs
                .get(AttrName::Size)
                .and_then(|value| value.as_size())
                .map_or(*radius, |size| size.width().min(size.height()) / 2.0);
            let circle = svg_element::Circle::new()
                .set("cx", radius)
                .set("cy", radius)
                .set("r", radius);
            Box::new(paint(circle, attrs, "none"))
        }
        Primitive::Text { content } => {
            let content = attrs
                .get(AttrName::Text)
                .and_then(|value| value.as_text())
                .unwrap_or(content);
            let font_size = number(attrs, AttrName::FontSize).unwrap_or(DEFAULT_FONT_SIZE);
            let text = svg_element::Text::new(content)
                .set("x", 0)
                .set("y", 0)
                .set("dominant-baseline", "hanging")
                .set("font-size", font_size);
            Box::new(paint(text, attrs, "black"))
        }
    }
}

/// Applies transform, opacity and paint attributes to a primitive element.
fn paint<T: Node>(mut element: T, attrs: &Attributes, default_fill: &str) -> T {
    if let Some(transform) = transform(attrs) {
        element.assign("transform", transform);
    }
    if let Some(opacity) = number(attrs, AttrName::Opacity) {
        element.assign("opacity", opacity);
    }
    match color(attrs, AttrName::Fill) {
        Some(fill) => {
            element.assign("fill", fill.to_string());
            element.assign("fill-opacity", fill.alpha());
        }
        None => element.assign("fill", default_fill),
    }
    if let Some(stroke) = color(attrs, AttrName::Stroke) {
        element.assign("stroke", stroke.to_string());
        element.assign("stroke-opacity", stroke.alpha());
        if let Some(width) = number(attrs, AttrName::LineWidth) {
            element.assign("stroke-width", width);
        }
    }
    element
}

fn number(attrs: &Attributes, name: AttrName) -> Option<f32> {
    attrs.get(name).and_then(|value| value.as_number())
}

fn color(attrs: &Attributes, name: AttrName) -> Option<Color> {
    attrs.get(name).and_then(|value| value.as_color())
}

/// Builds the `transform` of a node: translate to the position, then rotate
/// and scale about the origin.
fn transform(attrs: &Attributes) -> Option<String> {
    let position = attrs
        .get(AttrName::Position)
        .and_then(|value| value.as_point())
        .unwrap_or_default();
    let rotation = number(attrs, AttrName::Rotation).unwrap_or_default();
    let scale = attrs
        .get(AttrName::Scale)
        .and_then(|value| value.as_point())
        .unwrap_or(Point::new(1.0, 1.0));
    let origin = attrs
        .get(AttrName::Origin)
        .and_then(|value| value.as_point())
        .unwrap_or_default();

    let mut parts = Vec::new();
    if position != Point::default() {
        parts.push(format!("translate({} {})", position.x(), position.y()));
    }
    let rotated = rotation != 0.0;
    let scaled = scale != Point::new(1.0, 1.0);
    if rotated || scaled {
        parts.push(format!("translate({} {})", origin.x(), origin.y()));
        if rotated {
            parts.push(format!("rotate({})", rotation.to_degrees()));
        }
        if scaled {
            parts.push(format!("scale({} {})", scale.x(), scale.y()));
        }
        parts.push(format!("translate({} {})", -origin.x(), -origin.y()));
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use easel_core::geometry::Size;

    use super::*;
    use crate::export::Exporter;

    fn scene() -> (RecordingEngine, NodeId) {
        let mut engine = RecordingEngine::new(Size::new(200.0, 100.0));
        let group = engine
            .create_group(&Attributes::new().with(AttrName::Position, Point::new(10.0, 20.0)))
            .unwrap();
        engine.add_to_root(group);
        let rect = engine
            .create_primitive(
                &Primitive::Rect {
                    size: Size::new(30.0, 40.0),
                },
                &Attributes::new()
                    .with(AttrName::Fill, Color::new("red").unwrap())
                    .with(AttrName::ZIndex, 2.0),
            )
            .unwrap();
        let label = engine
            .create_primitive(
                &Primitive::Text {
                    content: "hello".to_string(),
                },
                &Attributes::new().with(AttrName::ZIndex, 1.0),
            )
            .unwrap();
        engine.add(group, rect);
        engine.add(group, label);
        (engine, group)
    }

    #[test]
    fn test_render_scene_emits_nodes() {
        let (engine, _) = scene();
        let doc = Svg::new("unused.svg").render_scene(&engine).to_string();

        assert!(doc.contains("viewBox=\"0 0 200 100\""));
        assert!(doc.contains("translate(10 20)"));
        assert!(doc.contains("width=\"30\""));
        assert!(doc.contains("hello"));
        // Lower z-index first.
        let text_at = doc.find("<text").unwrap();
        let rect_at = doc.find("<rect").unwrap();
        assert!(text_at < rect_at);
    }

    #[test]
    fn test_background_is_first() {
        let (engine, _) = scene();
        let doc = Svg::new("unused.svg")
            .with_background(Some(Color::new("white").unwrap()))
            .render_scene(&engine)
            .to_string();

        let background_at = doc.find("<rect").unwrap();
        assert!(background_at < doc.find("<g").unwrap());
    }

    #[test]
    fn test_transform_scales_about_origin() {
        let attrs = Attributes::new()
            .with(AttrName::Scale, Point::new(2.0, 2.0))
            .with(AttrName::Origin, Point::new(50.0, 25.0));

        assert_eq!(
            transform(&attrs).unwrap(),
            "translate(50 25) scale(2 2) translate(-50 -25)"
        );
        assert!(transform(&Attributes::new()).is_none());
    }

    #[test]
    fn test_detached_nodes_are_skipped() {
        let (mut engine, group) = scene();
        let orphan = engine
            .create_primitive(
                &Primitive::Circle { radius: 5.0 },
                &Attributes::new(),
            )
            .unwrap();
        assert!(!engine.is_attached(orphan));
        assert!(engine.is_attached(group));

        let doc = Svg::new("unused.svg").render_scene(&engine).to_string();
        assert!(!doc.contains("<circle"));
    }

    #[test]
    fn test_empty_scene_is_not_exported() {
        let engine = RecordingEngine::new(Size::new(10.0, 10.0));
        let err = Svg::new("unused.svg").export_scene(&engine).unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let (engine, _) = scene();
        let svg = Svg::new("/nonexistent-easel-dir/out.svg");
        let err = svg.write_document(svg.render_scene(&engine)).unwrap_err();
        assert!(matches!(err, export::Error::Io(_)));
    }
}
