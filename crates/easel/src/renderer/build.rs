//! Creation of backing nodes.

use log::debug;

use easel_core::{
    attr::{AttrName, Attributes},
    shape::{NodeId, Shape},
};

use crate::{animation::style_props, engine::SceneEngine, error::EngineError};

/// Creates the backing node of `shape`.
///
/// A primitive shape becomes one primitive node. A composite becomes a
/// group node; each sub-shape keeps its existing node or gets a new one,
/// and is attached as a child of the group. Sub-shape node ids are stored
/// on the sub-shapes; the returned id is the shape's own node.
pub(crate) fn create_node<E: SceneEngine>(
    engine: &mut E,
    shape: &mut Shape,
) -> Result<NodeId, EngineError> {
    if let Some(primitive) = shape.primitive() {
        return engine.create_primitive(&primitive, &initial_attrs(shape));
    }

    let group = engine.create_group(
        &Attributes::new()
            .with(AttrName::Position, shape.position())
            .with(AttrName::ZIndex, shape.option().z_index() as f32),
    )?;
    debug!(shape_id = shape.id().to_string(), node:% = group; "Created composite group");

    if let Some(composite) = shape.composite_mut() {
        for sub_shape in composite.sub_shapes_mut() {
            let node = match sub_shape.node() {
                Some(node) => node,
                None => {
                    let node = create_node(engine, sub_shape)?;
                    sub_shape.set_node(Some(node));
                    node
                }
            };
            engine.add(group, node);
        }
    }
    Ok(group)
}

fn initial_attrs(shape: &Shape) -> Attributes {
    let mut attrs = Attributes::new()
        .with(AttrName::Position, shape.position())
        .with(AttrName::Rotation, shape.rotation())
        .with(AttrName::ZIndex, shape.option().z_index() as f32);
    style_props(&mut attrs, shape.style());
    if let Some(opacity) = shape.style().opacity() {
        attrs.set(AttrName::Opacity, opacity);
    }
    attrs
}
