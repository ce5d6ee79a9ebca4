//! Composite shapes built from labelled sub-shapes.
//!
//! A [`Composite`] owns an ordered set of [`SubShapeBinding`]s keyed by label.
//! Each binding names the shape type of its sub-shape, an optional `init`
//! function deriving the sub-shape's style/option from the parent, and an
//! optional `draw` function positioning the sub-shape. The geometry pass
//! itself lives on [`Shape::update_sub_shapes`].

use std::{fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{
    error::ShapeError,
    identifier::Id,
    shape::{Shape, ShapeConfig, ShapeOption, Style},
};

/// Positions a sub-shape given its parent. The sub-shape's position is set
/// in canvas coordinates; it is made relative to the parent afterwards.
///
/// The bindings are detached from the parent while the geometry pass runs,
/// so `parent.composite()` yields no sub-shapes here. A draw function that
/// needs a sibling's geometry has to derive it from the parent.
pub type DrawFn = Rc<dyn Fn(&Shape, &mut Shape)>;

/// Derives sub-shape inputs from the parent's option and style.
pub type InitFn = Rc<dyn Fn(&ShapeOption, &Style) -> ShapeConfig>;

/// Partial description of a sub-shape binding.
///
/// Used both to declare a new binding and to update an existing one: only
/// the fields that are set overwrite the binding.
#[derive(Clone, Default)]
pub struct SubShapeConfig {
    shape_name: Option<String>,
    init: Option<InitFn>,
    draw: Option<DrawFn>,
}

impl SubShapeConfig {
    /// Starts a config for a sub-shape of the given type.
    pub fn new(shape_name: impl Into<String>) -> Self {
        Self {
            shape_name: Some(shape_name.into()),
            ..Self::default()
        }
    }

    pub fn with_init(mut self, init: impl Fn(&ShapeOption, &Style) -> ShapeConfig + 'static) -> Self {
        self.init = Some(Rc::new(init));
        self
    }

    pub fn with_draw(mut self, draw: impl Fn(&Shape, &mut Shape) + 'static) -> Self {
        self.draw = Some(Rc::new(draw));
        self
    }
}

impl fmt::Debug for SubShapeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubShapeConfig")
            .field("shape_name", &self.shape_name)
            .field("init", &self.init.is_some())
            .field("draw", &self.draw.is_some())
            .finish()
    }
}

/// A labelled sub-shape of a composite.
pub struct SubShapeBinding {
    label: String,
    shape: Option<Shape>,
    shape_name: String,
    init: Option<InitFn>,
    draw: Option<DrawFn>,
}

impl SubShapeBinding {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape_name(&self) -> &str {
        &self.shape_name
    }

    /// The sub-shape, once created.
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    pub fn shape_mut(&mut self) -> Option<&mut Shape> {
        self.shape.as_mut()
    }

    fn apply(&mut self, config: SubShapeConfig) {
        if let Some(shape_name) = config.shape_name {
            self.shape_name = shape_name;
        }
        if config.init.is_some() {
            self.init = config.init;
        }
        if config.draw.is_some() {
            self.draw = config.draw;
        }
    }

    /// Runs the per-binding part of the geometry pass against `parent`.
    pub(crate) fn update_from(&mut self, parent: &Shape) {
        let Some(shape) = self.shape.as_mut() else {
            return;
        };

        shape.apply_config(ShapeConfig::style(parent.style().clone()));
        if let Some(init) = &self.init {
            shape.apply_config(init(parent.option(), parent.style()));
        }
        match &self.draw {
            Some(draw) => draw(parent, shape),
            // Undrawn sub-shapes sit on the parent's origin.
            None => shape.set_position(parent.position()),
        }

        shape.set_position(shape.position().sub_point(parent.position()));
        shape.set_dirty(parent.is_dirty());
        shape.set_element(parent.element());
    }
}

impl fmt::Debug for SubShapeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubShapeBinding")
            .field("label", &self.label)
            .field("shape_name", &self.shape_name)
            .field("shape", &self.shape)
            .field("init", &self.init.is_some())
            .field("draw", &self.draw.is_some())
            .finish()
    }
}

/// Ordered collection of sub-shape bindings.
#[derive(Debug, Default)]
pub struct Composite {
    bindings: IndexMap<String, SubShapeBinding>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds new bindings or shallow-merges into existing ones by label.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::IncompleteBinding`] when a new label has no
    /// shape type. Bindings before the failing one are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::composite::{Composite, SubShapeConfig};
    ///
    /// let mut composite = Composite::new();
    /// composite
    ///     .add_sub_shape([("body", SubShapeConfig::new("rect"))])
    ///     .unwrap();
    /// // Switching the type keeps the rest of the binding.
    /// composite
    ///     .add_sub_shape([("body", SubShapeConfig::new("circle"))])
    ///     .unwrap();
    /// assert_eq!(composite.binding("body").unwrap().shape_name(), "circle");
    /// ```
    pub fn add_sub_shape<L, I>(&mut self, configs: I) -> Result<(), ShapeError>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, SubShapeConfig)>,
    {
        for (label, config) in configs {
            let label = label.into();
            if let Some(binding) = self.bindings.get_mut(&label) {
                binding.apply(config);
                continue;
            }

            let Some(shape_name) = config.shape_name else {
                return Err(ShapeError::IncompleteBinding { label });
            };
            self.bindings.insert(
                label.clone(),
                SubShapeBinding {
                    label,
                    shape: None,
                    shape_name,
                    init: config.init,
                    draw: config.draw,
                },
            );
        }
        Ok(())
    }

    /// Creates the sub-shape of every binding that does not have one yet.
    ///
    /// Sub-shape ids are nested under `parent` (`parent::label`).
    pub fn create_sub_shapes(&mut self, parent: Id) -> Result<(), ShapeError> {
        for binding in self.bindings.values_mut() {
            if binding.shape.is_none() {
                let id = parent.create_nested(&binding.label);
                binding.shape = Some(Shape::from_type(id, &binding.shape_name)?);
            }
        }
        Ok(())
    }

    pub fn binding(&self, label: &str) -> Option<&SubShapeBinding> {
        self.bindings.get(label)
    }

    /// Returns the sub-shape bound under `label`.
    ///
    /// `None` if the label was never bound or its shape is not created yet.
    pub fn sub_shape(&self, label: &str) -> Option<&Shape> {
        self.bindings.get(label).and_then(SubShapeBinding::shape)
    }

    pub fn sub_shape_mut(&mut self, label: &str) -> Option<&mut Shape> {
        self.bindings.get_mut(label).and_then(SubShapeBinding::shape_mut)
    }

    /// Created sub-shapes in label-insertion order.
    pub fn sub_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.bindings.values().filter_map(SubShapeBinding::shape)
    }

    pub fn sub_shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.bindings.values_mut().filter_map(SubShapeBinding::shape_mut)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn take_bindings(&mut self) -> IndexMap<String, SubShapeBinding> {
        std::mem::take(&mut self.bindings)
    }

    pub(crate) fn restore_bindings(&mut self, bindings: IndexMap<String, SubShapeBinding>) {
        self.bindings = bindings;
    }
}
