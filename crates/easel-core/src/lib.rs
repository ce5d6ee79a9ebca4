//! Easel Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Easel canvas
//! engine. It includes:
//!
//! - **Identifiers**: String-interned shape identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and rotation ([`geometry`] module)
//! - **Attributes**: Typed node attributes and merge semantics ([`attr`] module)
//! - **Shapes**: Logical shapes, their mount lifecycle and composites
//!   ([`shape`] and [`composite`] modules)
//! - **Tree**: Storage for logical shape lists and the remove list ([`tree`] module)

pub mod attr;
pub mod color;
pub mod composite;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod shape;
pub mod tree;
