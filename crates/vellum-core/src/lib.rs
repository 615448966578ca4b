//! Vellum Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Vellum
//! diagram-to-slide engine. It includes:
//!
//! - **Identifiers**: Efficient string-interned node identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with draw.io color syntax support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and affine transforms ([`geometry`] module)
//! - **Style**: The typed style attribute schema ([`style`] module)
//! - **Draw**: Shape outlines, strokes, fills, markers and text ([`draw`] module)
//! - **Document**: The input document tree and its typed nodes ([`document`] module)

pub mod color;
pub mod document;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod style;
