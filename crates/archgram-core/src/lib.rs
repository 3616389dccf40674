//! Archgram Core Types and Definitions
//!
//! This crate provides the foundational types for declaring and drawing
//! cloud architecture diagrams. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Visual definitions for diagram elements ([`draw`] module)
//! - **Topology**: The declarative node / cluster / edge model ([`topology`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod topology;
