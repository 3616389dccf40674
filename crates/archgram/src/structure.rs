//! Graph structures built from a topology before layout.
//!
//! The layout engines never look at the cluster tree directly. They work on
//! a [`ScopeGraph`]: one small graph per containment scope, with each edge
//! lifted to the scope where both of its endpoints are visible.

mod graph_base;
mod scope;

pub use scope::{ContainmentScope, ScopeGraph};
