//! Sticky layout engine.
//!
//! A pass measures the laid out table ([`TableGeometry`]), computes where
//! each pinned cell goes ([`compute_sticky`]) and writes that onto the tree
//! ([`apply_plan`]). Header and footer regions can additionally be pinned as
//! a whole, with body column widths mirrored onto them so they stay aligned.

pub mod apply;
pub mod geometry;
pub mod plan;
pub mod shadow;

pub use apply::{
    apply_plan, clear_mirrored_widths, clear_sticky, mirror_widths, pin_region, unpin_region,
};
pub use geometry::{CellGeometry, RowGeometry, TableGeometry, UtilityKind};
pub use plan::{CellPlacement, StickyColumn, StickyPlan, compute_sticky};
pub use shadow::{Shadows, elevate_edges, is_at_edge, settle_edges};
