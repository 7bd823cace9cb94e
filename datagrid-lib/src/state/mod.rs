//! Row selection and expansion state
//!
//! Both sets are keyed by [`RowId`](crate::RowId) and are independent of the
//! filter/sort/paginate pipeline. Either may be controlled by the host, in
//! which case mutations only describe the requested change.

mod expansion;
mod selection;

pub use expansion::*;
pub use selection::*;
