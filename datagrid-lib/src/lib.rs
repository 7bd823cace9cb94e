//! Table data pipeline
//!
//! Client- and server-mode filtering, search, sorting, pagination, selection
//! and expansion over dynamic rows. [`DataTable`] wires the stages together.

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod options;
pub mod query;
pub mod state;

mod table;

pub use config::TableConfig;
pub use error::DatagridError;
pub use event::{TableEvent, ServerOptions};
pub use model::{Column, Row, RowId, RowKey, Value};
pub use table::*;
