//! Data model: values, rows, row identity and columns

mod column;
mod row;
mod row_key;
mod value;

pub use column::*;
pub use row::*;
pub use row_key::*;
pub use value::*;
