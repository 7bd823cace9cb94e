//! Row processing stages: filter, search, sort, paginate

pub mod filter;
pub mod page;
pub mod search;
pub mod sort;

pub use filter::{ColumnFilter, FilterRegistry, FilterState, FilterType};
pub use page::{RecordRange, paginate, reclamp_page, record_range, total_pages};
pub use search::{SearchScope, search_rows};
pub use sort::{Order, Sort, SortEntry, sort_rows};
