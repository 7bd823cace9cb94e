mod enums;
mod style;

pub use enums::{Position, Section, Size, Tag};
pub use style::Style;
