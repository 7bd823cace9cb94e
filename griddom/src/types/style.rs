use super::Position;

/// Inline style of an element. Only the properties the table layer mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub position: Position,
    pub top: Option<u32>,
    pub bottom: Option<u32>,
    pub left: Option<u32>,
    pub right: Option<u32>,
    pub z_index: Option<i16>,
    pub background_inherit: bool,
    /// Explicit width, overrides the measured content width.
    pub width: Option<u32>,
    pub min_width: Option<u32>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn left(mut self, left: u32) -> Self {
        self.left = Some(left);
        self
    }

    pub fn right(mut self, right: u32) -> Self {
        self.right = Some(right);
        self
    }

    pub fn z_index(mut self, z_index: i16) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn is_sticky(&self) -> bool {
        self.position == Position::Sticky
    }

    /// Reset every positioning property.
    pub fn clear_position(&mut self) {
        self.position = Position::Static;
        self.top = None;
        self.bottom = None;
        self.left = None;
        self.right = None;
        self.z_index = None;
        self.background_inherit = false;
    }

    pub fn clear_width(&mut self) {
        self.width = None;
        self.min_width = None;
    }
}
