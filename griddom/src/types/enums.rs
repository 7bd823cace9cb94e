/// Requested width of a cell or table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Size {
    Fixed(u32),
    #[default]
    Auto,
    /// Percentage of the viewport width.
    Percent(f32),
}

impl Size {
    /// Parse a column width string such as `"120"`, `"120px"` or `"25%"`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(percent) = value.strip_suffix('%') {
            return percent.trim().parse::<f32>().ok().map(Size::Percent);
        }
        let value = value.strip_suffix("px").unwrap_or(value);
        value.trim().parse::<u32>().ok().map(Size::Fixed)
    }

    pub fn resolve(self, available: u32) -> Option<u32> {
        match self {
            Size::Fixed(px) => Some(px),
            Size::Percent(p) => Some((available as f32 * p / 100.0).round() as u32),
            Size::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Sticky,
}

/// Element kind, mirroring the table markup the widget renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    Table,
    Head,
    Body,
    Foot,
    Row,
    HeaderCell,
    #[default]
    Cell,
}

impl Tag {
    pub fn is_cell(self) -> bool {
        matches!(self, Tag::HeaderCell | Tag::Cell)
    }

    pub fn section(self) -> Option<Section> {
        match self {
            Tag::Head => Some(Section::Head),
            Tag::Body => Some(Section::Body),
            Tag::Foot => Some(Section::Foot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Head,
    Body,
    Foot,
}

impl Section {
    pub fn tag(self) -> Tag {
        match self {
            Section::Head => Tag::Head,
            Section::Body => Tag::Body,
            Section::Foot => Tag::Foot,
        }
    }
}
