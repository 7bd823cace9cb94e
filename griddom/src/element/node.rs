use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;
use crate::types::{Size, Style, Tag};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Data attribute naming the leaf column a cell renders.
pub const FIELD_ATTR: &str = "field";

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: Tag,

    // Content
    pub content: Content,

    // Sizing
    pub width: Size,
    pub min_width: Option<u32>,
    pub colspan: u16,

    // Presentation hooks
    pub classes: BTreeSet<String>,
    pub style: Style,

    // Custom data storage (data-* attributes)
    pub data: HashMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            tag: Tag::Cell,
            content: Content::None,
            width: Size::Auto,
            min_width: None,
            colspan: 1,
            classes: BTreeSet::new(),
            style: Style::default(),
            data: HashMap::new(),
        }
    }
}

impl Element {
    fn tagged(tag: Tag, prefix: &str) -> Self {
        Self {
            id: generate_id(prefix),
            tag,
            ..Default::default()
        }
    }

    pub fn table() -> Self {
        Self::tagged(Tag::Table, "table")
    }

    pub fn thead() -> Self {
        Self::tagged(Tag::Head, "thead")
    }

    pub fn tbody() -> Self {
        Self::tagged(Tag::Body, "tbody")
    }

    pub fn tfoot() -> Self {
        Self::tagged(Tag::Foot, "tfoot")
    }

    pub fn tr() -> Self {
        Self::tagged(Tag::Row, "tr")
    }

    pub fn th(text: impl Into<String>) -> Self {
        Self {
            content: Content::Text(text.into()),
            ..Self::tagged(Tag::HeaderCell, "th")
        }
    }

    pub fn td(text: impl Into<String>) -> Self {
        Self {
            content: Content::Text(text.into()),
            ..Self::tagged(Tag::Cell, "td")
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn width(mut self, width: Size) -> Self {
        self.width = width;
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn colspan(mut self, colspan: u16) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    // Classes
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    // Custom data
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    /// Shorthand for `data-field`.
    pub fn field(self, field: impl Into<String>) -> Self {
        self.data(FIELD_ATTR, field)
    }

    pub fn get_field(&self) -> Option<&str> {
        self.data.get(FIELD_ATTR).map(String::as_str)
    }

    pub fn text(&self) -> &str {
        self.content.text().unwrap_or_default()
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }

    pub fn child_elements(&self) -> &[Element] {
        self.content.children()
    }

    pub fn child_elements_mut(&mut self) -> &mut [Element] {
        match &mut self.content {
            Content::Children(children) => children,
            _ => &mut [],
        }
    }
}
