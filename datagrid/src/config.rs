//! Sticky layout configuration.

/// Stacking order of pinned cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZLayers {
    /// Pinned body and footer cells.
    ///
    /// Default: 3
    pub body: i16,
    /// Pinned header cells.
    ///
    /// Default: 4
    pub header: i16,
    /// A sticky header or footer region as a whole. Raised above every
    /// elevated cell when configured lower, see [`ZLayers::region_layer`].
    ///
    /// Default: 7
    pub region: i16,
    /// Added to a pinned cell while it sits on the viewport edge during a
    /// scroll.
    ///
    /// Default: 2
    pub elevation: i16,
}

impl Default for ZLayers {
    fn default() -> Self {
        Self {
            body: 3,
            header: 4,
            region: 7,
            elevation: 2,
        }
    }
}

impl ZLayers {
    /// Layer of a pinned header or footer region, strictly above any pinned
    /// cell including elevated ones.
    pub fn region_layer(&self) -> i16 {
        let top_cell = self.body.max(self.header) + self.elevation;
        self.region.max(top_cell + 1)
    }
}

/// Sticky header, footer and column behaviour of a grid.
///
/// # Example
///
/// ```
/// use datagrid::StickyConfig;
///
/// let config = StickyConfig::default().with_sticky_header(true);
/// assert!(config.show_shadows);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyConfig {
    /// Pin the header region to the top of the scroll container and mirror
    /// body column widths onto it.
    ///
    /// Default: `false`
    pub sticky_header: bool,
    /// Pin the footer region to the bottom, mirroring widths likewise.
    ///
    /// Default: `false`
    pub sticky_footer: bool,
    /// Track the scroll boundary shadows.
    ///
    /// Default: `true`
    pub show_shadows: bool,
    pub z: ZLayers,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            sticky_header: false,
            sticky_footer: false,
            show_shadows: true,
            z: ZLayers::default(),
        }
    }
}

impl StickyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sticky_header(mut self, enabled: bool) -> Self {
        self.sticky_header = enabled;
        self
    }

    pub fn with_sticky_footer(mut self, enabled: bool) -> Self {
        self.sticky_footer = enabled;
        self
    }

    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.show_shadows = enabled;
        self
    }

    pub fn with_z_layers(mut self, z: ZLayers) -> Self {
        self.z = z;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_above_elevated_cells() {
        let z = ZLayers::default();
        assert_eq!(z.region_layer(), 7);
        assert!(z.region_layer() > z.body + z.elevation);
        assert!(z.region_layer() > z.header + z.elevation);

        let low = ZLayers {
            region: 2,
            ..ZLayers::default()
        };
        assert_eq!(low.region_layer(), 7);
    }
}
