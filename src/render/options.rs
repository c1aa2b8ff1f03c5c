//! Page layout options.

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.28;

/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(points: f32) -> Self {
        Self {
            top: points,
            right: points,
            bottom: points,
            left: points,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 72.0,
            right: 72.0,
            bottom: 18.0,
            left: 72.0,
        }
    }
}

/// Geometry and typography of a rendered record.
///
/// The defaults give an A4 page with a centered 16 pt title and a
/// 2.5 in / 4 in field table in 10 pt Helvetica.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,

    /// Page margins
    pub margins: Margins,

    /// Width of the field-name column
    pub name_column_width: f32,

    /// Width of the field-value column
    pub value_column_width: f32,

    /// Title font size
    pub title_font_size: f32,

    /// Baseline-to-baseline distance of the title
    pub title_leading: f32,

    /// Space between the title and the table
    pub title_space_after: f32,

    /// Table font size
    pub font_size: f32,

    /// Baseline-to-baseline distance inside table cells
    pub leading: f32,

    /// Left and right cell padding
    pub cell_padding_x: f32,

    /// Top cell padding
    pub cell_padding_top: f32,

    /// Bottom cell padding
    pub cell_padding_bottom: f32,

    /// Grid line width
    pub grid_width: f32,

    /// Gray level (0 = black, 1 = white) of the field-name column
    pub name_shade: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margins: Margins::default(),
            name_column_width: 2.5 * POINTS_PER_INCH,
            value_column_width: 4.0 * POINTS_PER_INCH,
            title_font_size: 16.0,
            title_leading: 22.0,
            title_space_after: 42.0,
            font_size: 10.0,
            leading: 12.0,
            cell_padding_x: 6.0,
            cell_padding_top: 3.0,
            cell_padding_bottom: 12.0,
            grid_width: 1.0,
            // lightgrey, #D3D3D3
            name_shade: 0.827,
        }
    }
}

impl LayoutOptions {
    /// Create default layout options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in points.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the two column widths in points.
    pub fn with_column_widths(mut self, name: f32, value: f32) -> Self {
        self.name_column_width = name;
        self.value_column_width = value;
        self
    }

    /// Set the table font size; leading follows at 1.2x.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self.leading = size * 1.2;
        self
    }

    /// Total table width.
    pub fn table_width(&self) -> f32 {
        self.name_column_width + self.value_column_width
    }

    /// Left edge of the horizontally centered table.
    pub fn table_left(&self) -> f32 {
        (self.page_width - self.table_width()) / 2.0
    }

    /// Top of the writable area (page height minus top margin).
    pub fn content_top(&self) -> f32 {
        self.page_height - self.margins.top
    }

    /// Vertical space available between the margins.
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margins.top - self.margins.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let opts = LayoutOptions::default();
        assert_eq!(opts.name_column_width, 180.0);
        assert_eq!(opts.value_column_width, 288.0);
        assert_eq!(opts.table_width(), 468.0);
        assert!((opts.table_left() - 63.64).abs() < 0.01);
        assert!((opts.content_height() - 751.89).abs() < 0.01);
    }

    #[test]
    fn test_column_ratio() {
        let opts = LayoutOptions::default();
        let ratio = opts.name_column_width / opts.value_column_width;
        assert!((ratio - 5.0 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = LayoutOptions::new()
            .with_page_size(612.0, 792.0)
            .with_margins(Margins::uniform(36.0))
            .with_font_size(12.0);

        assert_eq!(opts.page_width, 612.0);
        assert_eq!(opts.margins.bottom, 36.0);
        assert!((opts.leading - 14.4).abs() < 1e-4);
    }
}
