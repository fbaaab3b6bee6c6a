use plotters::style::RGBColor;

// GitHub dark series palette
pub const BLUE: RGBColor = RGBColor(0x58, 0xa6, 0xff);
pub const ORANGE: RGBColor = RGBColor(0xf0, 0x88, 0x3e);
pub const PURPLE: RGBColor = RGBColor(0xa3, 0x71, 0xf7);
pub const GREEN: RGBColor = RGBColor(0x3f, 0xb9, 0x50);
pub const GRAY: RGBColor = RGBColor(0x8b, 0x94, 0x9e);

/// Colors applied to every chart so the rendered set looks uniform.
///
/// A `Theme` is passed explicitly into each chart build; nothing lives in
/// process-wide state, so charts can be rendered in any order or in isolation.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Matting behind the whole figure
    pub background: RGBColor,
    /// Plot panel fill
    pub panel: RGBColor,
    /// Tick labels, axis descriptions, legend text
    pub foreground: RGBColor,
    /// Grid lines, axis edges, legend border
    pub grid: RGBColor,
    /// Title text and subject-series highlight edges
    pub accent: RGBColor,
    /// One fill color per series, in series declaration order
    pub palette: Vec<RGBColor>,
}

impl Theme {
    /// The GitHub dark color scheme used for all published charts.
    pub fn github_dark() -> Self {
        Self {
            background: RGBColor(0x0d, 0x11, 0x17),
            panel: RGBColor(0x16, 0x1b, 0x22),
            foreground: RGBColor(0xc9, 0xd1, 0xd9),
            grid: RGBColor(0x30, 0x36, 0x3d),
            accent: BLUE,
            palette: vec![BLUE, ORANGE, PURPLE, GREEN, GRAY],
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::github_dark()
    }
}
