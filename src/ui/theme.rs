use ratatui::style::Color;

/// Colors used across the browser.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub bg_dark: Color,
    pub bar: Color,

    // Foregrounds
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    /// Adding tags, and working tags present on the image
    pub add: Color,
    /// Removing tags
    pub remove: Color,
    pub accent: Color,

    // Status
    pub info: Color,
    pub warning: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Theme {
    /// Dark palette with the muted gray bars.
    pub fn dark() -> Self {
        Self {
            // Transparent background (inherit from terminal)
            bg_dark: Color::Reset,
            bar: Color::Rgb(70, 67, 66), // #464342

            fg_primary: Color::Rgb(255, 255, 255),
            fg_secondary: Color::Rgb(210, 210, 210),
            fg_muted: Color::Rgb(143, 143, 143), // #8f8f8f

            add: Color::Rgb(199, 242, 155),    // #c7f29b
            remove: Color::Rgb(242, 155, 175), // #f29baf
            accent: Color::Rgb(155, 205, 242),

            info: Color::Rgb(155, 205, 242),
            warning: Color::Rgb(255, 215, 95),

            border: Color::Rgb(70, 67, 66),
            border_focused: Color::Rgb(143, 143, 143),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
