use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Apple body color
    pub apple: Color,
    /// Digit color on a live apple
    pub apple_text: Color,
    /// Cleared cell marker color
    pub cleared: Color,
    /// Drag selection background
    pub selection_bg: Color,
    /// Score text color
    pub score: Color,
    /// Timer text color
    pub timer: Color,
    /// Timer color in the final seconds
    pub timer_low: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            apple: Color::Rgb { r: 255, g: 45, b: 85 },
            apple_text: Color::Rgb { r: 255, g: 255, b: 255 },
            cleared: Color::Rgb { r: 60, g: 65, b: 80 },
            selection_bg: Color::Rgb { r: 55, g: 90, b: 140 },
            score: Color::Rgb { r: 90, g: 255, b: 130 },
            timer: Color::Rgb { r: 160, g: 165, b: 185 },
            timer_low: Color::Rgb { r: 255, g: 90, b: 90 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            apple: Color::Rgb { r: 220, g: 40, b: 70 },
            apple_text: Color::Rgb { r: 255, g: 255, b: 255 },
            cleared: Color::Rgb { r: 210, g: 212, b: 222 },
            selection_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            score: Color::Rgb { r: 40, g: 160, b: 60 },
            timer: Color::Rgb { r: 90, g: 90, b: 110 },
            timer_low: Color::Rgb { r: 220, g: 50, b: 50 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            apple: Color::Red,
            apple_text: Color::White,
            cleared: Color::DarkGrey,
            selection_bg: Color::Blue,
            score: Color::Green,
            timer: Color::Grey,
            timer_low: Color::Red,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }
}
