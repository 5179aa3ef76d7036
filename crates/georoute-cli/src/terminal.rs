//! Terminal styling and color utilities.
//!
//! ANSI escape codes plus detection that honours `NO_COLOR` and `TERM=dumb`.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Gray for secondary elements.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for the forward side of a search.
    pub const CYAN: &str = "\x1b[36m";
    /// Magenta for the backward side of a search.
    pub const MAGENTA: &str = "\x1b[35m";
    /// Green for distances.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for the node being expanded.
    pub const ORANGE: &str = "\x1b[38;5;208m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub gray: &'static str,
    pub forward: &'static str,
    pub backward: &'static str,
    pub distance: &'static str,
    pub current: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            gray: colors::GRAY,
            forward: colors::CYAN,
            backward: colors::MAGENTA,
            distance: colors::GREEN,
            current: colors::ORANGE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            gray: "",
            forward: "",
            backward: "",
            distance: "",
            current: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, `plain()` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether color output should be used.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
