//! Colors and chat color codes.
//!
//! Chat text carries inline color codes: `&` followed by a hex digit switches
//! the color for the rest of the run, e.g. `"&eTaken screenshot"`.

/// RGBA color, components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Backdrop behind menus and dialogs.
    pub const MENU_BACKDROP: Self = Self::rgba(0.0, 0.0, 0.0, 0.63);
    /// Dialog panel fill.
    pub const DIALOG: Self = Self::rgba(0.25, 0.25, 0.25, 0.9);
    /// Loading bar fill.
    pub const PROGRESS: Self = Self::rgba(0.5, 1.0, 0.5, 1.0);

    /// Creates a color from components.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Packs into an array for vertex upload.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Color for a chat code digit (`0-9`, `a-f`), case-insensitive.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        let index = code.to_digit(16)?;
        // Bit 3 brightens, bits 0..2 select blue, green, red.
        let hi = if index & 8 != 0 { 255 } else { 191 };
        let lo = if index & 8 != 0 { 64 } else { 0 };
        let channel = |bit: u32| if index & bit != 0 { hi } else { lo };
        if index == 7 {
            return Some(Self::rgb8(191, 191, 191));
        }
        if index == 8 {
            return Some(Self::rgb8(64, 64, 64));
        }
        Some(Self::rgb8(channel(4), channel(2), channel(1)))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Splits chat text into runs of uniform color.
///
/// Unknown codes are kept as literal text. Empty runs are skipped.
#[must_use]
pub fn split_color_runs(text: &str, base: Color) -> Vec<(Color, String)> {
    let mut runs = Vec::new();
    let mut color = base;
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(next) = chars.peek().copied().and_then(Color::from_code) {
                chars.next();
                if !current.is_empty() {
                    runs.push((color, std::mem::take(&mut current)));
                }
                color = next;
                continue;
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        runs.push((color, current));
    }
    runs
}

/// Strips color codes, leaving only visible text.
#[must_use]
pub fn strip_color_codes(text: &str) -> String {
    split_color_runs(text, Color::WHITE)
        .into_iter()
        .map(|(_, run)| run)
        .collect()
}
