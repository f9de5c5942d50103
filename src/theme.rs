use ratatui::style::Color;

// Backgrounds
pub const BG_DARK: Color = Color::Rgb(12, 17, 24);
pub const BG_BAR: Color = Color::Rgb(16, 23, 32);
pub const BG_SURFACE: Color = Color::Rgb(22, 31, 43);
pub const BG_HIGHLIGHT: Color = Color::Rgb(29, 48, 66);

// Primary accent (clinical teal)
pub const ACCENT: Color = Color::Rgb(45, 190, 180);
pub const ACCENT_DIM: Color = Color::Rgb(30, 120, 115);

// Text
pub const TEXT: Color = Color::Rgb(222, 228, 234);
pub const TEXT_DIM: Color = Color::Rgb(136, 150, 165);
pub const TEXT_MUTED: Color = Color::Rgb(80, 94, 110);

// Semantic
pub const GREEN: Color = Color::Rgb(52, 211, 153);
pub const BLUE: Color = Color::Rgb(96, 165, 250);
pub const RED: Color = Color::Rgb(248, 113, 113);
pub const YELLOW: Color = Color::Rgb(251, 191, 36);
