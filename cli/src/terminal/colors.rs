use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::Yellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::Cyan;
pub const MAC_ADDR: Color = Color::Magenta;
pub const SERVICE: Color = Color::BrightBlue;
pub const DISABLED: Color = Color::BrightBlack;
