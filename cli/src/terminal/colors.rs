use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 210, g: 210, b: 210 };

pub const SUCCESS: Color = Color::BrightGreen;
pub const TIMEOUT: Color = Color::Yellow;
pub const FAILED: Color = Color::Red;
