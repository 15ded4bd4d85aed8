use orbtris_engine::{Rgb, Rgba};
use ratatui::{
    layout::Rect,
    style::Color,
    widgets::Block as BlockWidget,
};

pub use self::{
    board_display::*, initials_prompt::*, leaderboard_display::*, stats_display::*,
    status_bar::*,
};

mod board_display;
mod initials_prompt;
mod leaderboard_display;
mod stats_display;
mod status_bar;

/// Terminal color of an opaque engine color.
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Terminal color of a translucent engine color drawn over the black board.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend(rgba: Rgba) -> Color {
    let alpha = rgba.alpha.clamp(0.0, 1.0);
    let scale = |c: u8| (f32::from(c) * alpha).round() as u8;
    Color::Rgb(scale(rgba.rgb.r), scale(rgba.rgb.g), scale(rgba.rgb.b))
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    pub const DEFAULT: Style = Style::new().fg(Color::White).bg(Color::Black);
    pub const EMPTY_DOT: Style = Style::new().fg(Color::DarkGray).bg(Color::Black);
    pub const TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    pub const HIGHLIGHT: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    pub const DIM: Style = Style::new().fg(Color::DarkGray);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_scales_by_alpha() {
        assert_eq!(blend(Rgb::WHITE.with_alpha(1.0)), Color::Rgb(255, 255, 255));
        assert_eq!(blend(Rgb::WHITE.with_alpha(0.5)), Color::Rgb(128, 128, 128));
        assert_eq!(blend(Rgb::RED.with_alpha(0.0)), Color::Rgb(0, 0, 0));
    }
}
