use orbtris_engine::normalize_initials;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, Clear, Paragraph, Widget},
};

use super::style;

/// Most characters accepted for initials.
pub const MAX_INITIALS: usize = 3;

/// Modal asking for the initials of a new high score.
#[derive(Debug)]
pub struct InitialsPrompt<'a> {
    score: u32,
    initials: &'a str,
}

impl<'a> InitialsPrompt<'a> {
    pub fn new(score: u32, initials: &'a str) -> Self {
        Self { score, initials }
    }

    pub fn width() -> u16 {
        28
    }

    pub fn height() -> u16 {
        6
    }
}

impl Widget for InitialsPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let shown = normalize_initials(self.initials).replace('-', "_");
        let text = vec![
            Line::styled("NEW HIGH SCORE!", style::HIGHLIGHT).centered(),
            Line::styled(self.score.to_string(), style::DEFAULT).centered(),
            Line::from(vec![
                Span::styled("Initials: ", style::DEFAULT),
                Span::styled(shown, style::TITLE),
            ])
            .centered(),
            Line::styled("Enter to save", style::DIM).centered(),
        ];
        Paragraph::new(text)
            .block(BlockWidget::bordered().title_top(Line::styled(" GAME OVER ", style::TITLE)))
            .style(style::DEFAULT)
            .render(area, buf);
    }
}
