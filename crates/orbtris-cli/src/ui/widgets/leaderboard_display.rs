use orbtris_engine::Leaderboard;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;

/// Ranked high scores, optionally highlighting one position.
#[derive(Debug)]
pub struct LeaderboardDisplay<'a> {
    leaderboard: &'a Leaderboard,
    highlight: Option<usize>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> LeaderboardDisplay<'a> {
    pub fn new(leaderboard: &'a Leaderboard) -> Self {
        Self {
            leaderboard,
            highlight: None,
            block: None,
        }
    }

    pub fn highlight(self, position: Option<usize>) -> Self {
        Self {
            highlight: position,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.leaderboard.entries().len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        self.leaderboard
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if self.highlight == Some(i) {
                    style::HIGHLIGHT
                } else {
                    style::DEFAULT
                };
                Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), style::DIM),
                    Span::styled(format!("{:<4}", entry.initials), style),
                    Span::styled(format!("{:>10}", entry.score), style),
                ])
            })
    }
}

impl Widget for LeaderboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        for (line, y) in self.lines().zip(area.top()..area.bottom()) {
            line.render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}
