use orbtris_engine::{FrameView, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{blend, color, style};

/// Terminal columns per board cell.
const CELL_WIDTH: u16 = 2;

/// Board layers drawn bottom to top: grid, column beam, locked blocks, falling
/// piece, orbs, particles, notifications.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    frame: &'a FrameView,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(frame: &'a FrameView) -> Self {
        Self { frame, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        to_u16(self.frame.cols) * CELL_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        to_u16(self.frame.rows) + super::block_vertical_margin(self.block.as_ref())
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Top-left terminal position of board cell `(x, y)`, if inside `area`.
fn cell_position(area: Rect, x: usize, y: usize) -> Option<Position> {
    let column = area.x.checked_add(u16::try_from(x).ok()?.checked_mul(CELL_WIDTH)?)?;
    let row = area.y.checked_add(u16::try_from(y).ok()?)?;
    let position = Position::new(column, row);
    area.contains(position).then_some(position)
}

/// Terminal position of a point given in cell units.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn point_position(area: Rect, x: f32, y: f32) -> Option<Position> {
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return None;
    }
    let column = (x * f32::from(CELL_WIDTH)).floor() as u16;
    let row = y.floor() as u16;
    let position = Position::new(area.x.checked_add(column)?, area.y.checked_add(row)?);
    area.contains(position).then_some(position)
}

fn fill_cell(buf: &mut Buffer, area: Rect, x: usize, y: usize, style: Style, symbols: [&str; 2]) {
    let Some(position) = cell_position(area, x, y) else {
        return;
    };
    for (dx, symbol) in (0..CELL_WIDTH).zip(symbols) {
        let position = Position::new(position.x.saturating_add(dx), position.y);
        if let Some(cell) = buf.cell_mut(position)
            && area.contains(position)
        {
            cell.set_style(style).set_symbol(symbol);
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let frame = self.frame;

        for y in 0..frame.rows {
            for x in 0..frame.cols {
                let (style, symbols) = match frame.cell(x, y) {
                    Some(rgb) => (Style::new().bg(color(rgb)), [" ", " "]),
                    None => (style::EMPTY_DOT, [".", " "]),
                };
                fill_cell(buf, area, x, y, style, symbols);
            }
        }

        if let Some(column) = &frame.column {
            let beam = blend(column.color.faded(column.width));
            for y in 0..frame.rows {
                if frame.cell(column.x, y).is_none() {
                    fill_cell(buf, area, column.x, y, style::EMPTY_DOT.bg(beam), [".", " "]);
                }
            }
        }

        if let Some(piece) = &frame.piece {
            let style = Style::new().bg(color(piece.color));
            for &(x, y) in &piece.cells {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                    fill_cell(buf, area, x, y, style, [" ", " "]);
                }
            }
        }

        for orb in &frame.orbs {
            let symbol = if orb.radius >= 0.5 { "●" } else { "•" };
            let style = style::EMPTY_DOT
                .fg(blend(orb.color))
                .add_modifier(Modifier::BOLD);
            fill_cell(buf, area, orb.x, orb.y, style, [symbol, " "]);
        }

        for particle in &frame.particles {
            let Some(position) = point_position(area, particle.x, particle.y) else {
                continue;
            };
            if let Some(cell) = buf.cell_mut(position) {
                let symbol = if particle.size >= 0.1 { "*" } else { "·" };
                cell.set_fg(blend(particle.color)).set_symbol(symbol);
            }
        }

        for notification in &frame.notifications {
            let Some(anchor) = point_position(area, notification.x, notification.y) else {
                continue;
            };
            let width = to_u16(notification.text.chars().count());
            let start = anchor.x.saturating_sub(width / 2).max(area.x);
            let max_width = usize::from(area.right().saturating_sub(start));
            let style = Style::new()
                .fg(blend(Rgb::WHITE.with_alpha(notification.alpha)))
                .add_modifier(Modifier::BOLD);
            buf.set_stringn(start, anchor.y, &notification.text, max_width, style);
        }
    }
}
