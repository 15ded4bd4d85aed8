use std::time::Duration;

use orbtris_engine::{GameSession, MAX_ORBS, Orb, OrbColor, OrbEffect, SpeedEffect};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget},
};

use super::{color, style};

const INNER_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 8;

/// Score panel followed by the live orb state: the running speed effect with
/// its countdown, the column beam, and each orb on the board with its effect.
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(INNER_WIDTH).unwrap_or(u16::MAX)
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.lines().len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let session = self.session;
        let stats = session.stats();
        let [_, _, doubles, triples, quads] = *stats.row_cleared_counter();
        let mut lines = vec![
            entry("SCORE", stats.score().to_string(), style::HIGHLIGHT),
            entry("LEVEL", stats.level().to_string(), style::DEFAULT),
            entry("LINES", stats.total_cleared_rows().to_string(), style::DEFAULT),
            entry("MULTI", format!("{doubles}/{triples}/{quads}"), style::DEFAULT),
            entry("TIME", format_time(session.duration()), style::DEFAULT),
            entry(
                "GRAVITY",
                format!("{}ms", session.drop_interval().as_millis()),
                style::DEFAULT,
            ),
            Line::default(),
            speed_line(session.speed_effect()),
            column_line(session),
            Line::default(),
            Line::styled(format!("ORBS {}/{MAX_ORBS}", session.orbs().len()), style::TITLE),
        ];
        let orbs = session.orbs().orbs();
        lines.extend((0..MAX_ORBS).map(|i| orbs.get(i).map(orb_line).unwrap_or_default()));
        lines
    }
}

fn entry(label: &str, value: String, value_style: Style) -> Line<'static> {
    let value_width = INNER_WIDTH - LABEL_WIDTH;
    Line::from(vec![
        Span::styled(format!("{label:<LABEL_WIDTH$}"), style::DIM),
        Span::styled(format!("{value:>value_width$}"), value_style),
    ])
}

fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}:{:0>2}.{:0>2}",
        secs / 60,
        secs % 60,
        duration.subsec_millis() / 10
    )
}

fn speed_line(speed: Option<SpeedEffect>) -> Line<'static> {
    let Some(SpeedEffect { effect, remaining }) = speed else {
        return entry("SPEED", "normal".to_owned(), style::DIM);
    };
    let (name, orb) = match effect {
        OrbEffect::Fast => ("FAST", OrbColor::Red),
        _ => ("SLOW", OrbColor::Blue),
    };
    let value = format!("{name} {:.1}s", remaining.as_secs_f32());
    entry("SPEED", value, Style::new().fg(color(orb.rgb())))
}

fn column_line(session: &GameSession) -> Line<'static> {
    match session.column_effect() {
        Some(column) => entry(
            "BEAM",
            format!("column {}", column.x()),
            Style::new().fg(color(OrbColor::Purple.rgb())),
        ),
        None => entry("BEAM", "-".to_owned(), style::DIM),
    }
}

fn orb_line(orb: &Orb) -> Line<'static> {
    let (x, y) = orb.position();
    let effect = match orb.color().effect() {
        OrbEffect::Slow => "slow",
        OrbEffect::Fast => "fast",
        OrbEffect::Points => "+100",
        OrbEffect::Destroy => "destroy",
        OrbEffect::Column => "column",
    };
    let dot_style = if orb.color().is_black() {
        style::DIM
    } else {
        Style::new().fg(color(orb.color().rgb()))
    };
    Line::from(vec![
        Span::styled(" ● ", dot_style),
        Span::styled(format!("{effect:<8}"), style::DEFAULT),
        Span::styled(format!("({x},{y})"), style::DIM),
    ])
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Paragraph::new(self.lines())
            .style(style::DEFAULT)
            .render(area, buf);
    }
}
