use orbtris_engine::{GameSession, SessionState};
use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::style;

/// A key group and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    keys: &'static [&'static str],
    action: &'static str,
    /// Steers the falling piece, so it is ignored while an animation runs.
    piece_control: bool,
}

const fn hint(keys: &'static [&'static str], action: &'static str) -> KeyHint {
    KeyHint {
        keys,
        action,
        piece_control: false,
    }
}

const fn control(keys: &'static [&'static str], action: &'static str) -> KeyHint {
    KeyHint {
        keys,
        action,
        piece_control: true,
    }
}

const PLAYING_HINTS: &[KeyHint] = &[
    control(&["←", "→"], "Move"),
    control(&["↑"], "Rotate"),
    control(&["↓"], "Drop"),
    hint(&["R"], "Restart"),
    hint(&["Q"], "Quit"),
];
const GAME_OVER_HINTS: &[KeyHint] = &[hint(&["any key"], "Restart"), hint(&["Q"], "Quit")];
const INITIALS_HINTS: &[KeyHint] = &[
    hint(&["A-Z", "0-9"], "Type"),
    hint(&["Backspace"], "Erase"),
    hint(&["Enter"], "Save"),
    hint(&["Esc"], "Quit"),
];

/// What the session is doing, as shown at the start of the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Dropping,
    ColumnBlast,
    GameOver,
    NewHighScore,
}

impl Status {
    pub fn of(session: &GameSession) -> Self {
        match session.session_state() {
            SessionState::GameOver => Self::GameOver,
            SessionState::EnteringInitials => Self::NewHighScore,
            SessionState::Playing if !session.is_animating() => Self::Playing,
            // the piece is gone for the whole column sequence
            SessionState::Playing
                if session.column_effect().is_some() || session.falling_piece().is_none() =>
            {
                Self::ColumnBlast
            }
            SessionState::Playing => Self::Dropping,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Status::Playing => "PLAYING",
            Status::Dropping => "DROPPING",
            Status::ColumnBlast => "COLUMN BLAST",
            Status::GameOver => "GAME OVER",
            Status::NewHighScore => "NEW HIGH SCORE",
        }
    }

    fn tag_style(self) -> Style {
        let bg = match self {
            Status::Playing => Color::Green,
            Status::Dropping => Color::Cyan,
            Status::ColumnBlast => Color::Magenta,
            Status::GameOver => Color::Red,
            Status::NewHighScore => Color::Yellow,
        };
        Style::new()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hints(self) -> &'static [KeyHint] {
        match self {
            Status::Playing | Status::Dropping | Status::ColumnBlast => PLAYING_HINTS,
            Status::GameOver => GAME_OVER_HINTS,
            Status::NewHighScore => INITIALS_HINTS,
        }
    }

    fn holds_input(self) -> bool {
        matches!(self, Status::Dropping | Status::ColumnBlast)
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Bottom line of the play screen: a status tag followed by the keys that
/// work right now. Piece controls are dimmed while input is held.
#[derive(Debug)]
pub struct StatusBar {
    status: Status,
}

impl StatusBar {
    pub fn new(session: &GameSession) -> Self {
        Self {
            status: Status::of(session),
        }
    }

    fn line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.status.label()), self.status.tag_style()),
            Span::raw("  "),
        ];
        for (i, hint) in self.status.hints().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", SEPARATOR_STYLE));
            }
            let held = hint.piece_control && self.status.holds_input();
            let (key_style, action_style) = if held {
                (style::DIM, style::DIM)
            } else {
                (KEY_STYLE, style::DEFAULT)
            };
            let keys = hint.keys.join("/");
            spans.push(Span::styled(keys, key_style));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(hint.action, action_style));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().centered().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use orbtris_engine::{GameSeed, Piece, PieceKind, SessionConfig};

    use super::*;

    fn session() -> GameSession {
        let config = SessionConfig {
            orb_spawn_chance: 0.0,
            seed: Some(GameSeed::from_bytes([6; 16])),
            ..SessionConfig::default()
        };
        GameSession::new(config).unwrap()
    }

    #[test]
    fn test_playing_line() {
        let bar = StatusBar::new(&session());
        assert_eq!(bar.status, Status::Playing);
        assert_eq!(
            bar.line().to_string(),
            " PLAYING   ←/→ Move | ↑ Rotate | ↓ Drop | R Restart | Q Quit"
        );
    }

    #[test]
    fn test_piece_controls_dim_while_dropping() {
        let mut session = session();
        session
            .set_falling_piece(Piece::new(PieceKind::T))
            .unwrap();
        session.hard_drop().unwrap();
        let bar = StatusBar::new(&session);
        assert_eq!(bar.status, Status::Dropping);

        let line = bar.line();
        let span = |text: &str| {
            line.spans
                .iter()
                .find(|span| span.content == text)
                .map(|span| span.style)
        };
        assert_eq!(span("Move"), Some(style::DIM));
        assert_eq!(span("Quit"), Some(style::DEFAULT));
        assert_eq!(span("Q"), Some(KEY_STYLE));
    }

    #[test]
    fn test_hints_follow_state() {
        assert_eq!(Status::GameOver.hints(), GAME_OVER_HINTS);
        assert_eq!(Status::NewHighScore.hints(), INITIALS_HINTS);
        assert_eq!(Status::ColumnBlast.hints(), PLAYING_HINTS);
        assert!(Status::ColumnBlast.holds_input());
        assert!(!Status::Playing.holds_input());
    }
}
