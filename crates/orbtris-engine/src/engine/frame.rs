use crate::core::{Rgb, Rgba};

use super::{
    game_session::{GameSession, SessionState},
    particles::CELL_PX,
};

/// Everything a renderer needs to draw one frame.
///
/// Positions are in cell units with the origin at the top-left corner of the
/// board; `(x + 0.5, y + 0.5)` is the center of cell `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub rows: usize,
    pub cols: usize,
    /// Locked cells, row-major, `None` where empty.
    pub cells: Vec<Option<Rgb>>,
    pub piece: Option<PieceView>,
    pub orbs: Vec<OrbView>,
    /// Burst particles followed by the column trail.
    pub particles: Vec<ParticleView>,
    pub column: Option<ColumnView>,
    pub notifications: Vec<NotificationView>,
    pub score: u32,
    pub level: u32,
    pub state: SessionState,
    pub animating: bool,
}

impl FrameView {
    /// Color of the locked cell at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.cols {
            return None;
        }
        self.cells.get(y * self.cols + x).copied().flatten()
    }
}

/// The falling piece. Cells above the board are included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceView {
    pub cells: Vec<(i32, i32)>,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbView {
    pub x: usize,
    pub y: usize,
    pub color: Rgba,
    /// Radius in cells.
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnView {
    pub x: usize,
    /// Beam width in cells, centered on the column.
    pub width: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationView {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub alpha: f32,
}

impl GameSession {
    /// Takes a render snapshot of the current state.
    #[must_use]
    pub fn frame(&self) -> FrameView {
        let board = self.board();
        let cells = board
            .block_rows()
            .flat_map(|row| row.iter().map(|block| block.color()))
            .collect();

        let piece = self.falling_piece().map(|piece| PieceView {
            cells: piece.cells().collect(),
            color: piece.color(),
        });

        let orbs = self
            .orbs()
            .orbs()
            .iter()
            .map(|orb| {
                let (x, y) = orb.position();
                OrbView {
                    x,
                    y,
                    color: orb.render_color(),
                    radius: orb.radius() / CELL_PX,
                }
            })
            .collect();

        let trail = self
            .column_effect()
            .map(|column| column.trail())
            .unwrap_or_default();
        let particles = self
            .effects()
            .particles()
            .iter()
            .chain(trail)
            .map(|particle| {
                let (x, y) = particle.position();
                ParticleView {
                    x,
                    y,
                    size: particle.size(),
                    color: particle.color(),
                }
            })
            .collect();

        let column = self
            .column_effect()
            .filter(|column| column.stage().is_some())
            .map(|column| ColumnView {
                x: column.x(),
                width: column.width(),
                color: column.color(),
            });

        let notifications = self
            .effects()
            .notifications()
            .iter()
            .map(|notification| {
                let (x, y) = notification.position();
                NotificationView {
                    x,
                    y,
                    text: notification.text().to_owned(),
                    alpha: notification.alpha(),
                }
            })
            .collect();

        FrameView {
            rows: board.rows(),
            cols: board.cols(),
            cells,
            piece,
            orbs,
            particles,
            column,
            notifications,
            score: self.stats().score(),
            level: self.stats().level(),
            state: self.session_state().clone(),
            animating: self.is_animating(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        GameSeed, GameSession, Piece, PieceKind, SessionConfig,
        core::Rgb,
    };

    fn session() -> GameSession {
        let config = SessionConfig {
            rows: 8,
            cols: 7,
            orb_spawn_chance: 0.0,
            seed: Some(GameSeed::from_bytes([1; 16])),
            ..SessionConfig::default()
        };
        GameSession::new(config).unwrap()
    }

    #[test]
    fn test_frame_of_new_session() {
        let mut session = session();
        session.set_falling_piece(Piece::new(PieceKind::I)).unwrap();
        let frame = session.frame();
        assert_eq!((frame.rows, frame.cols), (8, 7));
        assert_eq!(frame.cells.len(), 56);
        assert!(frame.cells.iter().all(Option::is_none));
        let piece = frame.piece.unwrap();
        assert_eq!(piece.color, Rgb::CYAN);
        assert_eq!(piece.cells, [(3, -1), (4, -1), (5, -1), (6, -1)]);
        assert!(frame.orbs.is_empty());
        assert!(frame.column.is_none());
        assert_eq!(frame.score, 0);
        assert_eq!(frame.level, 1);
        assert!(frame.state.is_playing());
        assert!(!frame.animating);
    }

    #[test]
    fn test_frame_shows_locked_cells() {
        let mut session = session();
        session
            .set_falling_piece(Piece::at(PieceKind::O, 0, 5))
            .unwrap();
        session.hard_drop().unwrap();
        for _ in 0..10 {
            session.increment_frame();
        }
        let frame = session.frame();
        assert_eq!(frame.cell(0, 7), Some(Rgb::BLUE));
        assert_eq!(frame.cell(1, 6), Some(Rgb::BLUE));
        assert_eq!(frame.cell(2, 7), None);
        assert_eq!(frame.cell(7, 7), None);
        assert!(!frame.animating);
    }
}
