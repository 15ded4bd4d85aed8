use rand::Rng;

use super::{
    particles::{Effects, cell_center},
    score::GameStats,
};
use crate::core::{Board, Piece};

/// Lifecycle phase of the falling piece.
///
/// ```text
/// Falling --(down-move blocked)--> Locking --(full rows)--> LineClear
///    ^                               |  \                      |
///    |                               |   `--(above board)--> GameOver
///    `------------ Spawn <-----------+-------------------------'
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum PiecePhase {
    #[default]
    Falling,
    Locking,
    LineClear,
    Spawn,
    GameOver,
}

/// What a lock did to the board and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOutcome {
    pub cleared_rows: usize,
    pub points: u32,
    pub game_over: bool,
}

/// Runs a landed piece through `Locking` and `LineClear`.
///
/// Leaves `phase` at [`PiecePhase::Spawn`], or at [`PiecePhase::GameOver`]
/// when the piece locked above the board. Particles for every cleared cell
/// are launched before the rows are compacted away.
pub(crate) fn lock_piece<R: Rng + ?Sized>(
    phase: &mut PiecePhase,
    board: &mut Board,
    piece: &Piece,
    stats: &mut GameStats,
    effects: &mut Effects,
    rng: &mut R,
) -> LockOutcome {
    *phase = PiecePhase::Locking;
    let result = board.lock_piece(piece);
    if result.game_over {
        *phase = PiecePhase::GameOver;
        log::info!("piece {:?} locked above the board", piece.kind());
        return LockOutcome {
            game_over: true,
            ..LockOutcome::default()
        };
    }

    let cleared_rows = result.full_rows.len();
    let points = stats.complete_piece_drop(cleared_rows);
    if cleared_rows > 0 {
        *phase = PiecePhase::LineClear;
        if cleared_rows > 1 {
            effects.notify(
                board_center(board),
                format!("{cleared_rows} ROWS! +{points} POINTS"),
            );
        }
        for cell in board.clear_rows(&result.full_rows) {
            if let Some(color) = cell.block.color() {
                let count = rng.random_range(8..=12);
                effects.burst(rng, cell_center(cell.x, cell.y), count, color, 0.3..0.8);
            }
        }
        log::debug!("cleared {cleared_rows} rows for {points} points");
    }

    *phase = PiecePhase::Spawn;
    LockOutcome {
        cleared_rows,
        points,
        game_over: false,
    }
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn board_center(board: &Board) -> (f32, f32) {
    (board.cols() as f32 / 2.0, board.rows() as f32 / 2.0)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::PieceKind;

    fn run(board: &mut Board, piece: Piece) -> (PiecePhase, LockOutcome, GameStats, Effects) {
        let mut phase = PiecePhase::Falling;
        let mut stats = GameStats::new();
        let mut effects = Effects::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let outcome = lock_piece(&mut phase, board, &piece, &mut stats, &mut effects, &mut rng);
        (phase, outcome, stats, effects)
    }

    #[test]
    fn test_lock_without_clear() {
        let mut board = Board::new(6, 7);
        let (phase, outcome, stats, effects) = run(&mut board, Piece::at(PieceKind::O, 0, 4));
        assert_eq!(phase, PiecePhase::Spawn);
        assert_eq!(outcome, LockOutcome::default());
        assert_eq!(stats.completed_pieces(), 1);
        assert!(effects.particles().is_empty());
    }

    #[test]
    fn test_double_clear_scores_twenty() {
        let mut board = Board::from_ascii(
            "
            .......
            .......
            .......
            .......
            ..TTTTT
            ..ZZZZZ
            ",
        );
        let (phase, outcome, stats, effects) = run(&mut board, Piece::at(PieceKind::O, 0, 4));
        assert_eq!(phase, PiecePhase::Spawn);
        assert_eq!(outcome.cleared_rows, 2);
        assert_eq!(outcome.points, 20);
        assert_eq!(stats.score(), 20);
        assert_eq!(board, Board::new(6, 7));
        // 14 cleared cells, 8 to 12 particles each
        assert!((14 * 8..=14 * 12).contains(&effects.particles().len()));
        assert_eq!(effects.notifications()[0].text(), "2 ROWS! +20 POINTS");
    }

    #[test]
    fn test_single_clear_has_no_notification() {
        let mut board = Board::from_ascii(
            "
            .......
            .......
            .......
            .......
            .......
            ..TTTTT
            ",
        );
        let (_, outcome, _, effects) = run(&mut board, Piece::at(PieceKind::O, 0, 4));
        assert_eq!(outcome.points, 10);
        assert!(effects.notifications().is_empty());
        assert_eq!(
            board,
            Board::from_ascii(
                "
                .......
                .......
                .......
                .......
                .......
                OO.....
                ",
            )
        );
    }

    #[test]
    fn test_lock_above_board() {
        let mut board = Board::new(6, 7);
        let (phase, outcome, stats, _) = run(&mut board, Piece::new(PieceKind::T));
        assert_eq!(phase, PiecePhase::GameOver);
        assert!(outcome.game_over);
        assert_eq!(stats.completed_pieces(), 0);
    }
}
