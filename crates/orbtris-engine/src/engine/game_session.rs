use std::{cmp::Ordering, time::Duration};

use rand::{Rng as _, RngCore as _};
use rand_pcg::Pcg32;

use crate::{
    InputError, PieceCollisionError,
    core::{Board, Piece, PieceKind},
};

use super::{
    column_effect::ColumnEffect,
    config::{ConfigError, SessionConfig},
    leaderboard::Leaderboard,
    lock::{self, PiecePhase, board_center},
    orb::{OrbEffect, OrbField},
    particles::{Effects, cell_center},
    scheduler::{
        COLUMN_HOLD, DISINTEGRATE_DELAY, HARD_DROP_STEP, SPEED_EFFECT_DURATION, ScheduledEvent,
        Scheduler,
    },
    score::GameStats,
};

/// Points per block cleared by a column blast.
const DISINTEGRATE_POINTS: u32 = 15;
/// Fastest gravity a speed-up orb can cause.
const MIN_FAST_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
    /// Game over with a score that made the leaderboard.
    EnteringInitials,
}

/// Net gravity change left by blue and red orbs, until it reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedEffect {
    /// [`OrbEffect::Slow`] or [`OrbEffect::Fast`].
    pub effect: OrbEffect,
    pub remaining: Duration,
}

#[derive(Debug, Clone, Copy)]
struct FallingPiece {
    id: u64,
    piece: Piece,
}

/// A running game: board, falling piece, orbs, effects, and timers.
///
/// The session advances one logical tick per [`increment_frame`] call. Each
/// tick runs a fixed list of stages: deferred timers, gravity, lock
/// resolution, orb collisions, orb animation, particles, the column beam,
/// and notifications.
///
/// While a hard drop or a column blast is in progress the session is
/// *animating*: gravity is suspended and player input is rejected.
///
/// # Example
///
/// ```
/// use orbtris_engine::{GameSession, SessionConfig};
///
/// let config = SessionConfig {
///     orb_spawn_chance: 0.0,
///     ..SessionConfig::default()
/// };
/// let mut session = GameSession::new(config).unwrap();
/// session.try_move_left().unwrap();
/// session.hard_drop().unwrap();
/// for _ in 0..120 {
///     session.increment_frame();
/// }
/// assert_eq!(session.stats().completed_pieces(), 1);
/// ```
///
/// [`increment_frame`]: Self::increment_frame
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    rng: Pcg32,
    board: Board,
    falling: Option<FallingPiece>,
    next_piece_id: u64,
    phase: PiecePhase,
    stats: GameStats,
    drop_interval: Duration,
    gravity_elapsed: Duration,
    orbs: OrbField,
    effects: Effects,
    column: Option<ColumnEffect>,
    column_sequence: u64,
    column_active: bool,
    scheduler: Scheduler,
    session_state: SessionState,
    frame_interval: Duration,
    clock: Duration,
    total_frames: u64,
}

impl GameSession {
    /// Starts a session, seeding the RNG from the config or at random.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        log::info!(
            "starting {}x{} session at {} fps, seed {seed}",
            config.cols,
            config.rows,
            config.fps
        );
        Ok(Self::with_rng(config, seed.rng()))
    }

    fn with_rng(config: SessionConfig, rng: Pcg32) -> Self {
        let stats = GameStats::new();
        let frame_interval =
            Duration::from_nanos(1_000_000_000_u64.div_ceil(u64::from(config.fps)));
        let mut this = Self {
            board: Board::new(config.rows, config.cols),
            rng,
            falling: None,
            next_piece_id: 0,
            phase: PiecePhase::Spawn,
            drop_interval: stats.level_drop_interval(),
            stats,
            gravity_elapsed: Duration::ZERO,
            orbs: OrbField::default(),
            effects: Effects::default(),
            column: None,
            column_sequence: 0,
            column_active: false,
            scheduler: Scheduler::default(),
            session_state: SessionState::Playing,
            frame_interval,
            clock: Duration::ZERO,
            total_frames: 0,
            config,
        };
        this.spawn_piece();
        this
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling.as_ref().map(|falling| &falling.piece)
    }

    /// Identifier of the falling piece; every spawn takes the next id.
    #[must_use]
    pub fn falling_piece_id(&self) -> Option<u64> {
        self.falling.map(|falling| falling.id)
    }

    #[must_use]
    pub fn orbs(&self) -> &OrbField {
        &self.orbs
    }

    #[must_use]
    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    #[must_use]
    pub fn column_effect(&self) -> Option<&ColumnEffect> {
        self.column.as_ref()
    }

    /// Current gravity interval, including any active speed effect.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Active speed effect, `None` once gravity is back at the level interval.
    #[must_use]
    pub fn speed_effect(&self) -> Option<SpeedEffect> {
        let remaining = self.scheduler.time_until(ScheduledEvent::is_revert_speed)?;
        let effect = match self.drop_interval.cmp(&self.stats.level_drop_interval()) {
            Ordering::Greater => OrbEffect::Slow,
            Ordering::Less => OrbEffect::Fast,
            Ordering::Equal => return None,
        };
        Some(SpeedEffect { effect, remaining })
    }

    /// Session clock: elapsed ticks times the tick period.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.clock
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Whether a hard drop or column blast currently suspends play.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.column_active || self.scheduler.any(ScheduledEvent::is_hard_drop_step)
    }

    /// Replaces the falling piece, keeping its id.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if piece.collides(&self.board, 0, 0, piece.rotation()) {
            return Err(PieceCollisionError);
        }
        let falling = self.falling.as_mut().ok_or(PieceCollisionError)?;
        falling.piece = piece;
        Ok(())
    }

    /// Advances the session by one tick.
    pub fn increment_frame(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        self.total_frames += 1;
        self.clock += self.frame_interval;

        for event in self.scheduler.advance(self.frame_interval) {
            self.handle_event(event);
        }
        self.apply_gravity();
        if self.phase.is_locking() {
            self.resolve_lock();
        }
        self.check_orb_collisions();
        self.orbs
            .update(self.clock, &mut self.effects, &mut self.rng);
        self.effects.update_particles();
        self.update_column_effect();
        self.effects.update_notifications();
    }

    fn checked_input(&self) -> Result<&FallingPiece, InputError> {
        if !self.session_state.is_playing() {
            return Err(InputError::NotPlaying);
        }
        if self.is_animating() {
            return Err(InputError::Animating);
        }
        self.falling.as_ref().ok_or(InputError::NoFallingPiece)
    }

    fn apply_player_move(&mut self, piece: Piece) {
        if let Some(falling) = &mut self.falling {
            falling.piece = piece;
        }
        self.gravity_elapsed = Duration::ZERO;
        self.check_orb_collisions();
    }

    pub fn try_move_left(&mut self) -> Result<(), InputError> {
        let piece = self
            .checked_input()?
            .piece
            .moved_left(&self.board)
            .ok_or(PieceCollisionError)?;
        self.apply_player_move(piece);
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), InputError> {
        let piece = self
            .checked_input()?
            .piece
            .moved_right(&self.board)
            .ok_or(PieceCollisionError)?;
        self.apply_player_move(piece);
        Ok(())
    }

    /// Rotates clockwise with a one-cell wall kick.
    pub fn try_rotate(&mut self) -> Result<(), InputError> {
        let piece = self
            .checked_input()?
            .piece
            .rotated(&self.board)
            .ok_or(PieceCollisionError)?;
        self.apply_player_move(piece);
        Ok(())
    }

    /// Starts a hard drop.
    ///
    /// The first step happens immediately, the rest every 30 ms until the
    /// piece lands. Orbs are checked after every step.
    pub fn hard_drop(&mut self) -> Result<(), InputError> {
        let piece_id = self.checked_input()?.id;
        self.hard_drop_step(piece_id);
        if self.phase.is_locking() {
            self.resolve_lock();
        }
        Ok(())
    }

    /// Clears everything and starts over with the same configuration.
    pub fn reset(&mut self) {
        let rng = Pcg32::new(self.rng.next_u64(), self.rng.next_u64() | 1);
        *self = Self::with_rng(self.config.clone(), rng);
        log::info!("session reset");
    }

    /// After game over, asks for initials if the score made the leaderboard.
    pub fn check_leaderboard(&mut self, leaderboard: &Leaderboard) -> bool {
        if !self.session_state.is_game_over() {
            return false;
        }
        if leaderboard.qualifying_position(self.stats.score()).is_none() {
            return false;
        }
        self.session_state = SessionState::EnteringInitials;
        true
    }

    /// Records the final score under `initials` and restarts.
    ///
    /// Returns the leaderboard position taken, or `None` (without any change)
    /// when the session is not waiting for initials.
    pub fn submit_initials(&mut self, leaderboard: &mut Leaderboard, initials: &str) -> Option<usize> {
        if !self.session_state.is_entering_initials() {
            return None;
        }
        let position = leaderboard.insert(initials, self.stats.score());
        self.reset();
        position
    }

    fn spawn_piece(&mut self) {
        let kind: PieceKind = self.rng.random();
        let id = self.next_piece_id;
        self.next_piece_id += 1;
        self.falling = Some(FallingPiece {
            id,
            piece: Piece::new(kind),
        });
        self.gravity_elapsed = Duration::ZERO;
        self.phase = PiecePhase::Falling;
        if self.rng.random_bool(self.config.orb_spawn_chance) {
            self.orbs.spawn(&self.board, &mut self.rng, self.clock);
        }
    }

    fn apply_gravity(&mut self) {
        if self.is_animating() || !self.phase.is_falling() {
            return;
        }
        let Some(falling) = &mut self.falling else {
            return;
        };
        self.gravity_elapsed += self.frame_interval;
        if self.gravity_elapsed <= self.drop_interval {
            return;
        }
        self.gravity_elapsed = Duration::ZERO;
        match falling.piece.moved_down(&self.board) {
            Some(piece) => falling.piece = piece,
            None => self.phase = PiecePhase::Locking,
        }
    }

    fn hard_drop_step(&mut self, piece_id: u64) {
        let Some(falling) = &mut self.falling else {
            return;
        };
        if falling.id != piece_id {
            return;
        }
        let Some(piece) = falling.piece.moved_down(&self.board) else {
            self.phase = PiecePhase::Locking;
            return;
        };
        falling.piece = piece;
        self.check_orb_collisions();
        if self.falling_piece_id() == Some(piece_id) {
            self.scheduler
                .schedule(HARD_DROP_STEP, ScheduledEvent::HardDropStep { piece_id });
        }
    }

    fn resolve_lock(&mut self) {
        let Some(falling) = self.falling.take() else {
            self.phase = PiecePhase::Spawn;
            return;
        };
        self.scheduler.cancel(ScheduledEvent::is_hard_drop_step);
        let outcome = lock::lock_piece(
            &mut self.phase,
            &mut self.board,
            &falling.piece,
            &mut self.stats,
            &mut self.effects,
            &mut self.rng,
        );
        if outcome.game_over {
            self.session_state = SessionState::GameOver;
            log::info!("game over with score {}", self.stats.score());
            return;
        }
        if outcome.cleared_rows > 0 {
            self.drop_interval = self.stats.level_drop_interval();
        }
        self.spawn_piece();
    }

    fn handle_event(&mut self, event: ScheduledEvent) {
        match event {
            ScheduledEvent::HardDropStep { piece_id } => self.hard_drop_step(piece_id),
            ScheduledEvent::RevertSpeed => {
                self.drop_interval = self.stats.level_drop_interval();
            }
            ScheduledEvent::Disintegrate { sequence, x, rows } => {
                if sequence == self.column_sequence {
                    self.disintegrate_column(x, &rows);
                    self.scheduler
                        .schedule(COLUMN_HOLD, ScheduledEvent::ReleaseColumnHold { sequence });
                }
            }
            ScheduledEvent::ReleaseColumnHold { sequence } => {
                if sequence == self.column_sequence {
                    self.finish_column_sequence();
                }
            }
        }
    }

    /// Consumes every orb under the falling piece and applies its effect.
    fn check_orb_collisions(&mut self) {
        let Some(falling) = self.falling else {
            return;
        };
        let taken = self.orbs.take_collisions(falling.piece.cells());
        if taken.is_empty() {
            return;
        }

        let mut destroy_piece = false;
        for orb in taken {
            let (x, y) = orb.position();
            let center = cell_center(x, y);
            let effect = orb.color().effect();
            self.effects
                .burst(&mut self.rng, center, 20, orb.color().rgb(), 0.5..1.0);
            self.effects.notify(center, effect.message());
            log::info!("orb {:?} at ({x}, {y}) triggered {effect:?}", orb.color());

            let delta = effect.score_delta();
            if delta >= 0 {
                self.stats.add_points(delta.unsigned_abs());
            } else {
                self.stats.deduct_points(delta.unsigned_abs());
            }
            destroy_piece |= effect.destroys_piece();
            match effect {
                OrbEffect::Slow => {
                    self.drop_interval *= 2;
                    self.scheduler
                        .schedule(SPEED_EFFECT_DURATION, ScheduledEvent::RevertSpeed);
                }
                OrbEffect::Fast => {
                    self.drop_interval = (self.drop_interval / 2).max(MIN_FAST_INTERVAL);
                    self.scheduler
                        .schedule(SPEED_EFFECT_DURATION, ScheduledEvent::RevertSpeed);
                }
                OrbEffect::Column if !self.column_active => self.start_column(x),
                OrbEffect::Points | OrbEffect::Destroy | OrbEffect::Column => {}
            }
        }

        if destroy_piece {
            self.destroy_falling_piece();
            // a column blast brings the next piece in once it resolves
            if !self.column_active {
                self.spawn_piece();
            }
        }
    }

    fn destroy_falling_piece(&mut self) {
        let Some(falling) = self.falling.take() else {
            return;
        };
        self.scheduler.cancel(ScheduledEvent::is_hard_drop_step);
        let color = falling.piece.color();
        for (x, y) in falling.piece.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            let count = self.rng.random_range(8..=12);
            self.effects
                .burst(&mut self.rng, cell_center(x, y), count, color, 0.3..0.8);
        }
        self.phase = PiecePhase::Spawn;
    }

    fn start_column(&mut self, x: usize) {
        self.column_sequence += 1;
        self.column_active = true;
        let rows = self.board.occupied_rows_in_column(x);
        self.column = Some(ColumnEffect::new(&mut self.rng, x, self.board.rows()));
        self.scheduler.schedule(
            DISINTEGRATE_DELAY,
            ScheduledEvent::Disintegrate {
                sequence: self.column_sequence,
                x,
                rows,
            },
        );
    }

    fn disintegrate_column(&mut self, x: usize, rows: &[usize]) {
        let mut cleared = 0;
        for &y in rows {
            let Some(color) = self.board.disintegrate_cell(x, y).and_then(|b| b.color()) else {
                continue;
            };
            cleared += 1;
            let count = self.rng.random_range(10..=15);
            self.effects
                .burst(&mut self.rng, cell_center(x, y), count, color, 0.3..0.8);
        }
        let points = DISINTEGRATE_POINTS * cleared;
        if points > 0 {
            self.stats.add_points(points);
            self.effects
                .notify(board_center(&self.board), format!("+{points} POINTS!"));
        }
        log::debug!("column {x} disintegrated {cleared} blocks");
    }

    fn update_column_effect(&mut self) {
        let Some(column) = &mut self.column else {
            return;
        };
        column.update(&mut self.rng);
        if column.is_finished() {
            self.column = None;
            self.finish_column_sequence();
        }
    }

    /// Ends the column pause once the beam, its trail, and both timers are done.
    fn finish_column_sequence(&mut self) {
        let pending = self
            .scheduler
            .any(|event| event.is_disintegrate() || event.is_release_column_hold());
        if !self.column_active || self.column.is_some() || pending {
            return;
        }
        self.column_active = false;
        log::info!("column effect complete");
        if self.session_state.is_playing() && self.falling.is_none() {
            self.spawn_piece();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GameSeed,
        core::Block,
        engine::orb::{Orb, OrbColor},
    };

    fn session() -> GameSession {
        let config = SessionConfig {
            orb_spawn_chance: 0.0,
            seed: Some(GameSeed::from_bytes([7; 16])),
            ..SessionConfig::default()
        };
        GameSession::new(config).unwrap()
    }

    fn session_with(kind: PieceKind) -> GameSession {
        let mut session = session();
        session.set_falling_piece(Piece::new(kind)).unwrap();
        session
    }

    fn place_orb(session: &mut GameSession, x: usize, y: usize, color: OrbColor) {
        assert!(session.orbs.insert(Orb::new(x, y, color, session.clock)));
    }

    /// Ticks until `done` holds, returning the number of ticks taken.
    fn run_until(session: &mut GameSession, mut done: impl FnMut(&GameSession) -> bool) -> u32 {
        let mut ticks = 0;
        while !done(session) {
            session.increment_frame();
            ticks += 1;
            assert!(ticks < 2000, "condition not reached");
        }
        ticks
    }

    #[test]
    fn test_initial_state() {
        let session = session();
        assert!(session.session_state().is_playing());
        assert_eq!(session.falling_piece_id(), Some(0));
        assert_eq!(session.falling_piece().unwrap().position().y(), -2);
        assert_eq!(session.drop_interval(), Duration::from_millis(1000));
        assert!(!session.is_animating());
    }

    #[test]
    fn test_gravity_interval() {
        let mut session = session_with(PieceKind::T);
        for _ in 0..59 {
            session.increment_frame();
        }
        assert_eq!(session.falling_piece().unwrap().position().y(), -2);
        session.increment_frame();
        assert_eq!(session.falling_piece().unwrap().position().y(), -1);
    }

    #[test]
    fn test_move_restarts_gravity_timer() {
        let mut session = session_with(PieceKind::T);
        for _ in 0..50 {
            session.increment_frame();
        }
        session.try_move_left().unwrap();
        for _ in 0..50 {
            session.increment_frame();
        }
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.position().x(), 2);
        assert_eq!(piece.position().y(), -2);
    }

    #[test]
    fn test_hard_drop_lands_and_spawns() {
        let mut session = session_with(PieceKind::T);
        session.hard_drop().unwrap();
        assert!(session.is_animating());
        assert_eq!(session.try_move_left().unwrap_err().to_string(), "input ignored while an animation is running");

        run_until(&mut session, |s| s.falling_piece_id() == Some(1));
        assert_eq!(session.board().block(3, 19), Some(Block::Piece(PieceKind::T)));
        assert_eq!(session.board().block(4, 18), Some(Block::Piece(PieceKind::T)));
        assert_eq!(session.stats().completed_pieces(), 1);
        assert!(!session.is_animating());
        assert!(session.phase().is_falling());
    }

    #[test]
    fn test_hard_drop_steps_every_thirty_ms() {
        let mut session = session_with(PieceKind::T);
        session.hard_drop().unwrap();
        assert_eq!(session.falling_piece().unwrap().position().y(), -1);
        session.increment_frame();
        assert_eq!(session.falling_piece().unwrap().position().y(), -1);
        session.increment_frame();
        assert_eq!(session.falling_piece().unwrap().position().y(), 0);
    }

    #[test]
    fn test_blocked_moves_are_rejected() {
        let mut session = session_with(PieceKind::O);
        session
            .set_falling_piece(Piece::at(PieceKind::O, 0, 5))
            .unwrap();
        assert!(matches!(
            session.try_move_left(),
            Err(InputError::PieceCollision(_))
        ));
        assert_eq!(session.falling_piece().unwrap().position().x(), 0);
    }

    #[test]
    fn test_spawned_piece_stops_at_wall() {
        let mut session = session_with(PieceKind::T);
        for _ in 0..3 {
            session.try_move_left().unwrap();
        }
        assert!(matches!(
            session.try_move_left(),
            Err(InputError::PieceCollision(_))
        ));
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.position().x(), 0);
        assert!(piece.cells().all(|(x, _)| x >= 0));

        session.hard_drop().unwrap();
        run_until(&mut session, |s| s.falling_piece_id() == Some(1));
        assert!(session.session_state().is_playing());
        assert_eq!(session.board().block(0, 19), Some(Block::Piece(PieceKind::T)));
        assert_eq!(session.board().block(1, 18), Some(Block::Piece(PieceKind::T)));
    }

    #[test]
    fn test_destroy_orb_replaces_piece() {
        let mut session = session_with(PieceKind::T);
        session.stats.add_points(5);
        place_orb(&mut session, 4, 10, OrbColor::Black);
        session.hard_drop().unwrap();

        run_until(&mut session, |s| s.falling_piece_id() != Some(0));
        assert_eq!(session.falling_piece_id(), Some(1));
        assert_eq!(session.falling_piece().unwrap().position().y(), -2);
        assert_eq!(session.stats().score(), 0);
        assert!(!session.is_animating());
        assert!(session.orbs().is_empty());
        assert!(
            session
                .effects()
                .notifications()
                .iter()
                .any(|n| n.text() == "DESTROYED! -10 POINTS")
        );
        // nothing was locked
        assert_eq!(session.board(), &Board::new(20, 10));
    }

    #[test]
    fn test_points_orb() {
        let mut session = session_with(PieceKind::T);
        place_orb(&mut session, 4, 10, OrbColor::Yellow);
        session.set_falling_piece(Piece::at(PieceKind::T, 3, 10)).unwrap();
        session.increment_frame();
        assert_eq!(session.stats().score(), 100);
        assert_eq!(session.stats().level(), 2);
        assert_eq!(session.falling_piece_id(), Some(0));
    }

    #[test]
    fn test_slow_orb_reverts_after_five_seconds() {
        let mut session = session_with(PieceKind::T);
        place_orb(&mut session, 4, 10, OrbColor::Blue);
        session.set_falling_piece(Piece::at(PieceKind::T, 3, 10)).unwrap();
        session.increment_frame();
        assert_eq!(session.stats().score(), 10);
        assert_eq!(session.drop_interval(), Duration::from_millis(2000));
        assert_eq!(
            session.speed_effect(),
            Some(SpeedEffect {
                effect: OrbEffect::Slow,
                remaining: SPEED_EFFECT_DURATION,
            })
        );

        for _ in 0..299 {
            session.increment_frame();
        }
        assert_eq!(session.drop_interval(), Duration::from_millis(2000));
        assert!(session.speed_effect().unwrap().remaining < Duration::from_millis(20));
        session.increment_frame();
        assert_eq!(session.drop_interval(), Duration::from_millis(1000));
        assert_eq!(session.speed_effect(), None);
    }

    #[test]
    fn test_fast_orb_floor() {
        let mut session = session_with(PieceKind::T);
        place_orb(&mut session, 4, 10, OrbColor::Red);
        session.set_falling_piece(Piece::at(PieceKind::T, 3, 10)).unwrap();
        session.increment_frame();
        assert_eq!(session.drop_interval(), Duration::from_millis(500));
        assert_eq!(session.speed_effect().unwrap().effect, OrbEffect::Fast);

        session.drop_interval = Duration::from_millis(80);
        place_orb(&mut session, 5, 11, OrbColor::Red);
        session.set_falling_piece(Piece::at(PieceKind::T, 4, 10)).unwrap();
        session.increment_frame();
        assert_eq!(session.drop_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_column_orb_disintegrates_column() {
        let mut session = session_with(PieceKind::T);
        session.board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ...Z......
            ...Z......
            ...ZZ.....
            .J.ZZ.....
            JJJZZ.....
            ",
        );
        place_orb(&mut session, 3, 10, OrbColor::Purple);
        session.set_falling_piece(Piece::at(PieceKind::T, 2, 9)).unwrap();
        session.increment_frame();

        assert_eq!(session.stats().score(), 25);
        assert!(session.falling_piece().is_none());
        assert!(session.is_animating());
        assert_eq!(session.column_effect().unwrap().x(), 3);
        assert!(matches!(session.try_rotate(), Err(InputError::Animating)));

        // 500 ms later the column is cleared
        for _ in 0..30 {
            session.increment_frame();
        }
        assert!(session.board().occupied_rows_in_column(3).is_empty());
        assert_eq!(session.stats().score(), 25 + 5 * 15);
        assert_eq!(session.board().block(4, 19), Some(Block::Piece(PieceKind::Z)));

        let ticks = run_until(&mut session, |s| !s.is_animating());
        // the 1000 ms hold runs out at the earliest
        assert!(ticks >= 59);
        assert_eq!(session.falling_piece_id(), Some(1));
        assert!(session.column_effect().is_none());
    }

    #[test]
    fn test_column_and_destroy_spawn_one_piece() {
        let mut session = session_with(PieceKind::T);
        place_orb(&mut session, 3, 10, OrbColor::Purple);
        place_orb(&mut session, 5, 10, OrbColor::Black);
        session.hard_drop().unwrap();

        // T row 1 covers (3..=5, 10) when the anchor reaches y = 9
        run_until(&mut session, |s| s.falling_piece().is_none());
        assert_eq!(session.stats().score(), 15);
        assert!(session.orbs().is_empty());
        assert!(session.is_animating());

        run_until(&mut session, |s| !s.is_animating());
        assert_eq!(session.falling_piece_id(), Some(1));
        for _ in 0..300 {
            session.increment_frame();
        }
        assert_eq!(session.next_piece_id, 2);
    }

    #[test]
    fn test_game_over_and_leaderboard() {
        let mut session = session_with(PieceKind::T);
        session.board = Board::from_ascii(&format!("...J......\n{}", "..........\n".repeat(19)));
        session.hard_drop().unwrap();
        assert!(session.session_state().is_game_over());
        assert!(matches!(session.try_move_left(), Err(InputError::NotPlaying)));

        let frames = session.total_frames();
        session.increment_frame();
        assert_eq!(session.total_frames(), frames);

        let mut leaderboard = Leaderboard::default();
        assert!(!session.check_leaderboard(&leaderboard));

        session.stats.add_points(50);
        assert!(session.check_leaderboard(&leaderboard));
        assert!(session.session_state().is_entering_initials());

        assert_eq!(session.submit_initials(&mut leaderboard, "ace"), Some(0));
        assert_eq!(leaderboard.entries()[0].initials, "ACE");
        assert_eq!(leaderboard.entries()[0].score, 50);
        assert!(session.session_state().is_playing());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.board(), &Board::new(20, 10));
    }

    #[test]
    fn test_reset_clears_timers() {
        let mut session = session_with(PieceKind::T);
        place_orb(&mut session, 4, 10, OrbColor::Blue);
        session.set_falling_piece(Piece::at(PieceKind::T, 3, 10)).unwrap();
        session.increment_frame();
        session.hard_drop().unwrap();
        session.reset();
        assert!(session.scheduler.is_empty());
        assert!(session.orbs().is_empty());
        assert!(session.effects().particles().is_empty());
        assert_eq!(session.drop_interval(), Duration::from_millis(1000));
        assert_eq!(session.falling_piece_id(), Some(0));
    }
}
