//! Game engine logic and state management.
//!
//! This module drives the core data structures tick by tick:
//!
//! - [`GameSession`] - The running game: gravity, hard drops, locking, orbs,
//!   effects, and the game-over and leaderboard flow
//! - [`GameStats`] - Score, level, and gravity speed
//! - [`OrbField`] - Power-up orbs placed on empty cells
//! - [`Effects`] - Particle bursts and floating notifications
//! - [`ColumnEffect`] - The beam that precedes a column blast
//! - [`Scheduler`] - Tick-driven deferred events
//! - [`Leaderboard`] - Top ten scores with initials
//! - [`FrameView`] - Render snapshot for front ends
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from a [`SessionConfig`]
//! 2. Call [`GameSession::increment_frame`] once per frame
//! 3. Feed player input through the `try_*` commands and
//!    [`GameSession::hard_drop`]
//! 4. Draw [`GameSession::frame`]
//! 5. On game over, [`GameSession::check_leaderboard`] and
//!    [`GameSession::submit_initials`] record the score and restart
//!
//! # Example
//!
//! ```
//! use orbtris_engine::{GameSession, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::default()).unwrap();
//!
//! if session.try_rotate().is_ok() {
//!     println!("rotated");
//! }
//! for _ in 0..60 {
//!     session.increment_frame();
//! }
//!
//! let frame = session.frame();
//! println!("score {} at level {}", frame.score, frame.level);
//! ```

pub use self::{
    column_effect::*, config::*, frame::*, game_session::*, leaderboard::*, lock::*, orb::*,
    particles::*, scheduler::*, score::*, seed::*,
};

mod column_effect;
mod config;
mod frame;
mod game_session;
mod leaderboard;
mod lock;
mod orb;
mod particles;
mod scheduler;
mod score;
mod seed;
