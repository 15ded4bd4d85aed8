//! Game-state engine for a falling-block puzzle with power-up orbs.
//!
//! [`core`] holds the board and piece model; [`engine`] drives a
//! [`GameSession`] tick by tick and exposes a render snapshot through
//! [`GameSession::frame`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

/// Reason a player command was rejected.
///
/// A rejected command leaves the session unchanged.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum InputError {
    #[display("input ignored while an animation is running")]
    Animating,
    #[display("input ignored outside of play")]
    NotPlaying,
    #[display("no falling piece")]
    NoFallingPiece,
    #[display("piece colliding when applying input")]
    #[from]
    PieceCollision(PieceCollisionError),
}
