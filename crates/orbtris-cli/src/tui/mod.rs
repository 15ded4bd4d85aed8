//! Fixed-rate terminal runtime: ticks drive the game, renders are throttled.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
