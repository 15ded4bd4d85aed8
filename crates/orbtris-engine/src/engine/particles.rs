use std::ops::Range;

use rand::Rng;

use crate::core::{Rgb, Rgba};

/// Pixel size of a cell the particle motion constants were tuned for.
pub(crate) const CELL_PX: f32 = 24.0;
/// Downward acceleration per tick, in cells.
const GRAVITY: f32 = 0.08 / CELL_PX;
/// Oldest particles are dropped beyond this count.
const MAX_PARTICLES: usize = 2000;
/// Lifetime of a floating notification, in ticks.
const NOTIFICATION_LIFE: u32 = 60;

/// A short-lived visual fragment.
///
/// Positions and velocities are in cell units, with `(0.0, 0.0)` at the
/// top-left corner of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    gravity: f32,
    size: f32,
    color: Rgba,
    life: u32,
    initial_life: u32,
    alpha: f32,
}

impl Particle {
    /// A burst fragment launched from `(x, y)` with a slight upward bias.
    pub fn burst<R: Rng + ?Sized>(rng: &mut R, x: f32, y: f32, color: Rgba) -> Self {
        let life = rng.random_range(40..80);
        Self {
            x,
            y,
            vx: (rng.random::<f32>() - 0.5) * 3.0 / CELL_PX,
            vy: ((rng.random::<f32>() - 0.5) * 3.0 - rng.random::<f32>() * 1.5) / CELL_PX,
            gravity: GRAVITY,
            size: (rng.random::<f32>() * 2.5 + 1.0) / CELL_PX,
            color,
            life,
            initial_life: life,
            alpha: 1.0,
        }
    }

    /// A drifting mote inside column `x`, somewhere within row `row`.
    pub fn column_trail<R: Rng + ?Sized>(rng: &mut R, x: usize, row: usize) -> Self {
        #[expect(clippy::cast_precision_loss)]
        let (x, row) = (x as f32, row as f32);
        let life = rng.random_range(30..90);
        let alpha = rng.random::<f32>() * 0.7 + 0.3;
        Self {
            x: x + rng.random::<f32>(),
            y: row + rng.random::<f32>(),
            vx: (rng.random::<f32>() - 0.5) / CELL_PX,
            vy: (rng.random::<f32>() - 0.5) * 3.0 / CELL_PX,
            gravity: 0.0,
            size: (rng.random::<f32>() * 3.0 + 1.0) / CELL_PX,
            color: Rgb::VIOLET.with_alpha(alpha),
            life,
            initial_life: life,
            alpha,
        }
    }

    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Edge length in cells.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Current color: the base color faded by the remaining life.
    #[must_use]
    pub fn color(&self) -> Rgba {
        self.color.faded(self.alpha)
    }

    /// Advances one tick. Returns `false` once the particle has died.
    pub fn update(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.gravity;
        self.life = self.life.saturating_sub(1);
        #[expect(clippy::cast_precision_loss)]
        let ratio = self.life as f32 / self.initial_life as f32;
        // fade faster towards the end
        self.alpha = (ratio * 1.5 - 0.5).max(0.0);
        self.life > 0 && self.alpha > 0.0
    }
}

/// Floating text that rises and fades over one second of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    x: f32,
    y: f32,
    text: String,
    life: u32,
}

impl Notification {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            life: NOTIFICATION_LIFE,
        }
    }

    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        #[expect(clippy::cast_precision_loss)]
        let alpha = self.life as f32 / NOTIFICATION_LIFE as f32;
        alpha
    }

    /// Moves up and fades. Returns `false` once expired.
    pub fn update(&mut self) -> bool {
        self.y -= 1.0 / CELL_PX;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }
}

/// Free-floating particles and notifications of a session.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    particles: Vec<Particle>,
    notifications: Vec<Notification>,
}

/// Center of a board cell in cell units.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn cell_center(x: usize, y: usize) -> (f32, f32) {
    (x as f32 + 0.5, y as f32 + 0.5)
}

impl Effects {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Launches `count` burst particles from `center`, each with a base alpha
    /// drawn from `alpha`.
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        center: (f32, f32),
        count: usize,
        color: Rgb,
        alpha: Range<f32>,
    ) {
        for _ in 0..count {
            let base = color.with_alpha(rng.random_range(alpha.clone()));
            self.particles
                .push(Particle::burst(rng, center.0, center.1, base));
        }
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    pub fn notify(&mut self, center: (f32, f32), text: impl Into<String>) {
        self.notifications
            .push(Notification::new(center.0, center.1, text));
    }

    pub fn update_particles(&mut self) {
        self.particles.retain_mut(Particle::update);
    }

    pub fn update_notifications(&mut self) {
        self.notifications.retain_mut(Notification::update);
    }
}
