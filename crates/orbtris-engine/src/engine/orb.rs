use std::time::Duration;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};

use super::particles::{Effects, cell_center};
use crate::core::{Board, Rgb, Rgba};

/// Maximum number of live orbs.
pub const MAX_ORBS: usize = 3;
/// Orbs never spawn in this many rows at the top of the board.
pub(crate) const ORB_SPAWN_TOP_ROWS: usize = 4;
const SPAWN_ATTEMPTS: usize = 50;
/// Age after which blue and red orbs start fading out.
pub const ORB_LIFETIME: Duration = Duration::from_secs(30);

const ORB_ALPHA: f32 = 0.7;
/// Ticks a fading orb takes to reach zero alpha (0.7 in steps of 0.05).
const FADE_TICKS: u32 = 14;
const MIN_RADIUS: f32 = 8.0;
const MAX_RADIUS: f32 = 15.0;
const START_RADIUS: f32 = 10.0;
const PULSE_SPEED: f32 = 0.1;

/// Color of an orb, which fixes its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum OrbColor {
    Blue,
    Red,
    Yellow,
    Black,
    Purple,
}

/// What happens when the falling piece touches an orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum OrbEffect {
    /// Doubles the gravity interval for a while.
    Slow,
    /// Halves the gravity interval for a while.
    Fast,
    /// Flat bonus.
    Points,
    /// Destroys the falling piece.
    Destroy,
    /// Destroys the falling piece and fires a beam down the orb's column.
    Column,
}

impl OrbColor {
    /// Maps a uniform roll in `[0, 1)` to a color.
    ///
    /// Purple 5%, yellow 10%, black 8%, blue 38.5%, red 38.5%.
    ///
    /// ```
    /// use orbtris_engine::OrbColor;
    ///
    /// assert_eq!(OrbColor::from_roll(0.0), OrbColor::Purple);
    /// assert_eq!(OrbColor::from_roll(0.15), OrbColor::Black);
    /// assert_eq!(OrbColor::from_roll(0.615), OrbColor::Red);
    /// ```
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.05 {
            OrbColor::Purple
        } else if roll < 0.15 {
            OrbColor::Yellow
        } else if roll < 0.23 {
            OrbColor::Black
        } else if roll < 0.615 {
            OrbColor::Blue
        } else {
            OrbColor::Red
        }
    }

    #[must_use]
    pub const fn effect(self) -> OrbEffect {
        match self {
            OrbColor::Blue => OrbEffect::Slow,
            OrbColor::Red => OrbEffect::Fast,
            OrbColor::Yellow => OrbEffect::Points,
            OrbColor::Black => OrbEffect::Destroy,
            OrbColor::Purple => OrbEffect::Column,
        }
    }

    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            OrbColor::Blue => Rgb::BLUE,
            OrbColor::Red => Rgb::RED,
            OrbColor::Yellow => Rgb::YELLOW,
            OrbColor::Black => Rgb::BLACK,
            OrbColor::Purple => Rgb::VIOLET,
        }
    }

    /// Whether orbs of this color fade out after [`ORB_LIFETIME`].
    #[must_use]
    pub const fn expires(self) -> bool {
        matches!(self, OrbColor::Blue | OrbColor::Red)
    }
}

impl Distribution<OrbColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> OrbColor {
        OrbColor::from_roll(rng.random())
    }
}

impl OrbEffect {
    /// Floating text shown where the orb was consumed.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            OrbEffect::Slow => "SLOW DOWN! +10 POINTS",
            OrbEffect::Fast => "SPEED UP! +10 POINTS",
            OrbEffect::Points => "+100 POINTS!",
            OrbEffect::Destroy => "DESTROYED! -10 POINTS",
            OrbEffect::Column => "COLUMN BLAST! +25 POINTS",
        }
    }

    /// Signed score change applied when the effect fires.
    #[must_use]
    pub const fn score_delta(self) -> i32 {
        match self {
            OrbEffect::Slow | OrbEffect::Fast => 10,
            OrbEffect::Points => 100,
            OrbEffect::Destroy => -10,
            OrbEffect::Column => 25,
        }
    }

    /// Whether the effect removes the falling piece.
    #[must_use]
    pub const fn destroys_piece(self) -> bool {
        matches!(self, OrbEffect::Destroy | OrbEffect::Column)
    }
}

/// A power-up orb sitting on a board cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    x: usize,
    y: usize,
    color: OrbColor,
    created_at: Duration,
    radius: f32,
    pulse_direction: f32,
    fade_ticks: Option<u32>,
}

impl Orb {
    #[must_use]
    pub fn new(x: usize, y: usize, color: OrbColor, created_at: Duration) -> Self {
        Self {
            x,
            y,
            color,
            created_at,
            radius: START_RADIUS,
            pulse_direction: 1.0,
            fade_ticks: None,
        }
    }

    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn color(&self) -> OrbColor {
        self.color
    }

    /// Pulse radius in pixels of a 24 px cell, between 8 and 15.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade_ticks.is_some()
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        let Some(ticks) = self.fade_ticks else {
            return ORB_ALPHA;
        };
        #[expect(clippy::cast_precision_loss)]
        let progress = ticks as f32 / FADE_TICKS as f32;
        (ORB_ALPHA * (1.0 - progress)).max(0.0)
    }

    #[must_use]
    pub fn render_color(&self) -> Rgba {
        self.color.rgb().with_alpha(self.alpha())
    }

    fn pulse(&mut self) {
        self.radius += PULSE_SPEED * self.pulse_direction;
        if self.radius >= MAX_RADIUS {
            self.radius = MAX_RADIUS;
            self.pulse_direction = -1.0;
        } else if self.radius <= MIN_RADIUS {
            self.radius = MIN_RADIUS;
            self.pulse_direction = 1.0;
        }
    }
}

/// Live orbs of a session.
#[derive(Debug, Clone, Default)]
pub struct OrbField {
    orbs: Vec<Orb>,
}

impl OrbField {
    #[must_use]
    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orbs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    fn is_orb_at(&self, x: usize, y: usize) -> bool {
        self.orbs.iter().any(|orb| orb.position() == (x, y))
    }

    /// Places an orb directly, bypassing the random spawner.
    ///
    /// Returns `false` when the field is full or the cell already holds an orb.
    pub fn insert(&mut self, orb: Orb) -> bool {
        let (x, y) = orb.position();
        if self.orbs.len() >= MAX_ORBS || self.is_orb_at(x, y) {
            return false;
        }
        self.orbs.push(orb);
        true
    }

    /// Tries to add one to three orbs on empty cells below the top rows.
    ///
    /// Placement gives up after 50 attempts, so fewer orbs may appear than
    /// were requested. Returns the number of orbs added.
    pub fn spawn<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R, now: Duration) -> usize {
        if self.orbs.len() >= MAX_ORBS || board.rows() <= ORB_SPAWN_TOP_ROWS || board.cols() == 0 {
            return 0;
        }
        let requested = rng.random_range(1..=3);
        let target = (self.orbs.len() + requested).min(MAX_ORBS);
        let before = self.orbs.len();

        let mut attempts = 0;
        while self.orbs.len() < target && attempts < SPAWN_ATTEMPTS {
            attempts += 1;
            let x = rng.random_range(0..board.cols());
            let y = rng.random_range(ORB_SPAWN_TOP_ROWS..board.rows());
            if !board.is_vacant(x, y) || self.is_orb_at(x, y) {
                continue;
            }
            let color = rng.random();
            self.orbs.push(Orb::new(x, y, color, now));
        }
        let added = self.orbs.len() - before;
        log::debug!("spawned {added} of {requested} orbs in {attempts} attempts");
        added
    }

    /// Removes and returns every orb lying under one of `cells`.
    ///
    /// Cells above the board are ignored. Each orb is returned at most once.
    pub fn take_collisions<I>(&mut self, cells: I) -> Vec<Orb>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let cells: Vec<(usize, usize)> = cells
            .into_iter()
            .filter_map(|(x, y)| Some((usize::try_from(x).ok()?, usize::try_from(y).ok()?)))
            .collect();
        let mut taken = vec![];
        let mut i = 0;
        while i < self.orbs.len() {
            if cells.contains(&self.orbs[i].position()) {
                taken.push(self.orbs.remove(i));
            } else {
                i += 1;
            }
        }
        taken
    }

    /// Animates the orbs for one tick.
    ///
    /// Blue and red orbs older than [`ORB_LIFETIME`] start fading out and are
    /// removed, without effect, once transparent.
    pub fn update<R: Rng + ?Sized>(&mut self, now: Duration, effects: &mut Effects, rng: &mut R) {
        self.orbs.retain_mut(|orb| {
            let center = cell_center(orb.x, orb.y);
            if orb.color.expires()
                && orb.fade_ticks.is_none()
                && now.saturating_sub(orb.created_at) > ORB_LIFETIME
            {
                orb.fade_ticks = Some(0);
                effects.notify(center, "EXPIRED!");
            }
            if let Some(ticks) = &mut orb.fade_ticks {
                *ticks += 1;
                if *ticks % 4 == 0 {
                    effects.burst(rng, center, 1, orb.color.rgb(), 0.2..0.5);
                }
                if *ticks >= FADE_TICKS {
                    log::debug!("orb at {:?} expired", orb.position());
                    return false;
                }
            }
            orb.pulse();
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_color_frequencies() {
        let mut rng = rng();
        let mut counts = [0_u32; 5];
        let draws = 100_000;
        for _ in 0..draws {
            let color: OrbColor = rng.random();
            counts[color as usize] += 1;
        }
        let expected = [0.385, 0.385, 0.10, 0.08, 0.05];
        for (count, expected) in counts.iter().zip(expected) {
            let freq = f64::from(*count) / f64::from(draws);
            assert!((freq - expected).abs() < 0.01, "{counts:?}");
        }
    }

    #[test]
    fn test_color_thresholds() {
        assert_eq!(OrbColor::from_roll(0.049), OrbColor::Purple);
        assert_eq!(OrbColor::from_roll(0.05), OrbColor::Yellow);
        assert_eq!(OrbColor::from_roll(0.149), OrbColor::Yellow);
        assert_eq!(OrbColor::from_roll(0.229), OrbColor::Black);
        assert_eq!(OrbColor::from_roll(0.23), OrbColor::Blue);
        assert_eq!(OrbColor::from_roll(0.614), OrbColor::Blue);
        assert_eq!(OrbColor::from_roll(0.999), OrbColor::Red);
    }

    #[test]
    fn test_spawn_respects_limits() {
        let board = Board::new(20, 10);
        let mut rng = rng();
        let mut field = OrbField::default();
        for _ in 0..50 {
            field.spawn(&board, &mut rng, Duration::ZERO);
            assert!(field.len() <= MAX_ORBS);
            for orb in field.orbs() {
                let (x, y) = orb.position();
                assert!(x < 10);
                assert!((ORB_SPAWN_TOP_ROWS..20).contains(&y));
            }
        }
        assert_eq!(field.len(), MAX_ORBS);
        assert_eq!(field.spawn(&board, &mut rng, Duration::ZERO), 0);
    }

    #[test]
    fn test_spawn_skips_occupied_cells() {
        // only (9, 5) is free below the top four rows
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            IIIIIIIIII
            IIIIIIIII.
            ",
        );
        let mut rng = rng();
        let mut field = OrbField::default();
        for _ in 0..20 {
            field.spawn(&board, &mut rng, Duration::ZERO);
        }
        assert_eq!(field.len(), 1);
        assert_eq!(field.orbs()[0].position(), (9, 5));
    }

    #[test]
    fn test_take_collisions() {
        let mut field = OrbField::default();
        assert!(field.insert(Orb::new(2, 5, OrbColor::Yellow, Duration::ZERO)));
        assert!(field.insert(Orb::new(3, 5, OrbColor::Black, Duration::ZERO)));
        assert!(field.insert(Orb::new(7, 7, OrbColor::Blue, Duration::ZERO)));
        assert!(!field.insert(Orb::new(0, 9, OrbColor::Blue, Duration::ZERO)));

        let taken = field.take_collisions([(2, 5), (3, 5), (3, 4), (-1, 5)]);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].color(), OrbColor::Yellow);
        assert_eq!(taken[1].color(), OrbColor::Black);
        assert_eq!(field.len(), 1);
        assert!(field.take_collisions([(2, 5)]).is_empty());
    }

    #[test]
    fn test_expiry_only_for_blue_and_red() {
        let mut rng = rng();
        let mut effects = Effects::default();
        let mut field = OrbField::default();
        for (x, color) in [
            (0, OrbColor::Blue),
            (1, OrbColor::Red),
            (2, OrbColor::Yellow),
        ] {
            field.insert(Orb::new(x, 5, color, Duration::ZERO));
        }

        field.update(ORB_LIFETIME, &mut effects, &mut rng);
        assert!(field.orbs().iter().all(|orb| !orb.is_fading()));

        let later = ORB_LIFETIME + Duration::from_millis(1);
        field.update(later, &mut effects, &mut rng);
        assert_eq!(field.orbs().iter().filter(|orb| orb.is_fading()).count(), 2);
        assert_eq!(
            effects
                .notifications()
                .iter()
                .filter(|n| n.text() == "EXPIRED!")
                .count(),
            2
        );

        for _ in 0..FADE_TICKS {
            field.update(later, &mut effects, &mut rng);
        }
        assert_eq!(field.len(), 1);
        assert_eq!(field.orbs()[0].color(), OrbColor::Yellow);
    }

    #[test]
    fn test_fade_alpha_ramp() {
        let mut orb = Orb::new(0, 5, OrbColor::Red, Duration::ZERO);
        assert!((orb.alpha() - 0.7).abs() < f32::EPSILON);
        orb.fade_ticks = Some(7);
        assert!((orb.alpha() - 0.35).abs() < 1e-6);
        orb.fade_ticks = Some(FADE_TICKS);
        assert!(orb.alpha().abs() < f32::EPSILON);
    }

    #[test]
    fn test_pulse_bounces() {
        let mut orb = Orb::new(0, 5, OrbColor::Yellow, Duration::ZERO);
        let mut max = orb.radius();
        let mut min = orb.radius();
        for _ in 0..300 {
            orb.pulse();
            max = max.max(orb.radius());
            min = min.min(orb.radius());
        }
        assert!((max - MAX_RADIUS).abs() < f32::EPSILON);
        assert!((min - MIN_RADIUS).abs() < f32::EPSILON);
    }
}
