use rand::Rng;

use super::particles::Particle;
use crate::core::{Rgb, Rgba};

/// Beam width at full size, in cells.
const MAX_WIDTH: f32 = 1.0;
const MAX_ALPHA: f32 = 0.8;
const GROW_TICKS: u32 = 10;
const STABLE_TICKS: u32 = 30;
const FADE_TICKS: u32 = 20;
/// Chance that a dead trail particle is replaced while the beam is lit.
const TRAIL_RESPAWN_CHANCE: f64 = 0.3;

/// Animation stage of the column beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ColumnStage {
    Growing,
    Stable,
    Fading,
}

#[derive(Debug, Clone, PartialEq)]
struct Beam {
    stage: ColumnStage,
    ticks: u32,
}

impl Beam {
    #[expect(clippy::cast_precision_loss)]
    fn width(&self) -> f32 {
        match self.stage {
            ColumnStage::Growing => MAX_WIDTH * self.ticks as f32 / GROW_TICKS as f32,
            ColumnStage::Stable | ColumnStage::Fading => MAX_WIDTH,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn alpha(&self) -> f32 {
        match self.stage {
            ColumnStage::Growing => MAX_ALPHA * self.ticks as f32 / GROW_TICKS as f32,
            ColumnStage::Stable => MAX_ALPHA,
            ColumnStage::Fading => {
                (MAX_ALPHA * (1.0 - self.ticks as f32 / FADE_TICKS as f32)).max(0.0)
            }
        }
    }

    /// Advances one tick. Returns `false` once the beam has faded out.
    fn update(&mut self) -> bool {
        self.ticks += 1;
        let (limit, next) = match self.stage {
            ColumnStage::Growing => (GROW_TICKS, Some(ColumnStage::Stable)),
            ColumnStage::Stable => (STABLE_TICKS, Some(ColumnStage::Fading)),
            ColumnStage::Fading => (FADE_TICKS, None),
        };
        if self.ticks < limit {
            return true;
        }
        match next {
            Some(stage) => {
                self.stage = stage;
                self.ticks = 0;
                true
            }
            None => false,
        }
    }
}

/// Vertical beam of light running down one board column.
///
/// The beam grows for 10 ticks, holds for 30, and fades over 20. A trail of
/// violet motes drifts inside the column; the effect is over only once both
/// the beam and every trail particle are gone.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEffect {
    x: usize,
    rows: usize,
    beam: Option<Beam>,
    trail: Vec<Particle>,
}

impl ColumnEffect {
    /// Lights column `x` of a board with `rows` rows.
    ///
    /// The trail starts denser in the top three and bottom three rows.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, x: usize, rows: usize) -> Self {
        let mut trail = vec![];
        for row in 0..rows {
            let density = if row < 3 || row + 4 > rows { 3 } else { 1 };
            for _ in 0..density {
                trail.push(Particle::column_trail(rng, x, row));
            }
        }
        Self {
            x,
            rows,
            beam: Some(Beam {
                stage: ColumnStage::Growing,
                ticks: 0,
            }),
            trail,
        }
    }

    #[must_use]
    pub fn x(&self) -> usize {
        self.x
    }

    /// Current beam stage, `None` once the beam has faded out.
    #[must_use]
    pub fn stage(&self) -> Option<ColumnStage> {
        self.beam.as_ref().map(|beam| beam.stage)
    }

    /// Beam width in cells.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.beam.as_ref().map_or(0.0, Beam::width)
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.beam.as_ref().map_or(0.0, Beam::alpha)
    }

    #[must_use]
    pub fn color(&self) -> Rgba {
        Rgb::VIOLET.with_alpha(self.alpha())
    }

    #[must_use]
    pub fn trail(&self) -> &[Particle] {
        &self.trail
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.beam.is_none() && self.trail.is_empty()
    }

    /// Advances the beam and its trail by one tick.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(beam) = &mut self.beam
            && !beam.update()
        {
            self.beam = None;
        }

        let lit = self.stage().is_some_and(|stage| !stage.is_fading());
        let mut respawned = vec![];
        self.trail.retain_mut(|particle| {
            if particle.update() {
                return true;
            }
            if lit && rng.random_bool(TRAIL_RESPAWN_CHANCE) {
                let row = rng.random_range(0..self.rows);
                respawned.push(Particle::column_trail(rng, self.x, row));
            }
            false
        });
        self.trail.extend(respawned);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn stage_lengths(
        effect: &mut ColumnEffect,
        rng: &mut Pcg32,
    ) -> Vec<(Option<ColumnStage>, u32)> {
        let mut lengths: Vec<(Option<ColumnStage>, u32)> = vec![];
        while effect.stage().is_some() {
            let stage = effect.stage();
            effect.update(rng);
            match lengths.last_mut() {
                Some((last, n)) if *last == stage => *n += 1,
                _ => lengths.push((stage, 1)),
            }
        }
        lengths
    }

    #[test]
    fn test_stage_durations() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut effect = ColumnEffect::new(&mut rng, 4, 20);
        let lengths = stage_lengths(&mut effect, &mut rng);
        assert_eq!(
            lengths,
            [
                (Some(ColumnStage::Growing), 10),
                (Some(ColumnStage::Stable), 30),
                (Some(ColumnStage::Fading), 20),
            ]
        );
    }

    #[test]
    fn test_growth_reaches_max() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut effect = ColumnEffect::new(&mut rng, 0, 20);
        assert!(effect.width().abs() < f32::EPSILON);
        for _ in 0..GROW_TICKS {
            effect.update(&mut rng);
        }
        assert_eq!(effect.stage(), Some(ColumnStage::Stable));
        assert!((effect.width() - MAX_WIDTH).abs() < f32::EPSILON);
        assert!((effect.alpha() - MAX_ALPHA).abs() < f32::EPSILON);
    }

    #[test]
    fn test_initial_trail_density() {
        let mut rng = Pcg32::seed_from_u64(3);
        let effect = ColumnEffect::new(&mut rng, 2, 20);
        // 3 top rows and 3 bottom rows at 3 each, 14 rows at 1
        assert_eq!(effect.trail().len(), 6 * 3 + 14);
    }

    #[test]
    fn test_finishes_after_trail_drains() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut effect = ColumnEffect::new(&mut rng, 2, 20);
        let mut ticks = 0;
        while !effect.is_finished() {
            effect.update(&mut rng);
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(ticks >= GROW_TICKS + STABLE_TICKS + FADE_TICKS);
        assert!(effect.alpha().abs() < f32::EPSILON);
    }
}
