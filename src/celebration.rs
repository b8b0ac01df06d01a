use rand::seq::SliceRandom;
use rand::Rng;

const SYMBOLS: [char; 6] = ['*', '+', 'o', '.', '^', '~'];

/// Particle for the completion burst
#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub age: f64,
    pub max_age: f64,
}

impl CelebrationParticle {
    fn new<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.5),
        }
    }

    /// Advance by `dt` seconds; false once the particle has expired.
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 15.0 * dt; // gravity
        self.age += dt;
        self.age < self.max_age
    }
}

/// Headless celebration burst raised when a puzzle completes. The CLI
/// renders frames as plain text lines.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    pub width: usize,
    pub height: usize,
}

impl CelebrationAnimation {
    pub fn start<R: Rng>(width: usize, height: usize, rng: &mut R) -> Self {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let particles = (0..40)
            .map(|_| CelebrationParticle::new(cx, cy, rng))
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.particles.retain_mut(|p| p.update(dt));
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Snapshot the current particle positions as text rows.
    pub fn frame(&self) -> Vec<String> {
        let mut grid = vec![vec![' '; self.width]; self.height];
        for p in &self.particles {
            let x = p.x.round() as isize;
            let y = p.y.round() as isize;
            if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
                grid[y as usize][x as usize] = p.symbol;
            }
        }
        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}
