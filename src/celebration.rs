use rand::seq::SliceRandom;
use rand::Rng;

const SYMBOLS: [char; 6] = ['✨', '★', '✦', '●', '◆', '·'];

/// One drifting particle of the win animation.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SYMBOLS.choose(&mut rng).unwrap_or(&'✨'),
            color_index: rng.gen_range(0..5),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }
}

/// Burst of particles shown over the board when a game is won. Updated on
/// every app tick; deactivates itself once the last particle fades.
#[derive(Debug, Default)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub is_active: bool,
}

impl Celebration {
    const GRAVITY: f64 = 3.0;
    const TICK_SECONDS: f64 = 0.1;

    /// Launch a burst spread across the given terminal size.
    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.particles = (0..60)
            .map(|_| {
                Particle::new(
                    rng.gen_range(0.0..width.max(1) as f64),
                    rng.gen_range(0.0..(height.max(2) as f64 / 2.0)),
                )
            })
            .collect();
        self.is_active = true;
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }
        for particle in &mut self.particles {
            particle.x += particle.vel_x * Self::TICK_SECONDS;
            particle.y += particle.vel_y * Self::TICK_SECONDS;
            particle.vel_y += Self::GRAVITY * Self::TICK_SECONDS;
            particle.age += Self::TICK_SECONDS;
        }
        self.particles.retain(|p| p.age < p.max_age);
        if self.particles.is_empty() {
            self.is_active = false;
        }
    }

    pub fn stop(&mut self) {
        self.particles.clear();
        self.is_active = false;
    }
}
