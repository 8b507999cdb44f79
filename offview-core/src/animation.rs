/// Time-driven explode factor for the "explode view" animation
///
/// Runs the factor up to 1, bounces, runs it back to 0 and stops.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplodeAnimation {
    factor: f32,
    direction: f32,
    /// Factor units per second.
    pub speed: f32,
    running: bool,
}

impl ExplodeAnimation {
    pub fn new(speed: f32) -> Self {
        Self {
            factor: 0.0,
            direction: 1.0,
            speed,
            running: false,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start from the current factor, heading for the nearer end's opposite.
    pub fn trigger(&mut self) {
        self.running = true;
        self.direction = if self.factor > 0.5 { -1.0 } else { 1.0 };
    }

    /// Stop and jump to a fixed factor, e.g. after a manual slider change.
    pub fn set_factor(&mut self, factor: f32) {
        self.running = false;
        self.factor = factor.clamp(0.0, 1.0);
    }

    /// Advance by `dt` seconds. Returns the new factor while running.
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        if !self.running {
            return None;
        }

        self.factor += self.direction * self.speed * dt;
        if self.factor > 1.0 {
            self.factor = 1.0;
            self.direction = -1.0;
        } else if self.factor < 0.0 {
            self.factor = 0.0;
            self.direction = 1.0;
            self.running = false;
        }
        Some(self.factor)
    }
}

impl Default for ExplodeAnimation {
    fn default() -> Self {
        Self::new(1.0)
    }
}
