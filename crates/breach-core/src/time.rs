//! Simulation clock
//!
//! Tracks scaled delta time and total simulation time, and converts
//! variable frame deltas into fixed steps for consumers that drive the
//! simulation at a fixed rate.

use serde::{Deserialize, Serialize};

/// Clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Multiplier applied to raw deltas (1.0 = real time)
    pub time_scale: f32,
    /// Upper clamp on raw frame deltas so a hitch cannot produce a runaway
    /// simulation step
    pub max_delta_time: f32,
    /// Step size handed out by `fixed_steps`
    pub fixed_timestep: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

/// Simulation clock state, advanced once per frame by the consumer
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since simulation start in seconds
    pub total_time: f64,
    /// Scaled, clamped delta for this frame
    pub delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    fixed_accumulator: f32,
}

impl GameTime {
    /// Create a clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance the clock with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.frame_count += 1;
        self.delta_time = raw_delta.min(self.config.max_delta_time) * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Current simulation time as the f32 the gameplay systems consume
    pub fn now(&self) -> f32 {
        self.total_time as f32
    }

    /// Number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_total_time() {
        let mut time = GameTime::default();
        time.update(0.1);
        time.update(0.1);
        assert!((time.now() - 0.2).abs() < 1e-6);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn clamps_hitch_deltas() {
        let mut time = GameTime::default();
        time.update(10.0);
        assert_eq!(time.delta_time, 0.25);
    }

    #[test]
    fn time_scale_applies() {
        let mut time = GameTime::new(TimeConfig {
            time_scale: 0.5,
            ..Default::default()
        });
        time.update(0.1);
        assert!((time.delta_time - 0.05).abs() < 1e-6);
    }

    #[test]
    fn fixed_steps_drain_accumulator() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.02,
            ..Default::default()
        });
        time.update(0.05);
        assert_eq!(time.fixed_steps(), 2);
        assert_eq!(time.fixed_steps(), 0);
        time.update(0.05);
        // Leftover 0.01 from the first frame carries over.
        assert_eq!(time.fixed_steps(), 3);
    }
}
