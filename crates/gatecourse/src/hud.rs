//! Values the presentation layer reads each frame.

use std::time::Duration;

use web_time::Instant;

/// Speed in whole km/h for display.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn speed_kmh(speed: f32) -> u32 {
    (speed * 3.6).round().abs() as u32
}

/// Counts frames and publishes a frame rate at a fixed interval.
#[derive(Clone, Debug)]
pub struct FrameRateSampler {
    interval: Duration,
    window_start: Option<Instant>,
    frames: u32,
    fps: u32,
}

impl Default for FrameRateSampler {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl FrameRateSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
            frames: 0,
            fps: 60,
        }
    }

    /// Most recently published frame rate.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Count one frame. Returns the new rate when a window closes.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.frames = 1;
            return None;
        };

        self.frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.interval {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round() as u32;
        self.fps = fps;
        self.frames = 0;
        self.window_start = Some(now);
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_kmh_rounds_and_drops_sign() {
        assert_eq!(speed_kmh(13.89), 50);
        assert_eq!(speed_kmh(-6.945), 25);
        assert_eq!(speed_kmh(0.0), 0);
        assert_eq!(speed_kmh(0.1), 0);
    }

    #[test]
    fn test_sampler_publishes_every_interval() {
        let mut sampler = FrameRateSampler::default();
        assert_eq!(sampler.fps(), 60);

        let t0 = Instant::now();
        assert_eq!(sampler.tick(t0), None);
        for frame in 1..15 {
            assert_eq!(sampler.tick(t0 + Duration::from_millis(frame * 33)), None);
        }
        // 16 frames over half a second.
        assert_eq!(sampler.tick(t0 + Duration::from_millis(500)), Some(32));
        assert_eq!(sampler.fps(), 32);

        // The next window starts from zero.
        assert_eq!(sampler.tick(t0 + Duration::from_millis(516)), None);
    }
}
