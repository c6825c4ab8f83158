use std::time::{Duration, Instant};

/// How often the frame rate gets logged.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Counts presented frames and reports the average rate every few seconds.
pub struct FrameClock {
    frames: u32,
    since: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { frames: 0, since: now }
    }

    /// Records one frame. Returns the frames per second once a report interval has passed.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}
