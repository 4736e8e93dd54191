//! Shake detection over the raw accelerometer axes.

/// Samples in the moving-average window.
pub const WINDOW: usize = 13;

/// Raw three-axis motion reading.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MotionSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Moving average over the last [`WINDOW`] samples, zero-filled at start.
///
/// Each new sample is scored against the average of the window *before* it
/// is stored.
#[derive(Clone, Copy, Debug)]
pub struct MotionFilter {
    window: [MotionSample; WINDOW],
    next: usize,
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionFilter {
    pub const fn new() -> Self {
        Self {
            window: [MotionSample { x: 0, y: 0, z: 0 }; WINDOW],
            next: 0,
        }
    }

    pub fn average(&self) -> (i32, i32, i32) {
        let (mut x, mut y, mut z) = (0i32, 0i32, 0i32);
        for sample in &self.window {
            x += i32::from(sample.x);
            y += i32::from(sample.y);
            z += i32::from(sample.z);
        }
        let n = WINDOW as i32;
        (x / n, y / n, z / n)
    }

    /// Sum of absolute per-axis deviations from the current average, then
    /// records `sample` in the window.
    pub fn magnitude(&mut self, sample: MotionSample) -> u32 {
        let (ax, ay, az) = self.average();
        let magnitude = (ax - i32::from(sample.x)).unsigned_abs()
            + (ay - i32::from(sample.y)).unsigned_abs()
            + (az - i32::from(sample.z)).unsigned_abs();

        self.window[self.next] = sample;
        self.next = (self.next + 1) % WINDOW;
        magnitude
    }
}
