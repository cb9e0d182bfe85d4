/// Turns host frame timestamps into clamped deltas. One per engine.
#[derive(Clone, Debug)]
pub struct Ticker {
    last: Option<f64>,
    max_dt: f64,
    frame_index: u64,
}

impl Ticker {
    pub fn new(max_dt: f64) -> Self {
        Self {
            last: None,
            max_dt: if max_dt.is_finite() && max_dt > 0.0 { max_dt } else { 0.25 },
            frame_index: 0,
        }
    }

    /// Seconds since the previous timestamp. The first frame, backwards jumps and garbage
    /// timestamps yield 0; long stalls are clamped.
    pub fn advance(&mut self, timestamp_s: f64) -> f64 {
        self.frame_index += 1;
        if !timestamp_s.is_finite() {
            return 0.0;
        }
        let dt = match self.last {
            Some(last) => (timestamp_s - last).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last = Some(timestamp_s);
        dt
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/ticker.rs"]
mod tests;
