/// Trailing simple moving average over a fixed window.
///
/// Keeps the last `period` observations in a ring buffer so each push is O(1).
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: Vec<f64>,
    head: usize,
    filled: usize,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            window: vec![0.0; period],
            head: 0,
            filled: 0,
            sum: 0.0,
        }
    }

    /// Push the next observation; returns the mean once the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.is_ready() {
            self.sum -= self.window[self.head];
        } else {
            self.filled += 1;
        }
        self.window[self.head] = value;
        self.sum += value;
        self.head = (self.head + 1) % self.period;
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        self.is_ready().then(|| self.sum / self.period as f64)
    }

    pub fn is_ready(&self) -> bool {
        self.filled >= self.period
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Trailing rolling mean of `values` with an exact window of `period`.
///
/// Index `i` holds the mean of `values[i + 1 - period..=i]`; indices before the
/// window fills are `None`, never a partial-window average.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut sma = Sma::new(period);
    values.iter().map(|&v| sma.push(v)).collect()
}
