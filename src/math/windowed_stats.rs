//! Windowed running moments for spread statistics.
//!
//! `WindowedStats` keeps the last `capacity` observations in a ring buffer
//! together with a cached mean and sum of squared deviations (`M2`), so every
//! `push` is O(1) regardless of window size.
//!
//! # Update rules
//!
//! While the window is filling (count `n` after admitting `x`):
//! ```text
//! mean' = mean + (x - mean) / n
//! M2'   = M2 + (x - mean) * (x - mean')
//! ```
//!
//! Once full, the oldest value `y` is evicted as `x` is admitted, `n` fixed:
//! ```text
//! mean' = mean + (x - y) / n
//! M2'   = M2 + (x - mean) * (x - mean') - (y - mean) * (y - mean')
//! ```
//!
//! `recompute()` is an independent full pass over the window and is the
//! oracle the incremental values are checked against.
//!
//! # Usage
//!
//! ```rust
//! use autotrader::math::WindowedStats;
//!
//! let mut stats = WindowedStats::new(100);
//! for spread in [80.0, 100.0, 120.0] {
//!     stats.push(spread);
//! }
//! assert_eq!(stats.mean(), 100.0);
//! assert_eq!(stats.standard_deviation(), 20.0);
//! ```

use std::collections::VecDeque;

/// Mean and sample variance computed directly from the window contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
}

/// Fixed-capacity FIFO window with incrementally maintained mean/variance.
///
/// # Performance
///
/// - O(1) per push, the backing buffer is allocated once and never grows
/// - `recompute()` is O(N) and meant for verification, not the hot path
#[derive(Debug, Clone)]
pub struct WindowedStats {
    window: VecDeque<f64>,
    capacity: usize,
    mean: f64,
    /// Sum of squared deviations from the mean.
    m2: f64,
}

impl WindowedStats {
    /// Create an empty window holding at most `capacity` observations.
    ///
    /// A capacity of 0 is treated as 1; configuration validation rejects it
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Admit one observation, evicting the oldest first when full.
    ///
    /// Returns the evicted value, if any.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let old_mean = self.mean;

        if self.window.len() < self.capacity {
            self.window.push_back(value);
            let n = self.window.len() as f64;
            self.mean = old_mean + (value - old_mean) / n;
            self.m2 += (value - old_mean) * (value - self.mean);
            return None;
        }

        let evicted = self.window.pop_front()?;
        self.window.push_back(value);

        let n = self.capacity as f64;
        self.mean = old_mean + (value - evicted) / n;
        self.m2 += (value - old_mean) * (value - self.mean)
            - (evicted - old_mean) * (evicted - self.mean);

        // Float drift can push M2 fractionally below zero on flat windows
        if self.m2 < 0.0 {
            self.m2 = 0.0;
        }

        Some(evicted)
    }

    /// Cached running mean, 0 when empty.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance (denominator `n - 1`), 0 with fewer than two observations.
    #[inline]
    pub fn variance(&self) -> f64 {
        let n = self.window.len();
        if n < 2 {
            0.0
        } else {
            self.m2 / (n - 1) as f64
        }
    }

    /// Square root of the sample variance, 0 when the variance is zero,
    /// negative or not finite.
    pub fn standard_deviation(&self) -> f64 {
        let variance = self.variance();
        if variance > 0.0 && variance.is_finite() {
            variance.sqrt()
        } else {
            0.0
        }
    }

    /// Distance of `value` from the mean in standard deviations.
    ///
    /// Always non-negative; 0 when the standard deviation is 0.
    pub fn z_score(&self, value: f64) -> f64 {
        let std_dev = self.standard_deviation();
        if std_dev == 0.0 {
            return 0.0;
        }
        let z = (value - self.mean()).abs() / std_dev;
        if z.is_finite() {
            z
        } else {
            0.0
        }
    }

    /// Full pass over the window: arithmetic mean and sample variance.
    pub fn recompute(&self) -> Moments {
        let n = self.window.len();
        if n == 0 {
            return Moments {
                mean: 0.0,
                variance: 0.0,
            };
        }

        let mean = self.window.iter().sum::<f64>() / n as f64;
        let variance = if n < 2 {
            0.0
        } else {
            let sum_sq: f64 = self
                .window
                .iter()
                .map(|value| {
                    let diff = value - mean;
                    diff * diff
                })
                .sum();
            sum_sq / (n - 1) as f64
        };

        Moments { mean, variance }
    }

    /// Observations oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.window.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every observation and reset the cached moments.
    pub fn clear(&mut self) {
        self.window.clear();
        self.mean = 0.0;
        self.m2 = 0.0;
    }
}

impl Default for WindowedStats {
    fn default() -> Self {
        Self::new(100)
    }
}
