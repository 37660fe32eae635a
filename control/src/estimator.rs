//! Turn drained windows into frequency estimates.

use crate::accumulator::Window;

/// Reciprocal frequency estimator.
///
/// Rather than counting input edges over a fixed time, it measures how
/// many filling-counter ticks a window worth of input edges took:
///
/// ```text
///                                     edge_count
/// frequency = filling_frequency * ----------------
///                                      tick_sum
/// ```
///
/// where the filling frequency is the rate of the free-running capture
/// counter. This keeps the relative precision high at low input
/// frequencies, where direct edge counting would see only a handful of
/// edges per window.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Estimator {
    filling_frequency: f64,
}

impl Estimator {
    pub fn new(filling_frequency: f64) -> Self {
        Self { filling_frequency }
    }

    /// Estimate the input frequency over the given window.
    ///
    /// An empty window means there was no input signal. That is reported
    /// as `None` instead of letting the division produce NaN.
    pub fn estimate(&self, window: Window) -> Option<f64> {
        if window.edge_count == 0 || window.tick_sum == 0 {
            return None;
        }
        Some(self.filling_frequency * f64::from(window.edge_count) / f64::from(window.tick_sum))
    }
}
