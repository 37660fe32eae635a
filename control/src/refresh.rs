//! Two-speed refresh policy driven by frequency volatility.

use crate::log;

/// Refresh cadence selected for the next window.
///
/// `Tuning` refreshes fast with little averaging, for the moments when the
/// user is actively adjusting the measured source. `Stable` is the slow,
/// heavily averaged cadence used while the input holds still.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    Tuning,
    Stable,
}

/// Select the refresh mode by comparing successive estimates.
///
/// A change bigger than the configured fraction of the previous estimate
/// means the input is being tuned. The threshold is relative, so the
/// sensitivity stays the same across orders of magnitude of input
/// frequency.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshController {
    threshold: f64,
    previous_frequency: f64,
    mode: RefreshMode,
}

impl RefreshController {
    pub fn new(threshold: f64) -> Self {
        // Tuning at startup gets the first estimate on the display fast,
        // while there is no history worth averaging yet. The previous
        // frequency of zero also makes the first real reading register as
        // a change, holding tuning mode until a second reading confirms
        // the input is steady.
        Self {
            threshold,
            previous_frequency: 0.0,
            mode: RefreshMode::Tuning,
        }
    }

    /// Consume one new estimate and pick the mode for the next window.
    pub fn update(&mut self, frequency: f64) -> RefreshMode {
        let delta = libm::fabs(frequency - self.previous_frequency);
        let mode = if delta > self.previous_frequency * self.threshold {
            RefreshMode::Tuning
        } else {
            RefreshMode::Stable
        };
        if mode != self.mode {
            log::info!("Switching refresh mode={:?}", mode);
        }
        self.mode = mode;
        self.previous_frequency = frequency;
        mode
    }

    pub fn mode(&self) -> RefreshMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_PERCENT: f64 = 0.01;

    #[test]
    fn when_estimate_moves_more_than_the_threshold_it_tunes() {
        let mut controller = RefreshController::new(ONE_PERCENT);
        controller.update(1000.0);
        assert_eq!(controller.update(1015.0), RefreshMode::Tuning);
    }

    #[test]
    fn when_estimate_moves_less_than_the_threshold_it_stabilizes() {
        let mut controller = RefreshController::new(ONE_PERCENT);
        controller.update(1000.0);
        assert_eq!(controller.update(1005.0), RefreshMode::Stable);
    }

    #[test]
    fn when_the_first_reading_arrives_it_always_tunes() {
        // previous_frequency starts at zero, so the threshold is zero too
        // and any positive reading counts as a change.
        let mut controller = RefreshController::new(ONE_PERCENT);
        assert_eq!(controller.update(440.0), RefreshMode::Tuning);
    }

    #[test]
    fn when_readings_repeat_it_stays_stable_until_an_outlier() {
        let mut controller = RefreshController::new(ONE_PERCENT);
        controller.update(440.0);
        for _ in 0..10 {
            assert_eq!(controller.update(440.0), RefreshMode::Stable);
        }
        assert_eq!(controller.update(500.0), RefreshMode::Tuning);
        assert_eq!(controller.update(500.0), RefreshMode::Stable);
    }

    #[test]
    fn when_signal_disappears_it_tunes_again() {
        let mut controller = RefreshController::new(ONE_PERCENT);
        controller.update(440.0);
        controller.update(440.0);
        assert_eq!(controller.update(0.0), RefreshMode::Tuning);
    }
}
