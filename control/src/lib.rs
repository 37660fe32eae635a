//! Measurement core of a reciprocal frequency meter.
//!
//! It is targetted to run in a firmware with two interrupt contexts firing
//! at different rates and mutating the same measurement state. The crate
//! itself touches no hardware, so all of it can be exercised on a host.
//!
//! Following is the communication as wired up in the firmware:
//!
//! ```text
//!   [ EdgeCaptureLoop ]                 (once per rising edge)
//!           |
//!           | record_edge(delta_ticks)
//!           V
//!     [ Meter {Accumulator, Cadence, Estimator, RefreshController} ]
//!           A
//!           | tick() -> Option<Report>  (once per base tick)
//!           |
//!   [ BaseTickLoop ]
//!           |
//!           | show(report.frequency)
//!           V
//!       [ Screen ]
//! ```
//!
//! Both entry points mutate the accumulator, so the caller must make sure
//! they exclude each other, e.g. by holding both behind one lock.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod accumulator;
pub mod cadence;
pub mod display;
pub mod estimator;
pub mod refresh;

mod log;

use crate::accumulator::Accumulator;
use crate::cadence::Cadence;
use crate::estimator::Estimator;
use crate::refresh::{RefreshController, RefreshMode};

/// Timer constants and refresh policy of the meter.
///
/// These are tuned per build, not law: the clock rates mirror the host
/// timer configuration, the divisors and threshold set how eagerly the
/// display refreshes.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Rate of the clock feeding the capture counter, in hertz.
    pub reference_clock_hz: u32,
    /// Hardware prescaler between the reference clock and the counter.
    pub capture_prescaler: u32,
    /// Window length in base ticks while the input holds still.
    pub stable_divisor: u32,
    /// Window length in base ticks while the input is being tuned.
    pub tuning_divisor: u32,
    /// Fraction of the previous estimate that counts as a change.
    pub relative_change_threshold: f64,
}

impl Config {
    /// Rate at which the capture counter actually ticks.
    #[must_use]
    pub fn filling_frequency(&self) -> f64 {
        f64::from(self.reference_clock_hz) / f64::from(self.capture_prescaler)
    }

    #[must_use]
    pub fn divisor_for(&self, mode: RefreshMode) -> u32 {
        match mode {
            RefreshMode::Tuning => self.tuning_divisor,
            RefreshMode::Stable => self.stable_divisor,
        }
    }
}

/// Everything the meter remembers between interrupts.
///
/// One owned object with one entry point per interrupt context, so that
/// the firmware can park it behind a single shared resource.
#[derive(Debug)]
pub struct Meter {
    config: Config,
    accumulator: Accumulator,
    cadence: Cadence,
    estimator: Estimator,
    controller: RefreshController,
}

/// Outcome of a closed window, to be applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// The new estimate, `None` when no input signal was detected.
    pub frequency: Option<f64>,
    /// The refresh mode selected for the window that just opened.
    pub mode: RefreshMode,
}

impl Meter {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let controller = RefreshController::new(config.relative_change_threshold);
        Self {
            config,
            accumulator: Accumulator::default(),
            cadence: Cadence::new(config.divisor_for(controller.mode())),
            estimator: Estimator::new(config.filling_frequency()),
            controller,
        }
    }

    /// Entry point of the edge capture context.
    ///
    /// `delta_ticks` is the number of capture-counter ticks elapsed since
    /// the previous edge.
    pub fn record_edge(&mut self, delta_ticks: u32) {
        self.accumulator.record_edge(delta_ticks);
    }

    /// Entry point of the base tick context.
    ///
    /// Most ticks just advance the cadence counter. Once per window it
    /// drains the accumulator, estimates the frequency, lets the refresh
    /// controller pick the pace of the next window and reports back.
    pub fn tick(&mut self) -> Option<Report> {
        if !self.cadence.tick() {
            return None;
        }

        let window = self.accumulator.take_window();
        let frequency = self.estimator.estimate(window);
        // No signal reads as 0.0, so losing the input registers as a
        // change and speeds the refresh up, just as plugging one in does.
        let mode = self.controller.update(frequency.unwrap_or(0.0));
        self.cadence.set_divisor(self.config.divisor_for(mode));

        Some(Report { frequency, mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            reference_clock_hz: 16_000_000,
            capture_prescaler: 256,
            stable_divisor: 250,
            tuning_divisor: 83,
            relative_change_threshold: 0.01,
        }
    }

    fn run_window(meter: &mut Meter, ticks: u32, deltas: &[u32]) -> Option<Report> {
        for delta in deltas {
            meter.record_edge(*delta);
        }
        for _ in 0..ticks - 1 {
            assert_eq!(meter.tick(), None);
        }
        let report = meter.tick();
        assert!(report.is_some());
        report
    }

    #[test]
    fn it_reports_once_per_window_with_the_reciprocal_estimate() {
        let mut meter = Meter::new(config());
        let report = run_window(&mut meter, 83, &[256; 10]).unwrap();
        assert_relative_eq!(report.frequency.unwrap(), 244.140_625);
    }

    #[test]
    fn when_there_is_no_input_it_reports_no_signal() {
        let mut meter = Meter::new(config());
        let report = run_window(&mut meter, 83, &[]).unwrap();
        assert_eq!(report.frequency, None);
    }

    #[test]
    fn when_estimates_settle_it_slows_down_and_speeds_up_on_an_outlier() {
        let mut meter = Meter::new(config());

        // The first window always reads as a change.
        let report = run_window(&mut meter, 83, &[256; 10]).unwrap();
        assert_eq!(report.mode, RefreshMode::Tuning);

        // The second identical window confirms stability and stretches
        // the windows that follow.
        let report = run_window(&mut meter, 83, &[256; 10]).unwrap();
        assert_eq!(report.mode, RefreshMode::Stable);
        let report = run_window(&mut meter, 250, &[256; 30]).unwrap();
        assert_eq!(report.mode, RefreshMode::Stable);

        // An outlier flips it back to the fast cadence.
        let report = run_window(&mut meter, 250, &[128; 30]).unwrap();
        assert_eq!(report.mode, RefreshMode::Tuning);
        let report = run_window(&mut meter, 83, &[128; 10]).unwrap();
        assert_eq!(report.mode, RefreshMode::Stable);
    }
}
