//! Software prescaler dividing the base tick down to the refresh cadence.

/// Decide when a measurement window closes.
///
/// The base timer fires at a fixed rate; a window closes once every
/// `divisor` ticks. The refresh controller swaps the divisor to move
/// between the slow, heavily averaged cadence and the fast tuning one.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cadence {
    divisor: u32,
    counter: u32,
}

impl Cadence {
    pub fn new(divisor: u32) -> Self {
        Self {
            divisor,
            counter: 0,
        }
    }

    /// Advance by one base tick. Returns true when a window just closed.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.divisor {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Select the window length for the windows that follow.
    pub fn set_divisor(&mut self, divisor: u32) {
        self.divisor = divisor;
    }
}
