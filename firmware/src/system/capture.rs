//! Free-running capture timer latching the measured signal's edges.

use crate::system::hal::pac::TIM2;
use crate::system::hal::rcc::rec;
use crate::system::hal::rcc::ResetEnable;

/// Rate of the clock feeding the capture timer, in hertz.
///
/// Timers on APB1 run at twice the bus clock with the Daisy's default
/// clock tree.
pub const CLOCK_HZ: u32 = 240_000_000;

/// Hardware prescaler between the clock and the capture counter.
pub const PRESCALER: u32 = 256;

/// TIM2 in input capture mode, rising edges of channel 1.
///
/// The 32-bit counter runs free at `CLOCK_HZ / PRESCALER`. Each rising
/// edge of the input latches the counter into the capture register and
/// raises the channel 1 interrupt. The input filter is enabled to get some
/// noise immunity on the jack.
pub struct Capture {
    tim: TIM2,
}

impl Capture {
    pub fn new(tim: TIM2, prec: rec::Tim2) -> Self {
        prec.enable().reset();

        tim.psc.write(|w| w.psc().bits((PRESCALER - 1) as u16));
        tim.arr.write(|w| w.arr().bits(u32::MAX));
        // Channel 1 sampling TI1, input filter on.
        tim.ccmr1_input().modify(|_, w| w.cc1s().bits(0b01).ic1f().bits(0b0011));
        // Rising edge only.
        tim.ccer.modify(|_, w| {
            w.cc1p().clear_bit();
            w.cc1np().clear_bit();
            w.cc1e().set_bit()
        });
        tim.dier.modify(|_, w| w.cc1ie().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Collect the latched edge: the number of ticks since the previous one.
    ///
    /// The counter keeps running while the interrupt is being serviced.
    /// Subtracting the captured value from the live counter, instead of
    /// zeroing it, folds the servicing latency into the next interval
    /// rather than losing it on every edge.
    pub fn seize(&mut self) -> u32 {
        let captured = self.tim.ccr1.read().ccr().bits();
        self.tim
            .cnt
            .modify(|r, w| w.cnt().bits(r.cnt().bits().wrapping_sub(captured)));
        self.tim.sr.modify(|_, w| w.cc1if().clear_bit());
        captured
    }

    /// Whether an edge was latched and not yet collected.
    pub fn edge_pending(&self) -> bool {
        self.tim.sr.read().cc1if().bit_is_set()
    }
}
