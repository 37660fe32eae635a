//! One-time bring-up of everything the meter needs from the board.

pub mod capture;
pub mod lcd;

pub use daisy::hal;

use daisy::led::LedUser;
use hal::pac::CorePeripherals;
use hal::pac::Peripherals as DevicePeripherals;
use hal::prelude::*;
use hal::timer::{Event, Timer};
use systick_monotonic::Systick;

use self::capture::Capture;
use self::lcd::Lcd;

/// Rate of the base tick timer driving the estimator, in hertz.
pub const BASE_TICK_HZ: u32 = 250;

pub struct System {
    pub mono: Systick<1000>,
    pub status_led: LedUser,
    pub capture: Capture,
    pub ticker: Timer<hal::pac::TIM17>,
    pub lcd: Lcd,
}

impl System {
    /// Initialize system abstraction.
    ///
    /// # Panics
    ///
    /// The system can be initialized only once. It panics otherwise.
    #[must_use]
    pub fn init(mut cp: CorePeripherals, dp: DevicePeripherals) -> Self {
        enable_cache(&mut cp);

        let board = daisy::Board::take().unwrap();
        let ccdr = daisy::board_freeze_clocks!(board, dp);
        let pins = daisy::board_split_gpios!(board, ccdr, dp);

        let mono = Systick::new(cp.SYST, 480_000_000);
        let status_led = daisy::board_split_leds!(pins).USER;

        // The measured signal jack feeds channel 1 of the capture timer.
        let _capture_pin = pins.GPIO.PIN_B10.into_alternate::<1>();
        let capture = Capture::new(dp.TIM2, ccdr.peripheral.TIM2);

        let mut ticker = dp
            .TIM17
            .timer(BASE_TICK_HZ.Hz(), ccdr.peripheral.TIM17, &ccdr.clocks);
        ticker.listen(Event::TimeOut);

        let lcd = {
            let scl = pins.GPIO.PIN_B7.into_alternate_open_drain();
            let sda = pins.GPIO.PIN_B8.into_alternate_open_drain();
            let i2c = dp
                .I2C1
                .i2c((scl, sda), 100.kHz(), ccdr.peripheral.I2C1, &ccdr.clocks);
            let mut lcd = Lcd::new(i2c);
            lcd.init();
            lcd
        };

        Self {
            mono,
            status_led,
            capture,
            ticker,
            lcd,
        }
    }
}

/// AN5212: Improve application performance when fetching instruction and
/// data, from both internal andexternal memories.
fn enable_cache(cp: &mut CorePeripherals) {
    cp.SCB.enable_icache();
    cp.SCB.enable_dcache(&mut cp.CPUID);
}
