#![no_main]
#![no_std]

use freqmeter_firmware as _; // global logger + panicking-behavior

#[rtic::app(device = stm32h7xx_hal::pac, peripherals = true, dispatchers = [EXTI0, EXTI1])]
mod app {
    use daisy::led::{Led, LedUser};
    use fugit::ExtU64;
    use systick_monotonic::Systick;

    use freqmeter_control::display::{self, Screen};
    use freqmeter_control::{Config, Meter};
    use freqmeter_firmware::system::capture::{self, Capture};
    use freqmeter_firmware::system::hal::pac::TIM17;
    use freqmeter_firmware::system::hal::timer::Timer;
    use freqmeter_firmware::system::lcd::Lcd;
    use freqmeter_firmware::system::System;

    // The refresh policy: a window of 250 base ticks reads once a second
    // with heavy averaging, 83 ticks reads three times a second while the
    // input is being tuned. A reading moving by over 1 % counts as tuning.
    const CONFIG: Config = Config {
        reference_clock_hz: capture::CLOCK_HZ,
        capture_prescaler: capture::PRESCALER,
        stable_divisor: 250,
        tuning_divisor: 83,
        relative_change_threshold: 0.01,
    };

    const BLINKS: u8 = 1;

    #[monotonic(binds = SysTick, default = true)]
    type Mono = Systick<1000>; // 1 kHz / 1 ms granularity

    #[shared]
    struct Shared {
        meter: Meter,
    }

    #[local]
    struct Local {
        status_led: LedUser,
        capture: Capture,
        ticker: Timer<TIM17>,
        lcd: Lcd,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::info!("INIT");

        let system = System::init(cx.core, cx.device);
        let mono = system.mono;
        let status_led = system.status_led;
        let capture = system.capture;
        let ticker = system.ticker;
        let mut lcd = system.lcd;

        lcd.print("starting...");

        let meter = Meter::new(CONFIG);

        blink::spawn(true, BLINKS).unwrap();

        (
            Shared { meter },
            Local {
                status_led,
                capture,
                ticker,
                lcd,
            },
            init::Monotonics(mono),
        )
    }

    // Fires on every rising edge of the measured input, possibly thousands
    // of times per window. The counter rebase must not interleave with the
    // estimator's drain, so both happen under the meter lock.
    #[task(binds = TIM2, local = [capture], shared = [meter], priority = 3)]
    fn edge_capture(mut cx: edge_capture::Context) {
        let capture = cx.local.capture;
        cx.shared.meter.lock(|meter| {
            let delta = capture.seize();
            meter.record_edge(delta);
        });
    }

    // Fires at the base tick rate. Once per window the meter hands back a
    // report; the display traffic stays outside of the lock.
    #[task(binds = TIM17, local = [ticker, lcd], shared = [meter], priority = 2)]
    fn base_tick(mut cx: base_tick::Context) {
        cx.local.ticker.clear_irq();

        let report = cx.shared.meter.lock(|meter| meter.tick());
        if let Some(report) = report {
            defmt::debug!(
                "WINDOW: frequency={} mode={}",
                report.frequency,
                report.mode
            );
            display::show(report.frequency, cx.local.lcd);
        }
    }

    #[task(local = [status_led])]
    fn blink(cx: blink::Context, on: bool, blinks: u8) {
        let time_on = 200.millis();
        let time_off_short = 200.millis();
        let time_off_long = 2.secs();

        if on {
            cx.local.status_led.on();
            blink::spawn_after(time_on, false, blinks).unwrap();
        } else {
            cx.local.status_led.off();
            if blinks > 1 {
                blink::spawn_after(time_off_short, true, blinks - 1).unwrap();
            } else {
                blink::spawn_after(time_off_long, true, BLINKS).unwrap();
            }
        }
    }
}
