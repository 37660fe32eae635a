#![no_std]
#![no_main]

use freqmeter_firmware as _; // Panic handler.

#[defmt_test::tests]
mod tests {
    use freqmeter_control::accumulator::Window;
    use freqmeter_control::estimator::Estimator;
    use freqmeter_firmware::system::capture::{self, Capture};
    use freqmeter_firmware::system::System;
    use freqmeter_firmware::testlib::drain_edges_for_a_second;

    #[init]
    fn init() -> Capture {
        let cp = cortex_m::Peripherals::take().unwrap();
        let dp = daisy::pac::Peripherals::take().unwrap();
        System::init(cp, dp).capture
    }

    #[test]
    fn edges_of_a_1_khz_input_are_captured(capture: &mut Capture) {
        defmt::info!("Feed a 1 kHz square wave into the input jack");
        let (edges, ticks) = drain_edges_for_a_second(capture);
        defmt::info!("Captured edges={} ticks={}", edges, ticks);
        defmt::assert!(edges > 900 && edges < 1100);

        let estimator = Estimator::new(
            f64::from(capture::CLOCK_HZ) / f64::from(capture::PRESCALER),
        );
        let frequency = estimator
            .estimate(Window {
                tick_sum: ticks,
                edge_count: edges,
            })
            .unwrap();
        defmt::info!("Estimated frequency={}", frequency);
        defmt::assert!(frequency > 900.0 && frequency < 1100.0);
        defmt::info!("OK");
    }

    #[test]
    fn unplugged_input_yields_an_empty_window(capture: &mut Capture) {
        defmt::info!("Unplug the input jack");
        // Let any tail of the previous signal drain away first.
        let _ = drain_edges_for_a_second(capture);
        let (edges, _) = drain_edges_for_a_second(capture);
        defmt::assert!(edges == 0);
        defmt::info!("OK");
    }
}
