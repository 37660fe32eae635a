use crate::system::capture::Capture;

/// Poll the capture flag for roughly a second, draining every edge.
///
/// Returns how many edges arrived and how many capture ticks they took,
/// i.e. one measurement window as the accumulator would see it.
pub fn drain_edges_for_a_second(capture: &mut Capture) -> (u32, u32) {
    let mut edges: u32 = 0;
    let mut ticks: u32 = 0;
    for _ in 0..1000 {
        while capture.edge_pending() {
            ticks = ticks.wrapping_add(capture.seize());
            edges += 1;
        }
        cortex_m::asm::delay(480_000_000 / 1000);
    }
    (edges, ticks)
}
