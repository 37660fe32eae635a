//! Accumulate capture deltas of the measured input for averaging.

/// Running totals of the currently open measurement window.
///
/// Every rising edge of the measured input contributes the number of
/// filling-counter ticks elapsed since the previous edge. The estimator
/// later averages a whole window worth of edges as
/// `tick_sum / edge_count`, so low input frequencies still resolve well.
///
/// The fields are only ever incremented by `record_edge` and only ever
/// zeroed by `take_window`. The two entry points run in different
/// interrupt contexts and must not interleave; mutual exclusion is the
/// caller's job.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Accumulator {
    tick_sum: u32,
    edge_count: u32,
}

/// One drained measurement window, ready for estimation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub tick_sum: u32,
    pub edge_count: u32,
}

impl Accumulator {
    /// Fold one edge into the open window.
    ///
    /// Runs at the rate of the measured signal, so it is kept to two
    /// integer additions. No floats, no I/O.
    pub fn record_edge(&mut self, delta_ticks: u32) {
        self.tick_sum = self.tick_sum.wrapping_add(delta_ticks);
        self.edge_count = self.edge_count.saturating_add(1);
    }

    /// Close the window: return its totals and open a fresh one.
    ///
    /// Snapshot and reset are a single step, so that under the caller's
    /// mutual exclusion no edge can land between them. Consecutive windows
    /// partition the tick stream without gap or overlap.
    pub fn take_window(&mut self) -> Window {
        let window = Window {
            tick_sum: self.tick_sum,
            edge_count: self.edge_count,
        };
        self.tick_sum = 0;
        self.edge_count = 0;
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_edges_are_recorded_it_sums_ticks_and_counts_them() {
        let mut accumulator = Accumulator::default();
        accumulator.record_edge(256);
        accumulator.record_edge(260);
        accumulator.record_edge(252);
        let window = accumulator.take_window();
        assert_eq!(window.tick_sum, 768);
        assert_eq!(window.edge_count, 3);
    }

    #[test]
    fn when_window_is_taken_it_starts_a_fresh_one() {
        let mut accumulator = Accumulator::default();
        accumulator.record_edge(100);
        let _ = accumulator.take_window();
        let window = accumulator.take_window();
        assert_eq!(window.tick_sum, 0);
        assert_eq!(window.edge_count, 0);
    }

    #[test]
    fn consecutive_windows_partition_the_tick_stream() {
        let mut accumulator = Accumulator::default();
        let deltas = [250, 251, 249, 250, 2000, 13, 250, 250];
        let mut drained = 0;
        for (i, delta) in deltas.iter().enumerate() {
            accumulator.record_edge(*delta);
            if i % 3 == 2 {
                drained += accumulator.take_window().tick_sum;
            }
        }
        drained += accumulator.take_window().tick_sum;
        assert_eq!(drained, deltas.iter().sum::<u32>());
    }
}
