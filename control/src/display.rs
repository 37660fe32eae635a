//! Hand-off of finished estimates to the character display.

use core::fmt::Write;

use heapless::String;

/// Raw line buffer for the display.
pub const BUFFER_SIZE: usize = 25;

/// The character display collaborator.
///
/// The core treats the display as blocking and always succeeding; anything
/// fallible about the transport is the implementation's business.
pub trait Screen {
    fn clear(&mut self);
    fn print(&mut self, text: &str);
}

/// Render the estimate the way it appears on the display, e.g. `440.25 Hz`.
///
/// A window without a signal reads as a legitimate zero. The float is
/// formatted with the shortest representation that reads back exactly;
/// anything past the buffer would be past the edge of the display anyway.
pub fn format_frequency(frequency: Option<f64>) -> String<BUFFER_SIZE> {
    let mut text = String::new();
    let _ = write!(&mut text, "{} Hz", frequency.unwrap_or(0.0));
    text
}

/// Replace whatever the display shows with the new estimate.
pub fn show(frequency: Option<f64>, screen: &mut impl Screen) {
    screen.clear();
    screen.print(&format_frequency(frequency));
}
