//! Character LCD behind a PCF8574 I2C expander.
//!
//! The usual 16x2 HD44780 wired through the 8-bit expander in 4-bit mode:
//! the high nibble of each expander write carries data, the low nibble the
//! register select, enable and backlight lines.

use cortex_m::asm;

use freqmeter_control::display::Screen;

use crate::system::hal::i2c::I2c;
use crate::system::hal::pac::I2C1;
use crate::system::hal::prelude::*;

const ADDRESS: u8 = 0x27;

const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0x04;
const REGISTER_SELECT: u8 = 0x01;

// Delays in core cycles at 480 MHz.
const PULSE_DELAY: u32 = 24_000; // 50 us
const INIT_DELAY: u32 = 2_400_000; // 5 ms
const CLEAR_DELAY: u32 = 960_000; // 2 ms

pub struct Lcd {
    i2c: I2c<I2C1>,
}

impl Lcd {
    pub fn new(i2c: I2c<I2C1>) -> Self {
        Self { i2c }
    }

    /// Bring the controller into 4-bit mode, two lines, cursor off.
    ///
    /// The magic sequence is prescribed by the HD44780 datasheet for
    /// entering 4-bit operation from an unknown state.
    pub fn init(&mut self) {
        asm::delay(INIT_DELAY * 10); // power-up grace
        self.write_nibble(0x30);
        asm::delay(INIT_DELAY);
        self.write_nibble(0x30);
        asm::delay(INIT_DELAY);
        self.write_nibble(0x30);
        asm::delay(INIT_DELAY);
        self.write_nibble(0x20);

        self.command(0x28); // 2 lines, 5x8 font
        self.command(0x0C); // display on, cursor off
        self.command(0x06); // entry mode, increment
        self.command(0x01); // clear
        asm::delay(CLEAR_DELAY);
    }

    fn write_nibble(&mut self, data: u8) {
        // Latch on the falling edge of the enable line.
        self.i2c
            .write(ADDRESS, &[data | BACKLIGHT | ENABLE])
            .unwrap();
        asm::delay(PULSE_DELAY);
        self.i2c.write(ADDRESS, &[data | BACKLIGHT]).unwrap();
        asm::delay(PULSE_DELAY);
    }

    fn send(&mut self, byte: u8, to_data_register: bool) {
        let select = if to_data_register {
            REGISTER_SELECT
        } else {
            0x00
        };
        self.write_nibble((byte & 0xF0) | select);
        self.write_nibble(((byte << 4) & 0xF0) | select);
    }

    fn command(&mut self, command: u8) {
        self.send(command, false);
    }

    fn write_char(&mut self, character: u8) {
        self.send(character, true);
    }
}

impl Screen for Lcd {
    fn clear(&mut self) {
        self.command(0x01);
        asm::delay(CLEAR_DELAY);
    }

    fn print(&mut self, text: &str) {
        for byte in text.bytes() {
            self.write_char(byte);
        }
    }
}
