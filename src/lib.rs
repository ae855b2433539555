//! # max31855_quad
//!
//! A driver for up to four MAX31855 thermocouple digitizers that share one SPI
//! bus, each with its own chip select, all behind a single power-enable gate.
//!
//! ## Usage
//!
//! The driver doesn't own any hardware. Hand it something that implements
//! [`PinControl`] for the power and chip-select GPIOs and something that
//! implements [`ByteExchange`] for the SPI bus (see [`SpidevExchange`] on Linux,
//! or `HalBus` with the `embedded-hal` feature).
//!
//! ```
//! use max31855_quad::{ByteExchange, Config, Fault, Level, PinControl, PinId, PinMode, ThermocoupleArray};
//! use std::convert::Infallible;
//!
//! // Pins nobody looks at, and a bus where a single chip reports 100 °C.
//! struct Pins;
//!
//! impl PinControl for Pins {
//!     type Error = Infallible;
//!     fn set_mode(&mut self, _: PinId, _: PinMode) -> Result<(), Infallible> { Ok(()) }
//!     fn write(&mut self, _: PinId, _: Level) -> Result<(), Infallible> { Ok(()) }
//! }
//!
//! struct Bus(std::vec::IntoIter<u8>);
//!
//! impl ByteExchange for Bus {
//!     type Error = Infallible;
//!     fn exchange(&mut self, _: u8) -> Result<u8, Infallible> {
//!         Ok(self.0.next().unwrap_or(0))
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let bus = Bus((400_u32 << 18).to_be_bytes().to_vec().into_iter());
//!     let mut array: ThermocoupleArray<_, _, 1> = ThermocoupleArray::new(Config::default(), Pins, bus);
//!
//!     array.initialize()?;
//!     array.power_on()?;
//!     // a real board needs ~300ms here
//!     assert_eq!(array.retrieve_all(), 1);
//!     array.power_off()?;
//!
//!     assert_eq!(array.thermocouple_celsius(1), 100);
//!     assert_eq!(array.fault(1), Fault::None);
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

mod array;
mod config;
pub mod io;
mod word;

#[cfg(feature = "linux")]
mod linux;

#[cfg(feature = "embedded-hal")]
mod hal;

use thiserror::Error;

pub use array::ThermocoupleArray;
pub use config::{Config, DEFAULT_CHIP_SELECTS, DEFAULT_POWER, MAX_CHANNELS};
pub use io::{
    ByteExchange, Diagnostics, Level, NoDiagnostics, PinControl, PinId, PinMode,
    TracingDiagnostics,
};
pub use word::{
    decode, quarter_to_celsius, quarter_to_fahrenheit, sixteenth_to_celsius,
    sixteenth_to_fahrenheit, BusError, Channel, Decoded, Fault, FAULT_DISCONNECT,
    FAULT_SHORT_GND, FAULT_SHORT_VCC,
};

#[cfg(feature = "linux")]
pub use linux::{SpidevError, SpidevExchange};

#[cfg(feature = "embedded-hal")]
pub use hal::HalBus;

/// An error emitted when the host refuses to change a pin.
#[derive(Debug, Error)]
pub enum Error<E: core::fmt::Debug> {
    #[error("Couldn't set pin {pin} to {mode:?}. Host reported: {cause:?}")]
    PinMode { pin: PinId, mode: PinMode, cause: E },
    #[error("Couldn't drive pin {pin} {level:?}. Host reported: {cause:?}")]
    PinLevel { pin: PinId, level: Level, cause: E },
}
