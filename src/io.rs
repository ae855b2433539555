//! What the driver needs from the host: pins, a byte-wide SPI exchange, and
//! somewhere to send diagnostics.

use core::fmt::Debug;

/// A host GPIO number.
pub type PinId = u8;

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// High impedance; releases the line for other bus users.
    Input,
    /// Driven by the host.
    Output,
}

/// Pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Chip selected / power off.
    Low,
    /// Chip deselected / power on.
    High,
}

/// Direction and level control over numbered GPIO pins.
pub trait PinControl {
    /// Error reported by the host.
    type Error: Debug;

    /// Sets the direction of `pin`.
    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error>;

    /// Drives `pin` to `level`.
    fn write(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error>;
}

/// One blocking, full-duplex 8-bit SPI transfer.
pub trait ByteExchange {
    /// Error reported by the host.
    type Error: Debug;

    /// Clocks `byte` out while clocking one byte in.
    fn exchange(&mut self, byte: u8) -> Result<u8, Self::Error>;
}

impl<T: PinControl + ?Sized> PinControl for &mut T {
    type Error = T::Error;

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
        (**self).set_mode(pin, mode)
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
        (**self).write(pin, level)
    }
}

impl<T: ByteExchange + ?Sized> ByteExchange for &mut T {
    type Error = T::Error;

    fn exchange(&mut self, byte: u8) -> Result<u8, Self::Error> {
        (**self).exchange(byte)
    }
}

/// Receives a message and a value whenever the driver is misused or a chip
/// misbehaves.
///
/// Don't report through a transport that isn't up yet: the driver only calls
/// this after construction, but a reader built early in boot can still beat
/// the serial port to it.
pub trait Diagnostics {
    /// Handles one report.
    fn report(&self, message: &str, value: i32);
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
    #[inline(always)]
    fn report(&self, _message: &str, _value: i32) {}
}

/// Turns every report into a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, message: &str, value: i32) {
        tracing::warn!(value, "max31855 assert triggered: {message}");
    }
}

impl<F: Fn(&str, i32)> Diagnostics for F {
    fn report(&self, message: &str, value: i32) {
        self(message, value)
    }
}
