//! Byte exchange over the Linux kernel's SPI API.
//!
//! To use this, you'll need to know which SPI device to select.
//! On Linux, you can use `ls /dev -1 | grep spidev` to figure it out!
//!
//! The chip selects are GPIOs driven by the array itself, so the kernel's own
//! chip select for the spidev node should be left unconnected.

use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use thiserror::Error;

use crate::io::ByteExchange;

/// An error emitted due to problems with the spidev connection.
#[derive(Debug, Error)]
pub enum SpidevError {
    #[error("Couldn't talk to the provided SPI path. See std::io::Error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

/// A spidev node, one byte at a time.
#[derive(Debug)]
pub struct SpidevExchange {
    spi: Spidev,
}

impl SpidevExchange {
    /// Opens a spidev node at 1 MHz in SPI mode 0.
    /// A valid SPI path usually looks like `/dev/spidev0.0`.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use max31855_quad::{SpidevExchange, ThermocoupleArray, Config};
    /// # use max31855_quad::{PinControl, PinId, PinMode, Level};
    /// # struct Gpio;
    /// # impl PinControl for Gpio {
    /// #     type Error = std::convert::Infallible;
    /// #     fn set_mode(&mut self, _: PinId, _: PinMode) -> Result<(), Self::Error> { Ok(()) }
    /// #     fn write(&mut self, _: PinId, _: Level) -> Result<(), Self::Error> { Ok(()) }
    /// # }
    /// use std::time::Duration;
    ///
    /// fn main() -> anyhow::Result<()> {
    ///     let spi = SpidevExchange::open("/dev/spidev0.0")?;
    ///     let mut array: ThermocoupleArray<_, _, 4> = ThermocoupleArray::new(Config::default(), Gpio, spi);
    ///
    ///     array.initialize()?;
    ///     array.power_on()?;
    ///     std::thread::sleep(Duration::from_millis(300));
    ///
    ///     let good = array.retrieve_all();
    ///     println!("{good} of 4 chips answered. Channel 1 is at {}° C.", array.thermocouple_celsius(1));
    ///
    ///     array.power_off()?;
    ///     Ok(())
    /// }
    /// ```
    pub fn open(spi_path: impl AsRef<str>) -> Result<Self, SpidevError> {
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(1_000_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        Self::open_with(spi_path, &options)
    }

    /// Opens a spidev node with caller-chosen options.
    pub fn open_with(spi_path: impl AsRef<str>, options: &SpidevOptions) -> Result<Self, SpidevError> {
        let mut spi = Spidev::open(spi_path.as_ref())?;
        spi.configure(options)?;
        tracing::debug!(path = spi_path.as_ref(), "opened spidev");
        Ok(Self { spi })
    }

    /// Hands back the underlying spidev connection.
    pub fn into_inner(self) -> Spidev {
        self.spi
    }
}

impl From<Spidev> for SpidevExchange {
    fn from(spi: Spidev) -> Self {
        Self { spi }
    }
}

impl ByteExchange for SpidevExchange {
    type Error = SpidevError;

    fn exchange(&mut self, byte: u8) -> Result<u8, SpidevError> {
        let tx = [byte];
        let mut rx = [0_u8; 1];
        {
            let mut transfer = SpidevTransfer::read_write(&tx, &mut rx);
            self.spi.transfer(&mut transfer)?;
        }
        Ok(rx[0])
    }
}
