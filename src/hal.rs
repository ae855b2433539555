use embedded_hal::spi::SpiBus;

use crate::io::ByteExchange;

/// Byte exchange over any `embedded-hal` SPI bus.
///
/// Takes the bus rather than an `SpiDevice`, since the array drives its chip
/// selects itself. Please ensure the bus is in SPI mode 0, aka (0, 0).
#[derive(Debug)]
pub struct HalBus<B> {
    bus: B,
}

impl<B: SpiBus<u8>> HalBus<B> {
    /// Wraps an SPI bus.
    pub fn new(bus: B) -> Self {
        bus.into()
    }

    /// Gives the bus back.
    pub fn into_inner(self) -> B {
        self.bus
    }
}

impl<B: SpiBus<u8>> From<B> for HalBus<B> {
    fn from(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: SpiBus<u8>> ByteExchange for HalBus<B> {
    type Error = B::Error;

    fn exchange(&mut self, byte: u8) -> Result<u8, B::Error> {
        let mut buffer = [byte];
        self.bus.transfer_in_place(&mut buffer)?;
        self.bus.flush()?;
        Ok(buffer[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{Error, ErrorKind, ErrorType};

    #[test]
    fn mock_bus() {
        #[derive(Debug, PartialEq)]
        struct MockError;

        impl Error for MockError {
            fn kind(&self) -> ErrorKind {
                ErrorKind::Other
            }
        }

        struct MockBus {
            response: [u8; 4],
            sent: usize,
            flushed: usize,
        }

        impl ErrorType for MockBus {
            type Error = MockError;
        }

        impl SpiBus<u8> for MockBus {
            fn read(&mut self, _words: &mut [u8]) -> Result<(), MockError> {
                panic!("Not an expected operation")
            }

            fn write(&mut self, _words: &[u8]) -> Result<(), MockError> {
                panic!("Not an expected operation")
            }

            fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), MockError> {
                panic!("Not an expected operation")
            }

            fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), MockError> {
                assert_eq!(words.len(), 1);
                let byte = self.response.get(self.sent).copied().ok_or(MockError)?;
                words[0] = byte;
                self.sent += 1;
                Ok(())
            }

            fn flush(&mut self) -> Result<(), MockError> {
                self.flushed += 1;
                Ok(())
            }
        }

        let mut bus = HalBus::new(MockBus {
            response: [0x06, 0x40, 0x19, 0x00],
            sent: 0,
            flushed: 0,
        });

        assert_eq!(bus.exchange(0), Ok(0x06));
        assert_eq!(bus.exchange(0), Ok(0x40));
        assert_eq!(bus.exchange(0), Ok(0x19));
        assert_eq!(bus.exchange(0), Ok(0x00));
        assert_eq!(bus.exchange(0), Err(MockError));

        let inner = bus.into_inner();
        assert_eq!(inner.flushed, 4);
    }
}
