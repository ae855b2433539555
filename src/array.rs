use crate::config::{Config, MAX_CHANNELS};
use crate::io::{ByteExchange, Diagnostics, Level, NoDiagnostics, PinControl, PinId, PinMode};
use crate::word::{self, Channel, Fault};
use crate::Error;

/// Up to four MAX31855 chips behind one power gate, sharing an SPI bus.
///
/// `N` is the number of chips fitted, 1 through 4. Channels are numbered
/// from 1 at this boundary.
///
/// The usual cycle is [`initialize`](Self::initialize) once, then
/// [`power_on`](Self::power_on), wait ~300ms for the first conversion,
/// [`retrieve_all`](Self::retrieve_all), read the accessors, and
/// [`power_off`](Self::power_off) to save power until the next sample.
#[derive(Debug)]
pub struct ThermocoupleArray<P, S, const N: usize, D = NoDiagnostics> {
    pins: P,
    spi: S,
    diagnostics: D,
    config: Config,
    channels: [Channel; N],
}

impl<P, S, const N: usize> ThermocoupleArray<P, S, N>
where
    P: PinControl,
    S: ByteExchange,
{
    /// Creates a reader without diagnostics. Touches no pins.
    pub fn new(config: Config, pins: P, spi: S) -> Self {
        Self::with_diagnostics(config, pins, spi, NoDiagnostics)
    }
}

impl<P, S, const N: usize, D> ThermocoupleArray<P, S, N, D>
where
    P: PinControl,
    S: ByteExchange,
    D: Diagnostics,
{
    const CHANNELS_IN_RANGE: () = assert!(
        N >= 1 && N <= MAX_CHANNELS,
        "a thermocouple array has 1 to 4 channels"
    );

    /// Creates a reader that sends misuse and bus failures to `diagnostics`.
    /// Touches no pins.
    pub fn with_diagnostics(config: Config, pins: P, spi: S, diagnostics: D) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHANNELS_IN_RANGE;

        Self {
            pins,
            spi,
            diagnostics,
            config,
            channels: [Channel::default(); N],
        }
    }

    /// Makes the power and chip-select pins outputs, deselects every chip,
    /// switches power off, and forgets every reading.
    pub fn initialize(&mut self) -> Result<(), Error<P::Error>> {
        tracing::trace!(power = self.config.power, "initializing thermocouple array");

        self.set_mode(self.config.power, PinMode::Output)?;
        for cs in self.chip_selects() {
            self.set_mode(cs, PinMode::Output)?;
            self.write(cs, Level::High)?;
        }
        self.write(self.config.power, Level::Low)?;

        self.channels = [Channel::default(); N];
        Ok(())
    }

    /// Switches the chips on.
    ///
    /// The first conversion takes around 300ms; wait that long before calling
    /// [`retrieve_all`](Self::retrieve_all) or expect bus errors.
    pub fn power_on(&mut self) -> Result<(), Error<P::Error>> {
        tracing::trace!("powering thermocouple array on");

        self.deselect_all()?;
        self.write(self.config.power, Level::High)
    }

    /// Switches the chips off and deselects them. Safe to call repeatedly,
    /// and [`power_on`](Self::power_on) may follow.
    pub fn power_off(&mut self) -> Result<(), Error<P::Error>> {
        tracing::trace!("powering thermocouple array off");

        self.write(self.config.power, Level::Low)?;
        self.deselect_all()
    }

    /// Switches the chips off and turns the chip selects into inputs so other
    /// devices can use the bus. Call [`initialize`](Self::initialize) before
    /// using the array again.
    pub fn teardown(&mut self) -> Result<(), Error<P::Error>> {
        tracing::trace!("releasing thermocouple array");

        self.write(self.config.power, Level::Low)?;
        for cs in self.chip_selects() {
            self.set_mode(cs, PinMode::Input)?;
        }
        Ok(())
    }

    /// Reads every chip in channel order and stores what it reports.
    ///
    /// Returns how many channels ended up without a fault. A chip answering
    /// all zeroes or all ones, or a host failure during its transfer, marks
    /// the channel [`Fault::BusError`] and keeps its previous temperatures;
    /// the remaining channels are still read.
    pub fn retrieve_all(&mut self) -> usize {
        for i in 0..N {
            let idx = i + 1;
            let word = match self.read_word(self.config.chip_selects[i]) {
                Ok(word) => word,
                Err(reason) => {
                    tracing::warn!(channel = idx, reason, "transfer failed");
                    self.diagnostics.report(reason, idx as i32);
                    self.channels[i].fault = Fault::BusError;
                    continue;
                }
            };

            match word::decode(word) {
                Ok(channel) => {
                    tracing::debug!(
                        channel = idx,
                        thermocouple = channel.thermocouple,
                        ambient = channel.ambient,
                        fault = ?channel.fault,
                        "decoded"
                    );
                    self.channels[i] = channel;
                }
                Err(e) => {
                    tracing::warn!(channel = idx, "{e}");
                    self.diagnostics.report("bus error on channel", idx as i32);
                    self.channels[i].fault = Fault::BusError;
                }
            }
        }

        self.channels.iter().filter(|c| c.fault.is_none()).count()
    }

    /// Thermocouple temperature in whole degrees Celsius, or 0 for a bad index.
    pub fn thermocouple_celsius(&self, idx: usize) -> i16 {
        self.lookup(idx)
            .map_or(0, |c| word::quarter_to_celsius(c.thermocouple))
    }

    /// Thermocouple temperature in whole degrees Fahrenheit, or 0 for a bad index.
    pub fn thermocouple_fahrenheit(&self, idx: usize) -> i16 {
        self.lookup(idx)
            .map_or(0, |c| word::quarter_to_fahrenheit(c.thermocouple))
    }

    /// Cold-junction (board) temperature in whole degrees Celsius, or 0 for a bad index.
    pub fn ambient_celsius(&self, idx: usize) -> i16 {
        self.lookup(idx)
            .map_or(0, |c| word::sixteenth_to_celsius(c.ambient))
    }

    /// Cold-junction (board) temperature in whole degrees Fahrenheit, or 0 for a bad index.
    pub fn ambient_fahrenheit(&self, idx: usize) -> i16 {
        self.lookup(idx)
            .map_or(0, |c| word::sixteenth_to_fahrenheit(c.ambient))
    }

    /// Thermocouple temperature in quarter degrees, or 0 for a bad index.
    pub fn thermocouple_raw(&self, idx: usize) -> i16 {
        self.lookup(idx).map_or(0, |c| c.thermocouple)
    }

    /// Cold-junction temperature in sixteenths of a degree, or 0 for a bad index.
    pub fn ambient_raw(&self, idx: usize) -> i16 {
        self.lookup(idx).map_or(0, |c| c.ambient)
    }

    /// Fault state of a channel. A bad index reads as [`Fault::BusError`].
    pub fn fault(&self, idx: usize) -> Fault {
        self.lookup(idx).map_or(Fault::BusError, |c| c.fault)
    }

    /// Everything stored for a channel, or `None` for a bad index.
    pub fn channel(&self, idx: usize) -> Option<Channel> {
        self.lookup(idx).copied()
    }

    /// Number of channels, `N`.
    pub const fn channel_count(&self) -> usize {
        N
    }

    /// The pin assignments in use.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the host peripherals and diagnostics sink.
    pub fn release(self) -> (P, S, D) {
        (self.pins, self.spi, self.diagnostics)
    }

    fn lookup(&self, idx: usize) -> Option<&Channel> {
        let channel = idx.checked_sub(1).and_then(|i| self.channels.get(i));
        if channel.is_none() {
            self.diagnostics.report("invalid channel index", idx as i32);
        }
        channel
    }

    fn chip_selects(&self) -> [PinId; N] {
        let mut pins = [0; N];
        pins.copy_from_slice(&self.config.chip_selects[..N]);
        pins
    }

    fn deselect_all(&mut self) -> Result<(), Error<P::Error>> {
        for cs in self.chip_selects() {
            self.write(cs, Level::High)?;
        }
        Ok(())
    }

    /// Selects one chip, clocks four bytes out of it MSB first, and deselects it.
    fn read_word(&mut self, cs: PinId) -> Result<u32, &'static str> {
        self.pins
            .write(cs, Level::Low)
            .map_err(|e| log_host_error("chip select failed on channel", e))?;

        let mut buf = [0_u8; 4];
        let mut exchanged = Ok(());
        for byte in buf.iter_mut() {
            match self.spi.exchange(0) {
                Ok(b) => *byte = b,
                Err(e) => {
                    exchanged = Err(log_host_error("spi exchange failed on channel", e));
                    break;
                }
            }
        }

        // deselect even after a failed exchange so the next chip sees a clean bus
        let deselected = self
            .pins
            .write(cs, Level::High)
            .map_err(|e| log_host_error("chip deselect failed on channel", e));

        exchanged.and(deselected)?;
        Ok(u32::from_be_bytes(buf))
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), Error<P::Error>> {
        tracing::trace!(pin, ?mode, "pin mode");
        self.pins
            .set_mode(pin, mode)
            .map_err(|cause| Error::PinMode { pin, mode, cause })
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), Error<P::Error>> {
        tracing::trace!(pin, ?level, "pin level");
        self.pins
            .write(pin, level)
            .map_err(|cause| Error::PinLevel { pin, level, cause })
    }
}

fn log_host_error<E: core::fmt::Debug>(reason: &'static str, error: E) -> &'static str {
    tracing::debug!(?error, "{reason}");
    reason
}
