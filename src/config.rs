use crate::io::PinId;

/// The most chips the board can address.
pub const MAX_CHANNELS: usize = 4;

/// Power-enable pin on the reference board.
pub const DEFAULT_POWER: PinId = 40;
/// Chip-select pins on the reference board, channel 1 first.
pub const DEFAULT_CHIP_SELECTS: [PinId; MAX_CHANNELS] = [39, 38, 37, 36];

/// Pin assignments for a thermocouple array.
///
/// Starts out with the reference board's wiring; override what differs.
///
/// ```
/// use max31855_quad::Config;
///
/// let config = Config::new(12).chip_selects(&[5, 6]);
/// assert_eq!(config.chip_selects, [5, 6, 37, 36]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Pin driving the shared power-enable gate.
    pub power: PinId,
    /// One chip-select pin per channel.
    pub chip_selects: [PinId; MAX_CHANNELS],
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_POWER)
    }
}

impl Config {
    /// A configuration with the given power pin and the default chip selects.
    pub const fn new(power: PinId) -> Self {
        Self {
            power,
            chip_selects: DEFAULT_CHIP_SELECTS,
        }
    }

    /// Overrides the leading chip selects, channel 1 first. Channels past the
    /// end of `pins` keep their defaults; anything past the fourth pin is ignored.
    pub fn chip_selects(mut self, pins: &[PinId]) -> Self {
        self.chip_selects
            .iter_mut()
            .zip(pins)
            .for_each(|(slot, pin)| *slot = *pin);
        self
    }

    /// Overrides the chip select of one channel (1-based).
    /// An out-of-range channel leaves the configuration as it was.
    pub fn chip_select(mut self, channel: usize, pin: PinId) -> Self {
        if let Some(slot) = channel
            .checked_sub(1)
            .and_then(|i| self.chip_selects.get_mut(i))
        {
            *slot = pin;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_board() {
        let config = Config::default();
        assert_eq!(config.power, 40);
        assert_eq!(config.chip_selects, [39, 38, 37, 36]);
    }

    #[test]
    fn trailing_chip_selects_keep_defaults() {
        assert_eq!(Config::new(1).chip_selects(&[]).chip_selects, [39, 38, 37, 36]);
        assert_eq!(Config::new(1).chip_selects(&[2]).chip_selects, [2, 38, 37, 36]);
        assert_eq!(
            Config::new(1).chip_selects(&[2, 3, 4, 5, 6]).chip_selects,
            [2, 3, 4, 5]
        );
    }

    #[test]
    fn single_chip_select() {
        let config = Config::default().chip_select(3, 9);
        assert_eq!(config.chip_selects, [39, 38, 9, 36]);

        assert_eq!(Config::default().chip_select(0, 9), Config::default());
        assert_eq!(Config::default().chip_select(5, 9), Config::default());
    }
}
