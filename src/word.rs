//! Bit-level decoding of the 32-bit MAX31855 response.
//!
//! Refer to page 10 of [Maxim Integrated's MAX31855 datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/MAX31855.pdf)
//! for the memory map this module follows:
//!
//! | bits   | meaning                                   |
//! |--------|-------------------------------------------|
//! | 31..18 | thermocouple temperature, 14-bit, 1/4 °C  |
//! | 16     | fault (any)                               |
//! | 15..4  | internal temperature, 12-bit, 1/16 °C     |
//! | 2      | short to VCC                              |
//! | 1      | short to GND                              |
//! | 0      | open circuit                              |

/// Short-to-VCC fault bit.
pub const FAULT_SHORT_VCC: u32 = 0x04;
/// Short-to-GND fault bit.
pub const FAULT_SHORT_GND: u32 = 0x02;
/// Open-circuit (disconnected thermocouple) fault bit.
pub const FAULT_DISCONNECT: u32 = 0x01;

/// The fault state of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The reading can be trusted.
    #[default]
    None,
    /// The thermocouple is shorted to VCC.
    ShortToSupply,
    /// The thermocouple is shorted to GND.
    ShortToGround,
    /// No thermocouple is attached.
    Disconnected,
    /// The chip never answered sensibly: the word was all zeroes or all ones,
    /// or the host failed mid-transfer.
    BusError,
}

impl Fault {
    /// Classifies the low three bits of a response word.
    ///
    /// The chip normally raises at most one of them. When several are set,
    /// short-to-VCC wins over short-to-GND, which wins over open circuit.
    pub const fn from_word(word: u32) -> Self {
        if word & FAULT_SHORT_VCC != 0 {
            Fault::ShortToSupply
        } else if word & FAULT_SHORT_GND != 0 {
            Fault::ShortToGround
        } else if word & FAULT_DISCONNECT != 0 {
            Fault::Disconnected
        } else {
            Fault::None
        }
    }

    /// `true` for [`Fault::None`].
    pub const fn is_none(&self) -> bool {
        matches!(self, Fault::None)
    }
}

/// The last decoded state of one channel, as raw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channel {
    /// Thermocouple temperature in quarter degrees Celsius.
    pub thermocouple: i16,
    /// Cold-junction temperature in sixteenths of a degree Celsius.
    pub ambient: i16,
    /// Fault classification.
    pub fault: Fault,
}

/// The outcome of decoding one response word.
pub type Decoded = Result<Channel, BusError>;

/// A response word that can't have come from a powered chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("read {word:#010x} from the bus, the chip is unpowered or missing")]
pub struct BusError {
    /// The word that was read.
    pub word: u32,
}

/// Decodes a full 32-bit response.
///
/// ```
/// use max31855_quad::{decode, Fault};
///
/// let channel = decode(400 << 18).unwrap();
/// assert_eq!(channel.thermocouple, 400);
/// assert_eq!(channel.fault, Fault::None);
///
/// assert!(decode(0xFFFF_FFFF).is_err());
/// ```
pub const fn decode(word: u32) -> Decoded {
    if word == 0 || word == u32::MAX {
        return Err(BusError { word });
    }

    Ok(Channel {
        thermocouple: thermocouple_bits(word),
        ambient: ambient_bits(word),
        fault: Fault::from_word(word),
    })
}

/// Extracts D31..D18 and sign-extends from bit 13.
const fn thermocouple_bits(word: u32) -> i16 {
    let raw = ((word >> 18) & 0x3FFF) as u16;
    // park bit 13 in the sign bit, then shift back arithmetically
    ((raw << 2) as i16) >> 2
}

/// Extracts D15..D4 and sign-extends from bit 11.
const fn ambient_bits(word: u32) -> i16 {
    let raw = ((word >> 4) & 0x0FFF) as u16;
    ((raw << 4) as i16) >> 4
}

/// Whole degrees Celsius from quarter-degree counts, truncating toward zero.
pub const fn quarter_to_celsius(raw: i16) -> i16 {
    raw / 4
}

/// Whole degrees Fahrenheit from quarter-degree counts.
///
/// Computed as `raw * 9 / 5 / 4 + 32`, each division truncating in turn.
pub const fn quarter_to_fahrenheit(raw: i16) -> i16 {
    (raw as i32 * 9 / 5 / 4 + 32) as i16
}

/// Whole degrees Celsius from sixteenth-degree counts, truncating toward zero.
pub const fn sixteenth_to_celsius(raw: i16) -> i16 {
    raw / 16
}

/// Whole degrees Fahrenheit from sixteenth-degree counts.
///
/// Computed as `raw * 9 / 5 / 16 + 32`, each division truncating in turn.
pub const fn sixteenth_to_fahrenheit(raw: i16) -> i16 {
    (raw as i32 * 9 / 5 / 16 + 32) as i16
}
