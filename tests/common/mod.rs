//! A simulated quad-thermocouple board: pins that remember what was done to
//! them, and chips that answer with scripted words while selected and powered.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use max31855_quad::{ByteExchange, Level, PinControl, PinId, PinMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Mode(PinId, PinMode),
    Write(PinId, Level),
    Exchange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostError;

#[derive(Debug, Default)]
pub struct Board {
    pub power: PinId,
    pub events: Vec<Event>,
    pub modes: HashMap<PinId, PinMode>,
    pub levels: HashMap<PinId, Level>,
    /// The word each chip select answers with.
    pub chips: HashMap<PinId, u32>,
    /// Pins whose writes fail.
    pub broken_pins: Vec<PinId>,
    /// Fail the exchange while this chip select is low.
    pub broken_exchange: Option<PinId>,
    /// Position within the current 4-byte frame.
    cursor: usize,
}

impl Board {
    pub fn new(power: PinId) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            power,
            ..Default::default()
        }))
    }

    fn selected(&self) -> Vec<PinId> {
        self.chips
            .keys()
            .copied()
            .filter(|cs| self.levels.get(cs) == Some(&Level::Low))
            .collect()
    }

    fn powered(&self) -> bool {
        self.levels.get(&self.power) == Some(&Level::High)
    }
}

pub struct Pins(pub Rc<RefCell<Board>>);

impl PinControl for Pins {
    type Error = HostError;

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), HostError> {
        let mut board = self.0.borrow_mut();
        board.events.push(Event::Mode(pin, mode));
        board.modes.insert(pin, mode);
        Ok(())
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), HostError> {
        let mut board = self.0.borrow_mut();
        if board.broken_pins.contains(&pin) {
            return Err(HostError);
        }
        board.events.push(Event::Write(pin, level));
        if level == Level::Low && board.chips.contains_key(&pin) {
            board.cursor = 0;
        }
        board.levels.insert(pin, level);
        Ok(())
    }
}

pub struct Spi(pub Rc<RefCell<Board>>);

impl ByteExchange for Spi {
    type Error = HostError;

    fn exchange(&mut self, _byte: u8) -> Result<u8, HostError> {
        let mut board = self.0.borrow_mut();
        board.events.push(Event::Exchange);

        let selected = board.selected();
        if let Some(cs) = board.broken_exchange {
            if selected.contains(&cs) {
                return Err(HostError);
            }
        }

        // an unpowered or absent chip leaves MISO pulled high
        let word = match selected.as_slice() {
            [cs] if board.powered() => board.chips[cs],
            _ => u32::MAX,
        };
        let byte = word.to_be_bytes()[board.cursor % 4];
        board.cursor += 1;
        Ok(byte)
    }
}

/// Places a quarter-degree count in D31..D18.
pub fn tc_word(raw: i16) -> u32 {
    ((raw as u32) & 0x3FFF) << 18
}

/// Places a sixteenth-degree count in D15..D4.
pub fn amb_word(raw: i16) -> u32 {
    ((raw as u32) & 0x0FFF) << 4
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
