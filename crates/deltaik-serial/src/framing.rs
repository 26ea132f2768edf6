//! Byte-at-a-time decoder for the serial command protocol.
//!
//! A move is sent as `$<x>,<y>,<z>*`, each field a decimal integer in
//! thousandths of an inch with an optional leading `-`. Between frames a
//! single `y` confirms the pending move and `n` cancels it. Whitespace
//! between frames is ignored; inside a frame every byte must belong to the
//! grammar.

use core::fmt;
use deltaik_core::{Point, table::Axis};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("unexpected '{}' in {field} field", .byte.escape_ascii())]
    UnexpectedByte { field: Axis, byte: u8 },

    #[error("{field} field overflows")]
    Overflow { field: Axis },

    #[error("frame restarted during {field} field")]
    Interrupted { field: Axis },
}

/// A target position in integer thousandths of an inch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Thou {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Thou {
    pub fn to_point(self) -> Point {
        Point::from_thou(self.x.into(), self.y.into(), self.z.into())
    }
}

impl fmt::Display for Thou {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A complete `$x,y,z*` frame
    Target(Thou),
    Confirm,
    Cancel,
    /// A byte outside any frame that means nothing
    Stray(u8),
    Rejected(FrameError),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Target(thou) => write!(f, "target {thou}"),
            Event::Confirm => f.write_str("confirm"),
            Event::Cancel => f.write_str("cancel"),
            Event::Stray(byte) => write!(f, "stray '{}'", byte.escape_ascii()),
            Event::Rejected(err) => write!(f, "rejected: {err}"),
        }
    }
}

/// A field being read: its magnitude so far and sign
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Field {
    magnitude: i32,
    negative: bool,
    started: bool,
}

impl Field {
    fn push(self, field: Axis, byte: u8) -> Result<Self, FrameError> {
        match byte {
            b'0'..=b'9' => {
                let magnitude = self
                    .magnitude
                    .checked_mul(10)
                    .and_then(|m| m.checked_add(i32::from(byte - b'0')))
                    .ok_or(FrameError::Overflow { field })?;
                Ok(Self {
                    magnitude,
                    started: true,
                    ..self
                })
            }
            b'-' if !self.started => Ok(Self {
                negative: true,
                started: true,
                ..self
            }),
            byte => Err(FrameError::UnexpectedByte { field, byte }),
        }
    }

    /// An empty field reads as zero.
    fn value(self) -> i32 {
        if self.negative {
            -self.magnitude
        } else {
            self.magnitude
        }
    }
}

/// Decoder state between bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameState {
    #[default]
    Idle,
    X(Field),
    Y { x: i32, field: Field },
    Z { x: i32, y: i32, field: Field },
}

impl FrameState {
    /// The field currently being read, if inside a frame
    pub fn field(&self) -> Option<Axis> {
        match self {
            FrameState::Idle => None,
            FrameState::X(_) => Some(Axis::X),
            FrameState::Y { .. } => Some(Axis::Y),
            FrameState::Z { .. } => Some(Axis::Z),
        }
    }

    pub fn step(self, byte: u8) -> (Self, Option<Event>) {
        use FrameState::*;

        let start = X(Field::default());
        match (self, byte) {
            (Idle, b'$') => (start, None),
            (Idle, b'y') => (Idle, Some(Event::Confirm)),
            (Idle, b'n') => (Idle, Some(Event::Cancel)),
            (Idle, b) if b.is_ascii_whitespace() => (Idle, None),
            (Idle, b) => (Idle, Some(Event::Stray(b))),

            (X(field), b',') => (
                Y {
                    x: field.value(),
                    field: Field::default(),
                },
                None,
            ),
            (Y { x, field }, b',') => (
                Z {
                    x,
                    y: field.value(),
                    field: Field::default(),
                },
                None,
            ),
            (Z { x, y, field }, b'*') => {
                let z = field.value();
                (Idle, Some(Event::Target(Thou { x, y, z })))
            }

            (X(field), b) => match field.push(Axis::X, b) {
                Ok(field) => (X(field), None),
                Err(err) => self.reject(b, err),
            },
            (Y { x, field }, b) => match field.push(Axis::Y, b) {
                Ok(field) => (Y { x, field }, None),
                Err(err) => self.reject(b, err),
            },
            (Z { x, y, field }, b) => match field.push(Axis::Z, b) {
                Ok(field) => (Z { x, y, field }, None),
                Err(err) => self.reject(b, err),
            },
        }
    }

    /// Drop the partial frame. A `$` opens the next frame straight away.
    fn reject(self, byte: u8, err: FrameError) -> (Self, Option<Event>) {
        let err = match (byte, self.field()) {
            (b'$', Some(field)) => FrameError::Interrupted { field },
            _ => err,
        };
        tracing::debug!(%err, "dropping partial frame");
        let next = if byte == b'$' {
            FrameState::X(Field::default())
        } else {
            FrameState::Idle
        };
        (next, Some(Event::Rejected(err)))
    }
}

/// Turns a byte stream into protocol events.
#[derive(Clone, Debug)]
pub struct Framer<I> {
    bytes: I,
    state: FrameState,
}

impl<I: Iterator<Item = u8>> Framer<I> {
    pub fn new(bytes: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            bytes: bytes.into_iter(),
            state: FrameState::Idle,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }
}

impl<I: Iterator<Item = u8>> Iterator for Framer<I> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        for byte in self.bytes.by_ref() {
            let (state, event) = self.state.step(byte);
            self.state = state;
            if event.is_some() {
                return event;
            }
        }
        None
    }
}

/// Decode a complete buffer
pub fn decode(bytes: &[u8]) -> Vec<Event> {
    Framer::new(bytes.iter().copied()).collect()
}
