//! Serial command framing for the delta controller.

mod framing;

pub use framing::{Event, Field, FrameError, FrameState, Framer, Thou, decode};

#[cfg(test)]
mod testing;
