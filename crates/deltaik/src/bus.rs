//! Servo bus output.

use std::io::{self, Write};

/// A bus that can command servo goal positions.
pub trait ServoBus {
    fn write_goal_position(&mut self, id: u8, ticks: u16) -> io::Result<()>;
}

impl<B: ServoBus + ?Sized> ServoBus for &mut B {
    fn write_goal_position(&mut self, id: u8, ticks: u16) -> io::Result<()> {
        (**self).write_goal_position(id, ticks)
    }
}

/// Writes one `goal <id> <ticks>` line per command, for piping into a bus
/// bridge or for dry runs.
#[derive(Debug)]
pub struct LineBus<W> {
    out: W,
}

impl<W: Write> LineBus<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ServoBus for LineBus<W> {
    fn write_goal_position(&mut self, id: u8, ticks: u16) -> io::Result<()> {
        writeln!(self.out, "goal {id} {ticks}")?;
        self.out.flush()
    }
}

/// Keeps every command in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingBus {
    pub writes: Vec<(u8, u16)>,
}

impl ServoBus for RecordingBus {
    fn write_goal_position(&mut self, id: u8, ticks: u16) -> io::Result<()> {
        self.writes.push((id, ticks));
        Ok(())
    }
}
