//! Operator loop: serial targets in, servo commands out.

use crate::bus::ServoBus;
use deltaik_core::{
    AngleTriple, InverseKinematics, NoSolution, Point,
    servo::ServoScale,
    workspace::{HOME, Workspace},
};
use deltaik_serial::{Event, FrameError, FrameState};
use std::{fmt, io};

/// A solved move, ready for the bus
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    pub target: Point,
    pub angles: AngleTriple,
    pub ticks: [u16; 3],
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.ticks;
        write!(f, "{} angles {} ticks [{a}, {b}, {c}]", self.target, self.angles)
    }
}

/// What the controller did with an event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// Nothing to do
    Idle,
    /// Solved and waiting for `y`
    Proposed(Move),
    /// Written to the bus
    Sent(Move),
    /// A pending move was dropped
    Cancelled,
    OutsideWorkspace(Point),
    Unsolvable { target: Point, reason: NoSolution },
    Rejected(FrameError),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Idle => f.write_str("idle"),
            Outcome::Proposed(mv) => write!(f, "proposed {mv}, confirm? (y/n)"),
            Outcome::Sent(mv) => write!(f, "sent {mv}"),
            Outcome::Cancelled => f.write_str("cancelled"),
            Outcome::OutsideWorkspace(p) => write!(f, "{p} is outside the workspace"),
            Outcome::Unsolvable { target, reason } => write!(f, "{target}: {reason}"),
            Outcome::Rejected(err) => write!(f, "bad frame: {err}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub workspace: Workspace,
    pub scale: ServoScale,
    /// Bus ids for actuators one, two and three
    pub ids: [u8; 3],
    /// Send solved moves without waiting for `y`
    pub auto_confirm: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace: Workspace::default(),
            scale: ServoScale::default(),
            ids: [1, 2, 3],
            auto_confirm: false,
        }
    }
}

pub struct Controller<K, B> {
    solver: K,
    bus: B,
    settings: Settings,
    framing: FrameState,
    pending: Option<Move>,
}

impl<K: InverseKinematics, B: ServoBus> Controller<K, B> {
    pub fn new(solver: K, bus: B, settings: Settings) -> Self {
        Self {
            solver,
            bus,
            settings,
            framing: FrameState::Idle,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&Move> {
        self.pending.as_ref()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Drive every servo to 180 degrees, arms horizontal.
    pub fn home(&mut self) -> io::Result<Move> {
        let mv = self.plan(HOME, AngleTriple::HOME);
        self.send(&mv)?;
        tracing::info!("homed");
        Ok(mv)
    }

    /// Feed one serial byte. Returns an outcome whenever the byte completed
    /// an event.
    pub fn feed(&mut self, byte: u8) -> io::Result<Option<Outcome>> {
        let (framing, event) = self.framing.step(byte);
        self.framing = framing;
        event.map(|event| self.handle(event)).transpose()
    }

    pub fn handle(&mut self, event: Event) -> io::Result<Outcome> {
        let pending = self.pending.take();
        match event {
            Event::Confirm => match pending {
                Some(mv) => {
                    self.send(&mv)?;
                    tracing::info!(%mv, "move sent");
                    Ok(Outcome::Sent(mv))
                }
                None => Ok(Outcome::Idle),
            },
            Event::Target(thou) => {
                if let Some(mv) = pending {
                    tracing::info!(previous = %mv.target, "pending move superseded");
                }
                self.target(thou.to_point())
            }
            Event::Cancel | Event::Stray(_) | Event::Rejected(_) if pending.is_some() => {
                tracing::info!(?event, "pending move cancelled");
                Ok(Outcome::Cancelled)
            }
            Event::Rejected(err) => {
                tracing::warn!(%err, "bad frame");
                Ok(Outcome::Rejected(err))
            }
            Event::Cancel | Event::Stray(_) => Ok(Outcome::Idle),
        }
    }

    fn target(&mut self, target: Point) -> io::Result<Outcome> {
        if !self.settings.workspace.contains(target) {
            tracing::warn!(point = %target, "target outside workspace");
            return Ok(Outcome::OutsideWorkspace(target));
        }

        let angles = match self.solver.solve(target) {
            Ok(angles) => angles,
            Err(reason) => {
                tracing::warn!(point = %target, %reason, "no kinematic solution");
                return Ok(Outcome::Unsolvable { target, reason });
            }
        };

        let mv = self.plan(target, angles);
        if self.settings.auto_confirm {
            self.send(&mv)?;
            tracing::info!(%mv, "move sent");
            Ok(Outcome::Sent(mv))
        } else {
            tracing::info!(%mv, "move proposed");
            self.pending = Some(mv);
            Ok(Outcome::Proposed(mv))
        }
    }

    fn plan(&self, target: Point, angles: AngleTriple) -> Move {
        Move {
            target,
            angles,
            ticks: angles.0.map(|a| self.settings.scale.goal_position(a)),
        }
    }

    fn send(&mut self, mv: &Move) -> io::Result<()> {
        for (id, ticks) in self.settings.ids.into_iter().zip(mv.ticks) {
            self.bus.write_goal_position(id, ticks)?;
        }
        Ok(())
    }
}
