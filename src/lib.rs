//! # chip8-harness
//!
//! Host side of a CHIP-8 machine: pacing, screen, keys and beeper. The
//! interpreter itself is somebody else's problem; it plugs in through
//! `ExecutionCore` and calls back into `HostImports`.
//!
//! ## Design
//!
//! * one thread; everything happens inside a refresh callback or an input
//!   event, nothing blocks
//! * ~60 frames a second no matter how fast the display refreshes; a frame is
//!   one timer tick, a budget of instruction cycles, then present
//! * the core draws into a back plane; only presented frames reach a `Display`
//! * key presses latch once for `Fx0A`-style waits, key state is also readable
//!   level-wise for `Ex9E`/`ExA1`
//! * the beeper is a gate: on, off, nothing else
//!
//! Model
//!
//! Harness
//!  |-- Host (lives across sessions)
//!  |    |-- KeyboardLatch <- TermInput (or anything else calling on_press/on_release)
//!  |    |-- FrameBuffer   -> Display
//!  |    `-- AudioGate     -> Sound
//!  |-- Scheduler
//!  `-- ExecutionCore (one per session; font at 0x050, program at 0x200)
pub mod config;
pub mod display;
pub mod error;
pub mod harness;
pub mod host;
pub mod input;
pub mod interpreter;
pub mod memory;
pub mod scheduler;
pub mod sound;
pub mod terminal;

pub use crate::config::{CycleBudget, HarnessConfig};
pub use crate::error::{ConfigurationError, CoreError, HarnessError};
pub use crate::harness::Harness;
pub use crate::host::{Host, HostImports};
pub use crate::interpreter::ExecutionCore;
pub use crate::scheduler::{Scheduler, Tick};
