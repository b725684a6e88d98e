//! Supervision of the kinetic simulator used for kinetic-c integration tests.
//!
//! A [`Supervisor`] owns one [`SimulatorServer`], polls its connection state
//! (briefly while waiting for a client, lazily once connected) and shuts it
//! down exactly once when its [`CancellationToken`] fires or the client goes
//! away. Interrupt handling lives with the caller: it only has to cancel the
//! token.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod error;
pub mod server;
pub mod supervisor;

pub use error::{Result, SimulatorError};
pub use server::{KINETIC_RUBY_BOOTSTRAP, ProcessSimulator, SimulatorServer, StatusLine, launch_command};
pub use supervisor::{PollIntervals, Supervisor, SupervisorOutcome, SupervisorState};
