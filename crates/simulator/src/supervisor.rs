//! Poll loop that owns a simulator for its whole lifetime.

use std::time::Duration;

use kinetic_devtools_config::SimulatorConfig;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::server::SimulatorServer;

/// Lifecycle of a supervised simulator.
///
/// ```text
/// Starting -> WaitingForConnection -> Connected -> ShuttingDown -> Terminated
///                      \________________________/
///                         interrupt at any time
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
	Starting,
	WaitingForConnection,
	Connected,
	ShuttingDown,
	Terminated,
}

/// Why the poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorOutcome {
	/// The cancellation token fired.
	Interrupted,
	/// The client disconnected after a connection had been observed.
	Disconnected,
}

/// Poll cadence for each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
	/// Interval while waiting for the first connection.
	pub waiting: Duration,
	/// Interval while a client is connected.
	pub connected: Duration,
}

impl Default for PollIntervals {
	fn default() -> Self {
		Self {
			waiting: Duration::from_millis(250),
			connected: Duration::from_secs(1),
		}
	}
}

impl From<&SimulatorConfig> for PollIntervals {
	fn from(config: &SimulatorConfig) -> Self {
		Self {
			waiting: config.waiting_interval(),
			connected: config.connected_interval(),
		}
	}
}

/// Owns a simulator and drives it through [`SupervisorState`].
pub struct Supervisor<S> {
	server: S,
	intervals: PollIntervals,
	state: watch::Sender<SupervisorState>,
}

impl<S: SimulatorServer> Supervisor<S> {
	pub fn new(server: S, intervals: PollIntervals) -> Self {
		let (state, _) = watch::channel(SupervisorState::Starting);
		Self {
			server,
			intervals,
			state,
		}
	}

	pub fn state(&self) -> SupervisorState {
		*self.state.borrow()
	}

	/// Receiver observing every state transition.
	pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
		self.state.subscribe()
	}

	/// Polls until `cancel` fires or the client disconnects, then shuts the
	/// simulator down.
	///
	/// There is no timeout on the wait for a connection. Shutdown runs exactly
	/// once on every exit path, and its error is returned after the supervisor
	/// has reached [`SupervisorState::Terminated`].
	pub async fn run(mut self, cancel: CancellationToken) -> Result<SupervisorOutcome> {
		self.transition(SupervisorState::WaitingForConnection);
		let outcome = self.poll(&cancel).await;

		self.transition(SupervisorState::ShuttingDown);
		let shutdown = self.server.shutdown().await;
		self.transition(SupervisorState::Terminated);

		shutdown.map(|()| outcome)
	}

	async fn poll(&mut self, cancel: &CancellationToken) -> SupervisorOutcome {
		let mut connected = false;
		loop {
			let observed = self.server.connected();
			if !connected && observed {
				connected = true;
				self.transition(SupervisorState::Connected);
			} else if connected && !observed {
				return SupervisorOutcome::Disconnected;
			}

			let interval = if connected {
				self.intervals.connected
			} else {
				self.intervals.waiting
			};

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return SupervisorOutcome::Interrupted,
				_ = tokio::time::sleep(interval) => {}
			}
		}
	}

	fn transition(&self, next: SupervisorState) {
		let previous = self.state.send_replace(next);
		tracing::debug!(?previous, ?next, "simulator.supervisor.transition");
	}
}
