//! Simulator server abstraction for production and testing.

use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kinetic_devtools_config::SimulatorConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::error::{Result, SimulatorError};

/// Bootstrap script for the kinetic-ruby simulator.
pub const KINETIC_RUBY_BOOTSTRAP: &str = include_str!("kinetic_ruby.rb");

/// Placeholder replaced with the configured port in launch arguments.
pub const PORT_PLACEHOLDER: &str = "{port}";

/// A running simulator as seen by the supervisor.
///
/// Real simulators run as child processes; tests substitute in-process fakes.
#[async_trait]
pub trait SimulatorServer: Send {
	/// Whether a client is currently connected.
	fn connected(&self) -> bool;

	/// Stops the simulator. Called exactly once by the supervisor.
	async fn shutdown(&mut self) -> Result<()>;
}

/// Connection state line printed by the simulator process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine {
	Connected,
	Disconnected,
}

impl StatusLine {
	pub fn parse(line: &str) -> Option<Self> {
		match line.trim() {
			"connected" => Some(Self::Connected),
			"disconnected" => Some(Self::Disconnected),
			_ => None,
		}
	}
}

/// Resolves the launch command for `config`, substituting the port.
pub fn launch_command(config: &SimulatorConfig) -> Vec<String> {
	let template = match &config.command {
		Some(command) => command.clone(),
		None => vec![
			"ruby".to_string(),
			"-e".to_string(),
			KINETIC_RUBY_BOOTSTRAP.to_string(),
			PORT_PLACEHOLDER.to_string(),
		],
	};
	let port = config.port.to_string();
	template
		.into_iter()
		.map(|arg| arg.replace(PORT_PLACEHOLDER, &port))
		.collect()
}

/// Simulator running as a child process.
///
/// The child reports `connected` and `disconnected` lines on stdout; any other
/// output is logged at debug level.
pub struct ProcessSimulator {
	child: Child,
	connected: Arc<AtomicBool>,
	reader: JoinHandle<()>,
	grace: Duration,
}

impl ProcessSimulator {
	/// Launches the simulator described by `config`.
	///
	/// Must be called from within a tokio runtime.
	pub fn spawn(config: &SimulatorConfig) -> Result<Self> {
		let command = launch_command(config);
		let (program, args) = command.split_first().ok_or(SimulatorError::EmptyCommand)?;

		let mut command = Command::new(program);
		command
			.args(args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::inherit())
			.kill_on_drop(true);
		// Own process group: a terminal interrupt reaches only the supervisor,
		// which then stops the child through `shutdown`.
		#[cfg(unix)]
		command.process_group(0);

		let mut child = command.spawn().map_err(|error| SimulatorError::Spawn {
			program: program.clone(),
			error,
		})?;
		let stdout = child.stdout.take().ok_or(SimulatorError::MissingStdout)?;

		tracing::info!(program = %program, port = config.port, pid = ?child.id(), "simulator.spawn");

		let connected = Arc::new(AtomicBool::new(false));
		let flag = connected.clone();
		let reader = tokio::spawn(async move {
			let mut lines = BufReader::new(stdout).lines();
			loop {
				match lines.next_line().await {
					Ok(Some(line)) => match StatusLine::parse(&line) {
						Some(status) => {
							tracing::debug!(?status, "simulator.status");
							flag.store(status == StatusLine::Connected, Ordering::Release);
						}
						None => tracing::debug!(line = %line, "simulator.output"),
					},
					Ok(None) => break,
					Err(e) => {
						tracing::warn!(error = %e, "simulator.read_error");
						break;
					}
				}
			}
			flag.store(false, Ordering::Release);
			tracing::warn!("simulator.stdout_closed");
		});

		Ok(Self {
			child,
			connected,
			reader,
			grace: config.shutdown_grace(),
		})
	}

	pub fn id(&self) -> Option<u32> {
		self.child.id()
	}

	#[cfg(unix)]
	fn terminate(&self) {
		use nix::sys::signal::{Signal, kill};
		use nix::unistd::Pid;

		if let Some(pid) = self.child.id()
			&& let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
		{
			tracing::warn!(pid, error = %e, "simulator.sigterm_failed");
		}
	}

	#[cfg(not(unix))]
	fn terminate(&self) {}
}

#[async_trait]
impl SimulatorServer for ProcessSimulator {
	fn connected(&self) -> bool {
		self.connected.load(Ordering::Acquire)
	}

	async fn shutdown(&mut self) -> Result<()> {
		if let Some(status) = self.child.try_wait()? {
			tracing::info!(?status, "simulator.already_exited");
		} else {
			self.terminate();
			match tokio::time::timeout(self.grace, self.child.wait()).await {
				Ok(status) => {
					let status = status?;
					tracing::info!(?status, "simulator.exited");
				}
				Err(_) => {
					tracing::warn!(grace = ?self.grace, "simulator.kill");
					self.child.kill().await?;
				}
			}
		}

		self.connected.store(false, Ordering::Release);
		self.reader.abort();
		Ok(())
	}
}
