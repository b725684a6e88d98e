//! Shared plumbing for the kinetic-c developer tool binaries.
//!
//! Each tool is its own binary and runs with no arguments from the project
//! root. The optional flags in [`CommonArgs`] point a tool at another tree or
//! configuration file.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use kinetic_devtools_config::{ConfigError, DevtoolsConfig, resolve_path};
use kinetic_devtools_mocks::{CmockGenerator, HeaderSet, MockError};
use kinetic_devtools_rename::NormalizeOptions;
use kinetic_devtools_simulator::{SimulatorServer, Supervisor, SupervisorOutcome, SupervisorState};
use kinetic_devtools_version_info::{ProtocolVersionPattern, VersionInfoError, VersionInputs};
use tokio_util::sync::CancellationToken;

/// Flags accepted by every tool.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
	/// Project root (defaults to the current directory)
	#[arg(short, long, value_name = "DIR")]
	pub root: Option<PathBuf>,

	/// Configuration file (defaults to <root>/devtools.toml when present)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

impl CommonArgs {
	/// Resolves the project root and loads its configuration.
	pub fn project(&self) -> Result<Project, ConfigError> {
		let root = match &self.root {
			Some(root) => root.clone(),
			None => std::env::current_dir().map_err(|error| ConfigError::Io {
				path: PathBuf::from("."),
				error,
			})?,
		};
		let config = match &self.config {
			Some(path) => DevtoolsConfig::load(resolve_path(&root, path))?,
			None => DevtoolsConfig::discover(&root)?,
		};
		Ok(Project { root, config })
	}
}

/// A project tree and its configuration.
#[derive(Debug, Clone)]
pub struct Project {
	pub root: PathBuf,
	pub config: DevtoolsConfig,
}

impl Project {
	/// Resolves a configured path against the project root.
	pub fn path(&self, path: &Path) -> PathBuf {
		resolve_path(&self.root, path)
	}

	/// Inputs for the version header generator at `revision`.
	pub fn version_inputs(&self, revision: String) -> Result<VersionInputs, VersionInfoError> {
		let cfg = &self.config.version_info;
		Ok(VersionInputs {
			version_file: self.path(&cfg.version_file),
			protocol_source: self.path(&cfg.protocol_source),
			pattern: ProtocolVersionPattern::symbol(&cfg.protocol_symbol)?,
			revision,
			output: self.path(&cfg.output),
		})
	}

	/// Headers to mock.
	pub fn header_set(&self) -> Result<HeaderSet, MockError> {
		let cfg = &self.config.mocks;
		HeaderSet::discover(&self.path(&cfg.header_dir), &cfg.header_glob)
	}

	/// Mock output directory.
	pub fn mock_dir(&self) -> PathBuf {
		self.path(&self.config.mocks.output_dir)
	}

	/// CMock invocation running from the project root.
	pub fn mock_generator(&self) -> CmockGenerator {
		CmockGenerator::new(self.config.mocks.command.clone()).with_working_dir(&self.root)
	}

	/// Roots scanned by the filename migration.
	pub fn rename_roots(&self) -> Vec<PathBuf> {
		self.config.rename.roots.iter().map(|root| self.path(root)).collect()
	}

	pub fn normalize_options(&self) -> NormalizeOptions {
		NormalizeOptions {
			globs: self.config.rename.globs.clone(),
			keep_test_marker: self.config.rename.keep_test_marker,
		}
	}
}

/// Runs `supervisor` until `interrupt` resolves or the client disconnects.
///
/// Prints the connection and shutdown notices. If `interrupt` fails (no
/// signal handler could be installed) supervision continues until the client
/// disconnects.
pub async fn supervise<S, F>(
	supervisor: Supervisor<S>,
	interrupt: F,
) -> kinetic_devtools_simulator::Result<SupervisorOutcome>
where
	S: SimulatorServer,
	F: Future<Output = io::Result<()>> + Send + 'static,
{
	let mut states = supervisor.subscribe();
	tokio::spawn(async move {
		while states.changed().await.is_ok() {
			if *states.borrow_and_update() == SupervisorState::Connected {
				println!("Kinetic simulator connected!");
			}
		}
	});

	let cancel = CancellationToken::new();
	let trigger = cancel.clone();
	let watcher = tokio::spawn(async move {
		match interrupt.await {
			Ok(()) => {
				println!("\nShutting down...");
				trigger.cancel();
			}
			Err(e) => tracing::error!(error = %e, "simulator.signal_handler_failed"),
		}
	});

	let outcome = supervisor.run(cancel).await;
	watcher.abort();
	outcome
}

/// Installs the tracing subscriber for a tool binary.
///
/// Diagnostics go to stderr, or to `$KINETIC_DEVTOOLS_LOG_DIR/<tool>.<pid>.log`
/// when that variable is set. `RUST_LOG` overrides the default filter.
pub fn setup_tracing(tool: &str, verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("kinetic_devtools=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		})
	};

	if let Some(log_dir) = std::env::var("KINETIC_DEVTOOLS_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("{}.{}.log", tool, std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry()
				.with(filter())
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}

#[cfg(test)]
mod tests {
	use std::fs;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn explicit_root_and_relative_config() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("ci.toml"), "[rename]\nroots = [\"lib\"]\n").unwrap();

		let args = CommonArgs {
			root: Some(dir.path().to_path_buf()),
			config: Some(PathBuf::from("ci.toml")),
			verbose: false,
		};
		let project = args.project().unwrap();

		assert_eq!(project.rename_roots(), vec![dir.path().join("lib")]);
	}

	#[test]
	fn missing_explicit_config_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let args = CommonArgs {
			root: Some(dir.path().to_path_buf()),
			config: Some(PathBuf::from("absent.toml")),
			verbose: false,
		};
		assert!(matches!(args.project(), Err(ConfigError::Io { .. })));
	}

	#[test]
	fn default_paths_resolve_under_root() {
		let project = Project {
			root: PathBuf::from("/work/kinetic-c"),
			config: DevtoolsConfig::default(),
		};

		let inputs = project.version_inputs("abc".to_string()).unwrap();
		assert_eq!(inputs.version_file, PathBuf::from("/work/kinetic-c/config/VERSION"));
		assert_eq!(inputs.protocol_source, PathBuf::from("/work/kinetic-c/src/lib/kinetic_proto.c"));
		assert_eq!(inputs.output, PathBuf::from("/work/kinetic-c/src/lib/kinetic_version_info.h"));
		assert_eq!(
			inputs
				.pattern
				.payload("char KineticProto_local_protocol_version_default_value[] = \"3.0.6\";"),
			Some("3.0.6")
		);
		assert_eq!(inputs.pattern.payload("char other[] = \"1\";"), None);

		assert_eq!(project.mock_dir(), PathBuf::from("/work/kinetic-c/build/test/mocks"));
		assert_eq!(
			project.rename_roots(),
			vec![PathBuf::from("/work/kinetic-c/src"), PathBuf::from("/work/kinetic-c/test")]
		);
		assert!(!project.normalize_options().keep_test_marker);
	}

	mod supervise {
		use std::sync::Arc;
		use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
		use std::time::Duration;

		use async_trait::async_trait;
		use kinetic_devtools_simulator::PollIntervals;
		use pretty_assertions::assert_eq;

		use super::*;

		#[derive(Clone, Default)]
		struct StubServer {
			connected: Arc<AtomicBool>,
			shutdowns: Arc<AtomicUsize>,
		}

		#[async_trait]
		impl SimulatorServer for StubServer {
			fn connected(&self) -> bool {
				self.connected.load(Ordering::SeqCst)
			}

			async fn shutdown(&mut self) -> kinetic_devtools_simulator::Result<()> {
				self.shutdowns.fetch_add(1, Ordering::SeqCst);
				Ok(())
			}
		}

		#[tokio::test(flavor = "current_thread", start_paused = true)]
		async fn interrupt_cancels_and_shuts_down_once() {
			let server = StubServer::default();
			server.connected.store(true, Ordering::SeqCst);
			let supervisor = Supervisor::new(server.clone(), PollIntervals::default());

			let interrupt = async {
				tokio::time::sleep(Duration::from_secs(30)).await;
				Ok::<(), io::Error>(())
			};
			let outcome = supervise(supervisor, interrupt).await.unwrap();

			assert_eq!(outcome, SupervisorOutcome::Interrupted);
			assert_eq!(server.shutdowns.load(Ordering::SeqCst), 1);
		}

		#[tokio::test(flavor = "current_thread", start_paused = true)]
		async fn failed_signal_handler_keeps_supervising() {
			let server = StubServer::default();
			server.connected.store(true, Ordering::SeqCst);
			let supervisor = Supervisor::new(server.clone(), PollIntervals::default());

			let client = server.clone();
			tokio::spawn(async move {
				tokio::time::sleep(Duration::from_secs(60)).await;
				client.connected.store(false, Ordering::SeqCst);
			});

			let outcome = supervise(supervisor, async { Err::<(), _>(io::Error::other("no handler")) })
				.await
				.unwrap();

			assert_eq!(outcome, SupervisorOutcome::Disconnected);
			assert_eq!(server.shutdowns.load(Ordering::SeqCst), 1);
		}

		#[tokio::test(flavor = "current_thread", start_paused = true)]
		async fn disconnect_without_interrupt() {
			let server = StubServer::default();
			server.connected.store(true, Ordering::SeqCst);
			let supervisor = Supervisor::new(server.clone(), PollIntervals::default());

			let client = server.clone();
			tokio::spawn(async move {
				tokio::time::sleep(Duration::from_secs(5)).await;
				client.connected.store(false, Ordering::SeqCst);
			});

			let outcome = supervise(supervisor, std::future::pending::<io::Result<()>>()).await.unwrap();
			assert_eq!(outcome, SupervisorOutcome::Disconnected);
			assert_eq!(server.shutdowns.load(Ordering::SeqCst), 1);
		}
	}

	#[test]
	fn header_set_reads_configured_directory() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(dir.path().join("src/lib")).unwrap();
		fs::write(dir.path().join("src/lib/kinetic_types.h"), "").unwrap();

		let project = Project {
			root: dir.path().to_path_buf(),
			config: DevtoolsConfig::default(),
		};
		assert_eq!(project.header_set().unwrap().paths(), &[dir.path().join("src/lib/kinetic_types.h")]);
	}
}
