//! Demonstration host for the clyo console.
//!
//! Two simulated recorders, `P` and `T`, sample on background threads while
//! the operator tunes them from the terminal:
//!
//! - `dt`, `dt 0.5`, `dt-P 2` inspect or change the sampling interval in
//!   seconds,
//! - `avg`, `avg 4`, `avg-T 8` inspect or change the averaging count,
//! - `g` or `graph` logs the latest sample counts,
//! - `q`, `Q` or `quit` stops recording.
//!
//! Logging and the targeted-command separator are configured through
//! `--log-filter`, `--log-format` and `--command-separator`, the matching
//! `CLYO_*` environment variables, or a configuration file.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clyo::property::convert::{self, Seconds};
use clyo::table::DEFAULT_STOP_TOKENS;
use clyo::telemetry::{self, TelemetryError};
use clyo::{
    CommandTable, Config, ConstructionError, Dispatcher, EventSignal, EventSpec, InteractiveLoop,
    LoopError, ManagedObject, ManagedObjects, PropertyBinding, PropertySpec, Signal,
};
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::{debug, info, warn};

const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");
const GRAPH_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
enum HostError {
    #[error("failed to load configuration: {source}")]
    Configuration {
        #[source]
        source: Arc<OrthoError>,
    },
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        #[source]
        source: TelemetryError,
    },
    #[error("invalid console setup: {0}")]
    Construction(#[from] ConstructionError),
    #[error(transparent)]
    Console(#[from] LoopError),
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    interval: Seconds,
    averaging: u32,
}

#[derive(Clone)]
struct Recorder {
    name: &'static str,
    settings: Arc<Mutex<Settings>>,
    samples: Arc<AtomicU64>,
}

impl Recorder {
    fn new(name: &'static str, interval: Duration, averaging: u32) -> Self {
        Self {
            name,
            settings: Arc::new(Mutex::new(Settings {
                interval: Seconds(interval),
                averaging,
            })),
            samples: Arc::new(AtomicU64::new(0)),
        }
    }

    fn settings(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn managed(&self) -> ManagedObject {
        let (interval_get, interval_set) = (self.clone(), self.clone());
        let (averaging_get, averaging_set) = (self.clone(), self.clone());
        let name = self.name;
        ManagedObject::new(self.name)
            .with_property(
                "interval",
                PropertyBinding::new(
                    sampling_interval,
                    move || interval_get.settings().interval,
                    move |value| {
                        interval_set.settings().interval = value;
                        Ok(())
                    },
                ),
            )
            .with_property(
                "averaging",
                PropertyBinding::new(
                    convert::positive::<u32>,
                    move || averaging_get.settings().averaging,
                    move |value| {
                        averaging_set.settings().averaging = value;
                        Ok(())
                    },
                ),
            )
            .with_stop_hook(move || info!(target: HOST_TARGET, recorder = name, "recording stopped"))
    }

    fn spawn(&self, stop: Signal) -> JoinHandle<()> {
        let recorder = self.clone();
        thread::spawn(move || {
            loop {
                let Settings {
                    interval,
                    averaging,
                } = *recorder.settings();
                if stop.wait_timeout(interval.into()) {
                    break;
                }
                let sample = recorder.samples.fetch_add(1, Ordering::Relaxed);
                debug!(
                    target: HOST_TARGET,
                    recorder = recorder.name,
                    sample,
                    averaging,
                    "sample recorded"
                );
            }
        })
    }
}

/// Parses a strictly positive number of seconds.
fn sampling_interval(raw: &str) -> Result<Seconds, String> {
    let seconds = convert::seconds(raw)?;
    if seconds.0.is_zero() {
        return Err(String::from("interval must be greater than zero"));
    }
    Ok(seconds)
}

fn spawn_grapher(recorders: Vec<Recorder>, graph: Signal, stop: Signal) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.is_set() {
            if !graph.wait_timeout(GRAPH_POLL) {
                continue;
            }
            graph.clear();
            for recorder in &recorders {
                info!(
                    target: HOST_TARGET,
                    recorder = recorder.name,
                    samples = recorder.samples.load(Ordering::Relaxed),
                    "graph updated"
                );
            }
        }
    })
}

fn load_configuration<I>(args: I) -> Result<Config, HostError>
where
    I: IntoIterator<Item = OsString>,
{
    Config::load_from_iter(args).map_err(|source| HostError::Configuration { source })
}

fn run() -> Result<(), HostError> {
    let config = load_configuration(env::args_os())?;
    let _telemetry =
        telemetry::initialise(&config).map_err(|source| HostError::Telemetry { source })?;

    let stop = Signal::new();
    let graph = Signal::new();
    let recorders = vec![
        Recorder::new("P", Duration::from_secs(1), 10),
        Recorder::new("T", Duration::from_secs(2), 5),
    ];

    let table = CommandTable::build(
        vec![
            PropertySpec::new("interval", "Δt (s)", ["dt"]),
            PropertySpec::new("averaging", "Averaging", ["avg"]),
        ],
        vec![
            EventSpec::stop(DEFAULT_STOP_TOKENS, stop.clone()),
            EventSpec::new("graph", ["g", "graph"], graph.clone()),
        ],
        config.command_separator(),
    )?;
    let objects = ManagedObjects::from_objects(recorders.iter().map(Recorder::managed))?;
    let dispatcher = Dispatcher::new(table, objects);

    let mut workers: Vec<JoinHandle<()>> = recorders
        .iter()
        .map(|recorder| recorder.spawn(stop.clone()))
        .collect();
    workers.push(spawn_grapher(recorders, graph, stop.clone()));

    let outcome = InteractiveLoop::stdio(&dispatcher).run();
    // End of input leaves the stop signal clear; the workers still need it.
    stop.set();
    for worker in workers {
        if worker.join().is_err() {
            warn!(target: HOST_TARGET, "worker thread panicked");
        }
    }

    let exit = outcome?;
    info!(target: HOST_TARGET, ?exit, "console closed");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr(), "clyo: {error}");
            ExitCode::FAILURE
        }
    }
}
