//! Interactive command console for long-running data acquisition hosts.
//!
//! A host hands the console a set of named objects, the properties those
//! objects expose and the events the operator may trigger. The console then
//! reads short commands from a terminal and applies them while the host's own
//! worker threads keep running:
//!
//! - `dt` prints the current `interval` of every object,
//! - `dt 5` sets it on every object,
//! - `dt-P 5` sets it on object `P` only,
//! - `g` sets the `graph` event signal,
//! - `q`, `Q` or `quit` runs every stop hook and sets the stop signal.
//!
//! A bad value for one object never blocks the others; every object's result
//! is reported on its own line.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use std::sync::{Arc, Mutex};
//!
//! use clyo::property::{PropertyBinding, convert};
//! use clyo::{
//!     CommandSeparator, CommandTable, Dispatcher, EventSignal, EventSpec, InteractiveLoop,
//!     LoopExit, ManagedObject, ManagedObjects, PropertySpec, Signal,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let interval = Arc::new(Mutex::new(1.0_f64));
//! let (reader, writer) = (Arc::clone(&interval), Arc::clone(&interval));
//! let pressure = ManagedObject::new("P").with_property(
//!     "interval",
//!     PropertyBinding::new(
//!         convert::parse::<f64>,
//!         move || *reader.lock().unwrap(),
//!         move |value| {
//!             *writer.lock().unwrap() = value;
//!             Ok(())
//!         },
//!     ),
//! );
//!
//! let graph = Signal::new();
//! let table = CommandTable::build(
//!     vec![PropertySpec::new("interval", "Interval", ["dt"])],
//!     vec![EventSpec::new("graph", ["g"], graph.clone())],
//!     CommandSeparator::Hyphen,
//! )?;
//! let dispatcher = Dispatcher::new(table, ManagedObjects::from_objects([pressure])?);
//!
//! let mut console = InteractiveLoop::new(&dispatcher, Cursor::new("dt 2.5\ng\nq\n"), Vec::new());
//! assert_eq!(console.run()?, LoopExit::StopCommand);
//! assert_eq!(*interval.lock().unwrap(), 2.5);
//! assert!(graph.is_set());
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
mod errors;
pub mod interactive;
pub mod property;
pub mod signal;
pub mod table;
pub mod telemetry;

pub use clyo_config::{CommandSeparator, Config, LogFormat};
pub use dispatch::{Command, DispatchResult, Dispatcher, Outcome, TargetOutcome, TargetStatus, render};
pub use errors::ConstructionError;
pub use interactive::{InteractiveLoop, LoopError, LoopExit};
pub use property::{ManagedObject, ManagedObjects, PropertyAccessor, PropertyBinding, PropertyError, ValueChange};
pub use signal::{EventSignal, Signal};
pub use table::{CommandKind, CommandTable, EventSpec, PropertySpec, PropertyToken};

#[cfg(test)]
mod tests;
