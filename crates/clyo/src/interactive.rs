//! Blocking prompt/read/dispatch/print loop.
//!
//! The loop reads one line at a time, hands it to the [`Dispatcher`] and
//! prints the rendered result. It ends after a stop command, when another
//! thread has set the stop signal, or when the input is exhausted. Once it
//! has ended it performs no further reads.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, render};

/// Tracing target for the interactive loop.
pub(crate) const INTERACTIVE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::interactive");

/// Why the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The operator typed a stop token.
    StopCommand,
    /// The stop signal was already set when the loop was about to prompt.
    StopSignalled,
    /// Input reached end of file. The stop signal is left untouched.
    InputClosed,
}

/// I/O failures of the loop itself.
#[derive(Debug, Error)]
pub enum LoopError {
    /// Reading operator input failed.
    #[error("failed to read operator input: {0}")]
    Read(#[source] io::Error),
    /// Writing the prompt or a result failed.
    #[error("failed to write console output: {0}")]
    Write(#[source] io::Error),
}

/// Console bound to an input and an output stream.
pub struct InteractiveLoop<'a, R, W> {
    dispatcher: &'a Dispatcher,
    input: R,
    output: W,
    prompt: String,
}

impl<'a> InteractiveLoop<'a, StdinLock<'static>, Stdout> {
    /// Creates a loop reading standard input and writing standard output.
    #[must_use]
    pub fn stdio(dispatcher: &'a Dispatcher) -> Self {
        Self::new(dispatcher, io::stdin().lock(), io::stdout())
    }
}

impl<'a, R, W> InteractiveLoop<'a, R, W>
where
    R: BufRead,
    W: Write,
{
    /// Creates a loop over the given streams.
    ///
    /// The prompt lists the stop tokens in the order they were declared.
    #[must_use]
    pub fn new(dispatcher: &'a Dispatcher, input: R, output: W) -> Self {
        let prompt = format!(
            "Type command (to stop, type {}): ",
            dispatcher.table().stop_tokens().join(" or ")
        );
        Self {
            dispatcher,
            input,
            output,
            prompt,
        }
    }

    /// Returns the prompt written before every read.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Runs until the console stops or input ends.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError`] when reading input or writing output fails.
    /// Per-object dispatch failures are printed, never returned.
    pub fn run(&mut self) -> Result<LoopExit, LoopError> {
        info!(target: INTERACTIVE_TARGET, "console started");
        loop {
            if let Some(exit) = self.step()? {
                info!(target: INTERACTIVE_TARGET, ?exit, "console finished");
                return Ok(exit);
            }
        }
    }

    /// Performs one prompt/read/dispatch/print iteration.
    ///
    /// Returns `Some` when the loop must end.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError`] when reading input or writing output fails.
    pub fn step(&mut self) -> Result<Option<LoopExit>, LoopError> {
        if self.dispatcher.is_stopped() {
            return Ok(Some(LoopExit::StopSignalled));
        }

        write!(self.output, "{}", self.prompt).map_err(LoopError::Write)?;
        self.output.flush().map_err(LoopError::Write)?;

        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .map_err(LoopError::Read)?;
        if read == 0 {
            writeln!(self.output).map_err(LoopError::Write)?;
            debug!(target: INTERACTIVE_TARGET, "input closed");
            return Ok(Some(LoopExit::InputClosed));
        }

        // Undecodable bytes become U+FFFD and the line is dispatched as usual.
        let line = String::from_utf8_lossy(&raw);
        let result = self.dispatcher.dispatch(&line);
        writeln!(self.output, "{}", render(&result)).map_err(LoopError::Write)?;
        self.output.flush().map_err(LoopError::Write)?;
        Ok(result.is_stopped().then_some(LoopExit::StopCommand))
    }

    /// Releases the streams.
    #[must_use]
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}
