//! Command dispatch.
//!
//! The [`Dispatcher`] owns the command table and the managed objects. Each
//! operator line is classified into a [`Command`], executed, and reported as
//! a [`DispatchResult`] carrying one entry per object touched. [`render`]
//! turns that result into console text.

mod outcome;
mod render;
mod router;

pub use outcome::{DispatchResult, Outcome, TargetOutcome, TargetStatus};
pub use render::render;
pub use router::{Command, Dispatcher};
