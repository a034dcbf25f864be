//! Cross-module test suites for the console.

mod workers;
