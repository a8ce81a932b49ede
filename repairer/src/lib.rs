//! Iterative program repair against input/output tests.
//!
//! A candidate solution is drafted by an external reasoner, executed in an
//! isolated sandbox against the problem's tests, and patched from the failure
//! diagnostics until it passes or the iteration budget runs out. The crate
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic types and parsing (run records,
//!   execution outcomes, code extraction). No I/O.
//! - **[`io`]**: Side-effecting boundaries (child processes, sandbox,
//!   reasoner, config, problem files). Each one is a small capability that
//!   tests replace with scripted fakes.
//!
//! [`harness`] and [`flow`] coordinate the two to implement the repair loop.

pub mod core;
pub mod flow;
pub mod harness;
pub mod io;
pub mod logging;
pub mod prompts;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
