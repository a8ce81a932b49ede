//! Side-effecting boundaries: child processes, sandbox, reasoner, config,
//! problem files. Isolated from [`crate::core`] to keep the pure logic
//! mockable in tests.

pub mod config;
pub mod problem;
pub mod process;
pub mod reasoner;
pub mod sandbox;
