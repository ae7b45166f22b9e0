// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Library root for the sprint-report tools; exposes modules to the binary and integration tests
// role: crate/root
// inputs: n/a
// outputs: Public modules and the crate Result/ReportError aliases
// invariants:
// - The binary only wires modules together; behavior lives here
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod query;
pub mod render;
pub mod runner;
pub mod source;
pub mod sprint;
pub mod util;
pub mod window;

pub use error::{ReportError, Result};
