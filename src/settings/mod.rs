//! Settings come from a TOML file, then `.env`, then the process environment.
//! See `bin/settings_demo.rs` for a binary printing what gets loaded.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
