//! Configuration loading
//!
//! Telemetry settings come from environment variables (optionally seeded by a
//! `.env` file) or from a TOML/JSON file.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_dotenv, load_from_env, load_from_file, probe_config_paths};
