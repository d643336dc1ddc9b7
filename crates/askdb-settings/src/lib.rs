//! # askdb-settings
//!
//! Configuration management with layered sources for askdb.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`AskdbSettings::default()`]
//! 2. **User file** — `~/.askdb/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `ASKDB_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use askdb_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("model: {}", settings.provider.model);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
