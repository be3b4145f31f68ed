//! Structured logging for the settings panel.
//!
//! Every layer logs through `tracing` macros with structured fields (`row`,
//! `field`, `expression`, `element`). This module only decides where those
//! events go: a `tracing-subscriber` registry with an `EnvFilter` and a text
//! formatter on stderr.
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`RuntimeConfig`](crate::RuntimeConfig)
//! 3. Default: `"info"`
//!
//! Hosts embedding the library may install their own subscriber instead and
//! never call [`init_tracing`].
//!
//! # Modules
//!
//! - `init`: Subscriber setup

mod init;

pub use init::init_tracing;
