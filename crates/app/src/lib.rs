//! # irrigator-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** the device adapter must implement
//!   (`PumpController`: fetch status, send pump commands)
//! - Provide the **irrigation service**: one poll tick (status refresh +
//!   automation), the manual override, the automation toggle, and state
//!   snapshots for display
//! - Provide the **poller**, the scheduler that ticks the service on a fixed
//!   period and stops cleanly on shutdown
//!
//! ## Dependency rule
//! Depends on `irrigator-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod poller;
pub mod ports;
pub mod services;
