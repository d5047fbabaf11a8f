//! # irrigator-domain
//!
//! Pure domain model for the irrigator pump controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define the **pump** vocabulary (state, commands, command acknowledgements)
//! - Define the **device status** reported by each poll
//! - Define the **automation** configuration and the pure evaluator that
//!   decides whether to switch the pump
//! - Define **notifications** (transient messages and the error banner)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod automation;
pub mod notification;
pub mod pump;
pub mod status;
