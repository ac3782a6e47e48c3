//! # scenehub-domain
//!
//! Pure domain model for programming and synchronising mesh-network scenes.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Describe **devices** as seen by the scene subsystem (device class and
//!   supported command classes)
//! - Encode and decode the scene-related **wire messages**
//!   (scene actuator conf, scene controller conf, indicator, controller
//!   replication, plus the association/configuration frames used while
//!   programming)
//! - Define the closed set of **inbound events** the scene manager reacts to
//! - Define **scene devices** and the persistable **scene snapshot**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod codec;
pub mod command_class;
pub mod device;
pub mod duration;
pub mod event;
pub mod frame;
pub mod scene_device;
pub mod snapshot;
