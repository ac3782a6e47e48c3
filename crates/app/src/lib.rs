//! # scenehub-app
//!
//! Application layer — the scene state machines and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `SendChannel` — enqueue an outbound frame (fire-and-forget)
//!   - `DeviceDirectory` — look up device descriptors by id
//!   - `EventSource` — subscribe to inbound frames
//!   - `PersistenceHook` — save / load the scene snapshot
//! - Implement the domain behaviour that needs those ports:
//!   - `SceneController` — optimistic indicator state machine per controller
//!   - `Scene` — four-phase programming, activation, controller sync
//!   - `SceneManager` — scene registry and inbound event routing
//! - Provide **in-process infrastructure** (event bus, outbound queue,
//!   single-writer runtime) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `scenehub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod outbound;
pub mod ports;
pub mod runtime;
pub mod scene;
pub mod scene_controller;
pub mod scene_manager;

#[cfg(test)]
mod testing;
