//! # scenehubd — scene hub daemon
//!
//! Composition root that wires the scene manager to its adapters and runs
//! the inbound event loop.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Build the network adapter, the outbound queue and the frame bus
//! - Restore stored scenes, or create the demo scenes
//! - Run until SIGINT, then save the scenes
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod demo;

use std::sync::Arc;

use scenehub_adapter_storage_json::JsonFileStore;
use scenehub_adapter_virtual::VirtualNetwork;
use scenehub_app::event_bus::InProcessEventBus;
use scenehub_app::outbound::QueuedSendChannel;
use scenehub_app::runtime::SceneRuntime;
use scenehub_app::scene_manager::SceneManager;
use scenehub_domain::id::DeviceId;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Network
    let bus = InProcessEventBus::new(256);
    let network = Arc::new(if config.demo.enabled {
        VirtualNetwork::demo(bus.clone())
    } else {
        VirtualNetwork::new(bus.clone())
    });
    let (queue, outbound) = QueuedSendChannel::new();
    let transmitter = {
        let network = Arc::clone(&network);
        tokio::spawn(async move { network.transmit(outbound).await })
    };

    // Scenes
    let manager = SceneManager::new(Arc::clone(&network), queue)
        .with_coordinator(DeviceId::from(config.network.coordinator_id))
        .with_number_of_buttons(config.network.number_of_buttons)?;
    let runtime = SceneRuntime::new(manager);
    let event_loop = runtime.spawn_event_loop(&bus);

    // Storage
    let store = JsonFileStore::new(&config.storage.path);
    let restored = runtime.load(&store).await?;
    if restored == 0 && config.demo.enabled {
        demo::populate(&runtime).await?;
    }

    tracing::info!(
        coordinator = config.network.coordinator_id,
        storage = %store.path().display(),
        "scenehubd running"
    );
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    if config.storage.autosave {
        runtime.save(&store).await?;
    }
    event_loop.abort();
    transmitter.abort();
    Ok(())
}
