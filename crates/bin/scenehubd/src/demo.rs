//! Demo scenes for the virtual installation.

use scenehub_app::ports::{DeviceDirectory, SendChannel};
use scenehub_app::runtime::SceneRuntime;
use scenehub_domain::duration::DimmingDuration;
use scenehub_domain::error::SceneHubError;
use scenehub_domain::id::{ButtonId, DeviceId};

/// Create and program the "evening" and "all off" scenes.
///
/// # Errors
///
/// Returns the first scene operation that fails.
pub async fn populate<D, C>(runtime: &SceneRuntime<D, C>) -> Result<(), SceneHubError>
where
    D: DeviceDirectory + Send + 'static,
    C: SendChannel + Send + 'static,
{
    let mut manager = runtime.lock().await;

    let evening = manager.new_scene("evening")?;
    manager.set_dimming_duration(evening, DimmingDuration::seconds(5)?)?;
    manager.add_device(evening, DeviceId::from(10), 60)?;
    manager.add_device(evening, DeviceId::from(11), 30)?;
    manager.add_device(evening, DeviceId::from(12), 80)?;
    manager.add_scene_controller(evening, DeviceId::from(2), ButtonId::from(1))?;
    manager.add_scene_controller(evening, DeviceId::from(3), ButtonId::from(1))?;

    let all_off = manager.new_scene("all off")?;
    manager.set_dimming_duration(all_off, DimmingDuration::instant())?;
    for device in [10, 11, 12] {
        manager.add_device(all_off, DeviceId::from(device), 0)?;
    }
    manager.add_scene_controller(all_off, DeviceId::from(2), ButtonId::from(2))?;
    manager.add_scene_controller(all_off, DeviceId::from(4), ButtonId::from(1))?;

    for scene in [evening, all_off] {
        manager.program_scene(scene)?;
    }
    tracing::info!(scenes = manager.number_of_scenes(), "demo scenes created");
    Ok(())
}
