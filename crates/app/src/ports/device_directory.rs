//! Device directory port — read access to the node database.

use std::sync::Arc;

use scenehub_domain::device::Device;
use scenehub_domain::id::DeviceId;

/// Looks up devices known to the network.
pub trait DeviceDirectory {
    /// Descriptor of device `id`, or `None` if no such node is included.
    fn get_device(&self, id: DeviceId) -> Option<Device>;
}

impl<T: DeviceDirectory + ?Sized> DeviceDirectory for Arc<T> {
    fn get_device(&self, id: DeviceId) -> Option<Device> {
        (**self).get_device(id)
    }
}
