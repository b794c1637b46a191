// ── Domain model ──
//
// Devices and endpoints come from discovery; views are user data.

pub mod device;
pub mod endpoint;
pub mod view;

pub use device::Device;
pub use endpoint::{Endpoint, EndpointFunction};
pub use view::{DeviceSelection, View, ViewId};
