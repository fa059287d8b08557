mod platform;
mod stream_device;

pub use platform::{Access, Platform};
pub use stream_device::StreamDevice;
