mod file_device;
pub mod os_platform;

pub use os_platform::OsPlatform;
