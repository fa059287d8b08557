mod chunked_device;
mod racing_platform;
mod recording_platform;

pub use self::chunked_device::ChunkedDevice;
pub use self::racing_platform::RacingPlatform;
pub use self::recording_platform::{Call, FailOn, RecordingPlatform};
