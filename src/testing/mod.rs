pub mod ports;

pub use ports::{Call, ChunkedDevice, FailOn, RacingPlatform, RecordingPlatform};
