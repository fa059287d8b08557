pub mod filesystem;
pub mod stream;
pub mod walk;

pub use filesystem::Filesystem;
pub use stream::Stream;
pub use walk::{PostOrder, PreOrder, WalkEntry};
