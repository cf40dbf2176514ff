pub mod file;
pub mod source;

pub use file::{save_capture, CaptureFile, FileSource};
pub use source::{CaptureSource, SyntheticSource};
