pub mod arff;
mod memory_stream;
mod stream;

pub use arff::ArffFileStream;
pub use memory_stream::MemoryStream;
pub use stream::{Stream, read_all};
