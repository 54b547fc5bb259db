pub mod writer;

pub use writer::ResultWriter;
