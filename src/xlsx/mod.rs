pub mod writer;

pub use writer::write_divisions_to_xlsx;
