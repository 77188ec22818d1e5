pub mod writer;

pub use writer::write_csv;
pub use writer::write_csv_file;
pub use writer::ResultRow;
