pub mod batch_scanner;

pub use batch_scanner::{BatchFile, BatchScanner};
