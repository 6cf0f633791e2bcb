pub mod csv_io;
pub mod data_loader;

pub use csv_io::{CsvError, CsvReader, CsvReaderConfig};
pub use data_loader::{DataLoader, SeedError, SeedReport, TableSeed};
