pub mod processor;

pub use processor::{CsvError, CsvReader, CsvReaderConfig, DataLoader, SeedError, SeedReport, TableSeed};
