// Infrastructure adapters: tabular input and export destinations

pub mod csv_sink;
pub mod csv_source;
