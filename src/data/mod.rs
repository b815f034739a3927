pub mod export;
pub mod loader;

pub use export::{export_file_name, export_series, write_series_csv};
pub use loader::{load_price_table, load_price_table_from_reader};
