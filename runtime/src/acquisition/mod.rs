//! Input acquisition: HTTP fetching and spreadsheet loading.

pub mod http_client;
pub mod sheet;

pub use http_client::HttpClient;
pub use sheet::{load_input_table, load_input_table_from, TableOrigin};
