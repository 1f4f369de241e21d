pub mod config;
pub mod errors;
pub mod filters;
pub mod results;
pub mod search;

pub use config::{DispatchMode, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use results::SearchSummary;
pub use search::matcher::Needle;
pub use search::scanner::WindowScanner;
pub use search::search;
