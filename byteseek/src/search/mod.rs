//! The search core: the pattern and its exact-match primitive
//! ([`matcher`]), the bounded-memory window scan over one byte source
//! ([`scanner`]), and the fan-out over a directory tree ([`dispatcher`]).

pub mod dispatcher;
pub mod matcher;
pub mod scanner;

pub use dispatcher::search;
pub use matcher::Needle;
pub use scanner::WindowScanner;
