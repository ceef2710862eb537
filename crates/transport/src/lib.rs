pub mod error;
pub mod http;
pub mod mock;

pub use error::*;
pub use http::*;
pub use mock::*;
