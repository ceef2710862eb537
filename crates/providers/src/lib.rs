pub mod auth;
pub mod baidu;
pub mod bing;
pub mod classify;
pub mod error;
pub mod google;
pub mod indexnow;
pub mod traits;

pub use auth::*;
pub use baidu::*;
pub use bing::*;
pub use classify::*;
pub use error::*;
pub use google::*;
pub use indexnow::*;
pub use traits::*;
