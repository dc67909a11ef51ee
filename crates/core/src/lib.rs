pub mod models;
pub mod response;
pub mod traits;

pub use models::*;
pub use response::*;
pub use traits::*;
