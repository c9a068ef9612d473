pub mod models;
pub mod params;
pub mod traits;

pub use models::*;
pub use params::*;
pub use traits::*;
