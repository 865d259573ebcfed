pub mod error;
pub mod fetch;
pub mod loader;
pub mod logging;
pub mod rows;
pub mod similarity;

pub use error::LoadError;
pub use loader::{load, load_asset, AssetPath, LoadInput, LoadResult, RouteParams};
pub use rows::Row;
