mod health;
mod resolve;

pub use health::health;
pub use resolve::{resolve_path, resolve_root};
