pub mod model;

pub use model::{load_image, parse_image};
