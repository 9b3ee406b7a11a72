pub mod locator;
pub mod orientation;
pub mod video;

pub use locator::Locator;
pub use orientation::Orientation;
pub use video::{CreateVideoRequest, Video};
