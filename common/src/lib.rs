pub mod body;
pub mod shapes;

pub use body::{Body, BodyRef};
pub use shapes::BoundaryBox;
