pub mod model;
pub mod visibility;
