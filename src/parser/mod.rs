pub mod config;
pub mod line;
pub mod patterns;
pub mod tree;
