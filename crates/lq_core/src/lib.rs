pub mod domain;
pub mod error;
pub mod normalize;
pub mod segment;
pub mod store;
