mod animation;
mod component;
mod config;
mod curve;
mod dom;
mod error;
mod geometry;
mod graph;
mod render;
mod resolve;
mod state;
mod types;
mod visibility;

pub use component::FamilyTreeCanvas;
pub use config::TreeConfig;
pub use error::TreeError;
pub use graph::FamilyGraph;
pub use types::Person;
