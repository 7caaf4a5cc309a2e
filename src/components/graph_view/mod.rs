mod clock;
mod component;
mod error;
mod geometry;
mod interaction;
mod layout;
pub mod links;
mod model;
mod render;
mod state;
mod types;

pub use component::GraphView;
pub use model::GraphModel;
pub use types::Note;
