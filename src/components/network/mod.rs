mod camera;
mod component;
mod config;
mod csv;
mod edges;
mod loader;
mod palette;
mod panel;
mod registry;
mod render;
mod scene;
mod state;
mod types;

pub use component::NetworkViewer;
pub use config::NetworkConfig;
