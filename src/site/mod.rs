pub mod catalog;
pub mod config;
pub mod describe;
pub mod history;
pub mod janitor;
pub mod paths;
pub mod render;
pub mod sampler;
pub mod sidebar;
pub mod warn;
