// Configuration loading and runtime settings

pub mod loader;
pub mod settings;

pub use loader::load_settings;
pub use settings::Settings;
