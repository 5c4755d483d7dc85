pub mod defaults;
pub mod executable;
pub mod settings;

pub use executable::find_executable;
pub use settings::Settings;
