pub mod paths;
pub mod profile;
pub mod settings;

pub use paths::{AppPaths, stamped_file_name};
pub use profile::resolve_profile;
pub use settings::{Settings, TransportKind};

use crate::error::AppResult;

pub fn load_settings(paths: &AppPaths, profile: &str) -> AppResult<Settings> {
    settings::load(paths.settings_file(profile))
}
