use crate::config::{self, AppPaths, Settings};
use crate::error::AppResult;
use crate::output::Output;
use crate::queue::Spool;
use crate::transport::Transport;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub verbose: u8,
    pub paths: AppPaths,
    pub settings: Settings,
    pub spool: Spool,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool, verbose: u8) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile);
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        let spool = Spool::new(paths.queue_dir(&profile), paths.dead_letter_dir(&profile));
        let output = Output::new(json);

        Ok(Self {
            profile,
            verbose,
            paths,
            settings,
            spool,
            output,
        })
    }

    /// Built on demand so commands that never send do not need credentials.
    pub fn transport(&self) -> AppResult<Transport> {
        Transport::from_settings(&self.settings, &self.paths, &self.profile)
    }
}
