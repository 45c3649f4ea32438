pub(crate) mod calendar;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod local;
pub(crate) mod media;
pub(crate) mod media_cache;
pub(crate) mod mode;
pub(crate) mod projects;

use std::future::Future;
use std::io::Write;

use worksite_lib::{ApiMode, DataSource, Settings};

use crate::error::CliError;
use crate::spinner::with_spinner;

/// State shared by every command for one run.
pub(crate) struct Context {
    pub settings: Settings,
    pub mode: ApiMode,
    pub quiet: bool,
}

impl Context {
    /// Resolve settings and apply a `--mode` override.
    pub(crate) fn load(mode: Option<ApiMode>, quiet: bool) -> Result<Self, CliError> {
        let settings = Settings::resolve()?;
        let mode = mode.unwrap_or(settings.api.mode);
        log::debug!("Mode: {}", mode);
        Ok(Self {
            settings,
            mode,
            quiet,
        })
    }

    pub(crate) fn open_store(&self) -> Result<DataSource, CliError> {
        Ok(DataSource::open(&self.settings, self.mode)?)
    }

    /// Await `task`, with a spinner when it goes over the network.
    pub(crate) async fn wait<F, T>(&self, msg: &str, task: F) -> T
    where
        F: Future<Output = T>,
    {
        if self.mode.is_remote() {
            with_spinner(self.quiet, msg, task).await
        } else {
            task.await
        }
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` means no.
pub(crate) fn confirm(question: &str) -> Result<bool, CliError> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
