//! Spinner shown while waiting on the network.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Run `task` with a spinner showing `msg`. Hidden when `quiet`.
pub(crate) async fn with_spinner<F, T>(quiet: bool, msg: impl Into<String>, task: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("/-\\|"));
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;

    pb.disable_steady_tick();
    pb.finish_and_clear();
    result
}
