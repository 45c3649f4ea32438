//! Logger setup.
//!
//! Normal command output goes through `log::info!` so that `--quiet` can
//! silence it and `--logfile` can capture it.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

/// Writes each record to stderr and, when set, to a log file with ANSI
/// escape codes removed.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Install the global logger.
///
/// `quiet` keeps warnings and errors only; `verbose` enables debug output
/// from the worksite crates with timestamps.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = match logfile {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("worksite", level)
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .format(move |buf, record| {
            if verbose {
                return writeln!(
                    buf,
                    "{} {:<5} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
            match record.level() {
                Level::Error => writeln!(
                    buf,
                    "{} {}",
                    "error:".if_supports_color(Stderr, |t| t.red()),
                    record.args()
                ),
                Level::Warn => writeln!(
                    buf,
                    "{} {}",
                    "warning:".if_supports_color(Stderr, |t| t.yellow()),
                    record.args()
                ),
                _ => writeln!(buf, "{}", record.args()),
            }
        });
    builder
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tee_strips_colors_from_logfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worksite.log");
        let mut tee = TeeWriter {
            file: Some(File::create(&path).unwrap()),
        };
        let line = format!("{} Uploaded a.jpg\n", "\u{2714}".green());
        tee.write_all(line.as_bytes()).unwrap();
        tee.flush().unwrap();

        let logged = std::fs::read_to_string(&path).unwrap();
        assert_eq!(logged, "\u{2714} Uploaded a.jpg\n");
    }
}
