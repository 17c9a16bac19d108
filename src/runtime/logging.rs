use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};

pub const LOG_FILE: &str = "cadenza.log";

/// Initialise `env_logger` (`RUST_LOG`, default `info`). The terminal
/// belongs to the UI, so records go to `<data_dir>/cadenza.log` and are
/// dropped when no data directory is usable.
pub fn init(data_dir: Option<&Path>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    let file = data_dir.and_then(|dir| {
        fs::create_dir_all(dir).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });
    match file {
        Some(file) => builder.target(Target::Pipe(Box::new(file))),
        None => builder.target(Target::Pipe(Box::new(std::io::sink()))),
    };

    let _ = builder.try_init();
}
