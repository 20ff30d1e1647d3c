use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter (`env_logger` syntax)
pub const LOG_ENV: &str = "KB_LOG";

/// Log to stderr. Used by the CLI.
pub fn init_stderr() {
    let _ = Builder::from_env(Env::default().filter_or(LOG_ENV, "warn"))
        .target(Target::Stderr)
        .try_init();
}

/// Log to a file so the terminal UI stays clean. Falls back to discarding
/// output if the file can't be opened.
pub fn init_file(path: &Path) {
    let mut builder = Builder::from_env(Env::default().filter_or(LOG_ENV, "warn"));
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}
