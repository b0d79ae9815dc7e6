//! `log` + `env_logger` wiring. `-v` is repeatable up to 3 and maps to a
//! progressively more verbose default level; `RUST_LOG` always wins if
//! the user has set it explicitly.

use std::env;

/// Initializes the global logger. `verbosity` is the number of times `-v`
/// was passed (0-3); it only picks a *default* filter — an explicit
/// `RUST_LOG` in the environment is never overridden.
pub fn init_logs(verbosity: u8) {
    if env::var("RUST_LOG").is_err() {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env::set_var("RUST_LOG", level);
    }
    let _ = env_logger::builder().format_timestamp(None).try_init();
}
