mod dispatch;
mod parse;

pub use cli::dispatch::dispatch;
pub use cli::parse::parse_from_safe;

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Invocation {
    pub config_path: Option<PathBuf>,
    pub verbosity: u64,
    pub command: Command,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Bring {
        section: String,
        action: Action,
        profile: Option<String>,
        timeout: Option<Duration>,
    },
    Stat {
        section: String,
        profile: Option<String>,
        all: bool,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Up,
    Down,
}
