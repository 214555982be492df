use std::env;
use std::ffi::OsString;
use std::sync::OnceLock;

pub const DUMP_CORE_VAR: &str = "EF_DUMPCORE";

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Abort with a core image instead of exiting.
    pub dump_core: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_value(env::var_os(DUMP_CORE_VAR))
    }

    /// Any non-empty value turns the toggle on, including "0".
    pub fn from_value(value: Option<OsString>) -> Self {
        Self {
            dump_core: value.is_some_and(|v| !v.is_empty()),
        }
    }
}

/// Installs the process-wide config. Returns `false` if one was already set.
pub fn install(config: Config) -> bool {
    let installed = CONFIG.set(config).is_ok();
    if installed {
        log::debug!("installed {config:?}");
    }
    installed
}

pub fn current() -> Config {
    *CONFIG.get_or_init(|| {
        let config = Config::from_env();
        log::debug!("loaded {config:?} from environment");
        config
    })
}
