use crate::config::{self, Config};

/// How a failing process should end when no core dump is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitMode {
    /// `exit`: flushes std buffers and runs cleanup.
    Normal,
    /// `_exit`: skips cleanup, e.g. in a forked child sharing stdio buffers.
    Immediate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Abort,
    Exit(i32),
    ImmediateExit(i32),
}

impl Termination {
    pub fn decide(config: &Config, mode: ExitMode) -> Self {
        if config.dump_core {
            return Self::Abort;
        }

        match mode {
            ExitMode::Normal => Self::Exit(libc::EXIT_FAILURE),
            ExitMode::Immediate => Self::ImmediateExit(libc::EXIT_FAILURE),
        }
    }

    /// Decides with the installed config. Call before the report is written
    /// so nothing follows the report line.
    pub fn prepare(mode: ExitMode) -> Self {
        let termination = Self::decide(&config::current(), mode);
        log::debug!("will terminate: {termination:?}");
        termination
    }

    pub fn execute(self) -> ! {
        match self {
            Self::Abort => std::process::abort(),
            Self::Exit(code) => std::process::exit(code),
            Self::ImmediateExit(code) => unsafe { libc::_exit(code) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_core_wins_over_mode() {
        let config = Config { dump_core: true };
        assert_eq!(Termination::decide(&config, ExitMode::Normal), Termination::Abort);
        assert_eq!(Termination::decide(&config, ExitMode::Immediate), Termination::Abort);
    }

    #[test]
    fn exit_modes() {
        let config = Config::default();
        assert_eq!(Termination::decide(&config, ExitMode::Normal), Termination::Exit(1));
        assert_eq!(
            Termination::decide(&config, ExitMode::Immediate),
            Termination::ImmediateExit(1)
        );
    }
}
