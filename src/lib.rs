//! Error reporting for command-line programs.
//!
//! Every report is a single line on stderr, `ERROR [ENOENT No such file or
//! directory] open foo.txt`, optionally followed by process termination.
//! Setting `EF_DUMPCORE` to a non-empty value makes every terminating report
//! abort with a core image instead of exiting.

pub mod buffer;
pub mod config;
pub mod ename;
pub mod errno;
pub mod report;
pub mod terminate;

pub use self::config::Config;
pub use self::errno::Errno;
pub use self::report::{
    cmd_line_err, err_exit, err_exit_en, err_exit_immediate, err_msg, fatal, report, usage_err,
    Annotation, OrExit,
};
pub use self::terminate::{ExitMode, Termination};

/// Reports with the current `errno` and returns.
#[macro_export]
macro_rules! err_msg {
    ($($arg:tt)*) => {
        $crate::err_msg(::std::format_args!($($arg)*))
    };
}

/// Reports with the current `errno`, then exits.
#[macro_export]
macro_rules! err_exit {
    ($($arg:tt)*) => {
        $crate::err_exit(::std::format_args!($($arg)*))
    };
}

/// Reports with the current `errno` without flushing stdout, then `_exit`s.
#[macro_export]
macro_rules! err_exit_now {
    ($($arg:tt)*) => {
        $crate::err_exit_immediate(::std::format_args!($($arg)*))
    };
}

/// Reports with the given error number, then exits.
#[macro_export]
macro_rules! err_exit_en {
    ($errno:expr, $($arg:tt)*) => {
        $crate::err_exit_en($crate::Errno($errno), ::std::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        $crate::fatal(::std::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! usage_err {
    ($($arg:tt)*) => {
        $crate::usage_err(::std::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! cmd_line_err {
    ($($arg:tt)*) => {
        $crate::cmd_line_err(::std::format_args!($($arg)*))
    };
}
