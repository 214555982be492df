use std::fmt;
use std::io::{self, Write};

use crate::buffer::MessageBuffer;
use crate::errno::Errno;
use crate::terminate::{ExitMode, Termination};

/// What follows `ERROR` on a report line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    /// ` [NAME description]`
    Errno(Errno),
    /// `:`
    Colon,
    /// Nothing.
    Bare,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Errno(errno) => write!(f, " [{} {}]", errno.name(), errno.description()),
            Self::Colon => f.write_str(":"),
            Self::Bare => Ok(()),
        }
    }
}

/// Builds `ERROR<annotation> <message>\n`. Each part, and the line as a
/// whole, is cut to the buffer capacity.
pub fn compose(annotation: Annotation, args: fmt::Arguments<'_>) -> MessageBuffer {
    let message = MessageBuffer::format(args);
    let suffix = MessageBuffer::format(format_args!("{annotation}"));
    MessageBuffer::format(format_args!("ERROR{suffix} {message}\n"))
}

/// Writes one report line to stderr. Write errors are dropped.
pub fn report(annotation: Annotation, flush_stdout: bool, args: fmt::Arguments<'_>) {
    let line = compose(annotation, args);

    if flush_stdout {
        let _ = io::stdout().flush();
    }

    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(line.as_ref());
    let _ = stderr.flush();
}

/// Reports with the current `errno`, leaving `errno` as it found it.
pub fn err_msg(args: fmt::Arguments<'_>) {
    let saved = Errno::last();
    report(Annotation::Errno(saved), true, args);
    saved.set_last();
}

pub fn err_exit(args: fmt::Arguments<'_>) -> ! {
    let errno = Errno::last();
    let termination = Termination::prepare(ExitMode::Normal);
    report(Annotation::Errno(errno), true, args);
    termination.execute()
}

/// Like [`err_exit`], but leaves stdout untouched and ends the process with
/// `_exit`, so buffered output inherited across `fork` is not written twice.
pub fn err_exit_immediate(args: fmt::Arguments<'_>) -> ! {
    let errno = Errno::last();
    let termination = Termination::prepare(ExitMode::Immediate);
    report(Annotation::Errno(errno), false, args);
    termination.execute()
}

pub fn err_exit_en(errno: Errno, args: fmt::Arguments<'_>) -> ! {
    let termination = Termination::prepare(ExitMode::Normal);
    report(Annotation::Errno(errno), true, args);
    termination.execute()
}

/// For failures that carry no OS error code.
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    let termination = Termination::prepare(ExitMode::Normal);
    report(Annotation::Bare, true, args);
    termination.execute()
}

pub fn usage_err(args: fmt::Arguments<'_>) -> ! {
    usage_line("Usage: ", args)
}

pub fn cmd_line_err(args: fmt::Arguments<'_>) -> ! {
    usage_line("Command-line usage error: ", args)
}

fn usage_line(prefix: &str, args: fmt::Arguments<'_>) -> ! {
    let _ = io::stdout().flush();

    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(prefix.as_bytes());
    let _ = stderr.write_fmt(args);
    let _ = stderr.flush();

    std::process::exit(libc::EXIT_FAILURE)
}

/// Unwraps a result or reports the error and exits.
pub trait OrExit<T> {
    fn or_exit(self, what: impl fmt::Display) -> T;
}

impl<T> OrExit<T> for io::Result<T> {
    fn or_exit(self, what: impl fmt::Display) -> T {
        match self {
            Ok(value) => value,
            Err(err) if err.raw_os_error().is_some() => {
                err_exit_en(Errno::from(&err), format_args!("{what}"))
            }
            Err(err) => fatal(format_args!("{what}: {err}")),
        }
    }
}

impl<T> OrExit<T> for anyhow::Result<T> {
    fn or_exit(self, what: impl fmt::Display) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                let code = err
                    .chain()
                    .find_map(|cause| cause.downcast_ref::<io::Error>()?.raw_os_error());

                match code {
                    Some(code) => err_exit_en(Errno(code), format_args!("{what}: {err}")),
                    None => fatal(format_args!("{what}: {err:#}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::buffer::BUF_SIZE;

    #[test]
    fn enoent_annotation() {
        let line = compose(
            Annotation::Errno(Errno(libc::ENOENT)),
            format_args!("open {}", "missing.txt"),
        );
        assert_eq!(
            line.as_str(),
            "ERROR [ENOENT No such file or directory] open missing.txt\n"
        );
    }

    #[test]
    fn colon_annotation() {
        let line = compose(Annotation::Colon, format_args!("read failed"));
        assert_eq!(line.as_str(), "ERROR: read failed\n");
    }

    #[test]
    fn bare_annotation() {
        let line = compose(Annotation::Bare, format_args!("bad state"));
        assert_eq!(line.as_str(), "ERROR bad state\n");
    }

    #[test]
    fn unknown_codes_use_sentinel() {
        for code in [-5, 0, 10_000] {
            let line = compose(Annotation::Errno(Errno(code)), format_args!("x"));
            assert!(line.as_str().starts_with("ERROR [?UNKNOWN? "), "{line:?}");
            assert!(line.as_str().ends_with("] x\n"), "{line:?}");
        }
    }

    #[test]
    fn exactly_one_bracketed_suffix_when_annotated() {
        let line = compose(Annotation::Errno(Errno(libc::EINVAL)), format_args!("n={}", 3));
        assert_eq!(line.as_str().matches(" [").count(), 1);
        assert_eq!(line.as_str().matches(']').count(), 1);

        for annotation in [Annotation::Colon, Annotation::Bare] {
            let line = compose(annotation, format_args!("n={}", 3));
            assert!(!line.as_str().contains('['));
        }
    }

    #[test]
    fn overlong_message_is_truncated() {
        let long = "m".repeat(BUF_SIZE * 2);
        let line = compose(Annotation::Bare, format_args!("{long}"));
        assert_eq!(line.len(), BUF_SIZE - 1);
        assert!(line.as_str().starts_with("ERROR mmm"));
    }

    #[test]
    #[serial]
    fn err_msg_keeps_errno() {
        Errno(libc::EBADF).set_last();
        err_msg(format_args!("unit test line, ignore"));
        assert_eq!(Errno::last(), Errno(libc::EBADF));
    }

    #[test]
    fn or_exit_passes_values_through() {
        let ok: io::Result<u8> = Ok(7);
        assert_eq!(ok.or_exit("unused"), 7);

        let ok: anyhow::Result<&str> = Ok("fine");
        assert_eq!(ok.or_exit("unused"), "fine");
    }
}
