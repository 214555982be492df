use std::ffi::CStr;
use std::io;

use crate::ename;

/// An operating-system error number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Errno(pub libc::c_int);

impl Errno {
    /// The calling thread's last OS error.
    pub fn last() -> Self {
        Self(io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }

    /// Overwrites the calling thread's `errno`.
    pub fn set_last(self) {
        unsafe { *errno_location() = self.0 }
    }

    pub fn name(self) -> &'static str {
        ename::lookup(self.0)
    }

    pub fn description(self) -> String {
        let mut buf = [0 as libc::c_char; 256];
        let rc = unsafe { libc::strerror_r(self.0, buf.as_mut_ptr(), buf.len()) };
        if rc != 0 {
            return format!("Unknown error {}", self.0);
        }

        let err = unsafe { CStr::from_ptr(buf.as_ptr()) };
        err.to_string_lossy().into_owned()
    }
}

impl From<&io::Error> for Errno {
    fn from(err: &io::Error) -> Self {
        Self(err.raw_os_error().unwrap_or(0))
    }
}

#[cfg(any(target_os = "linux", target_os = "emscripten", target_os = "redox"))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__errno_location()
}

#[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__errno()
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__error()
}
