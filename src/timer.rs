//! CPU-time measurement, grounded on `original_source/src/timer.c`: the
//! original calls `getrusage(RUSAGE_SELF, ...)` on POSIX and falls back to
//! `clock()` on Windows, summing user and system time. We do the same via
//! `libc`, with `std::time::Instant` as the portable fallback on platforms
//! where `getrusage` isn't available.

/// A CPU-time clock, started once per solve and polled throughout the
/// search to decide when the time limit has elapsed.
pub struct Timer {
    #[cfg(unix)]
    _private: (),
    #[cfg(not(unix))]
    start: std::time::Instant,
}

impl Timer {
    pub fn start() -> Self {
        Timer {
            #[cfg(unix)]
            _private: (),
            #[cfg(not(unix))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds of CPU time (user + system) consumed by this process so far
    /// on unix; wall-clock seconds since `start()` elsewhere.
    #[cfg(unix)]
    pub fn elapsed_secs(&self) -> f64 {
        unsafe {
            let mut usage: libc::rusage = std::mem::zeroed();
            libc::getrusage(libc::RUSAGE_SELF, &mut usage);
            let user = usage.ru_utime.tv_sec as f64 + usage.ru_utime.tv_usec as f64 / 1_000_000.0;
            let sys = usage.ru_stime.tv_sec as f64 + usage.ru_stime.tv_usec as f64 / 1_000_000.0;
            user + sys
        }
    }

    #[cfg(not(unix))]
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
