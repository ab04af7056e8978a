//! A progress bar around the file being read, drawn with `indicatif`.
//!
//! The bar is drawn on stderr so it never mixes with decompressed data written to stdout.

use std::fmt::Write;
use std::io::Read;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

/// Wraps a reader and advances a progress bar by every byte read from it.
///
/// Once `total` bytes went through, the bar is cleared and a summary is logged.
pub struct ProgressMonitor<R: Read> {
    /// Size of the file behind `reader`
    total: u64,
    read: u64,
    reader: R,
    action: &'static str,
    progress_bar: ProgressBar,
}

impl<R: Read> ProgressMonitor<R> {
    /// `action` names what happens to the bytes in the final summary, eg. "compressed".
    pub fn new(reader: R, total: u64, action: &'static str, hidden: bool) -> Self {
        let progress_bar = ProgressBar::new(total);
        // the template is a constant, if it doesn't parse fall back to the default style
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner} {wide_bar} {binary_bytes}/{binary_total_bytes} [{eta} left]",
        ) {
            progress_bar.set_style(style);
        }
        let target = if hidden {
            ProgressDrawTarget::hidden()
        } else {
            // fewer redraws than the 20hz default
            ProgressDrawTarget::stderr_with_hz(8)
        };
        progress_bar.set_draw_target(target);
        Self {
            total,
            read: 0,
            reader,
            action,
            progress_bar,
        }
    }

    fn update(&mut self, delta: usize) {
        self.progress_bar.inc(delta as u64);
        if self.read >= self.total && !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
            let elapsed = self.progress_bar.elapsed();
            info!(
                "{} {} in {} ({}/s)",
                self.action,
                fmt_size(self.total),
                fmt_duration(elapsed),
                fmt_size((self.total as f64 / elapsed.as_secs_f64().max(1e-9)) as u64)
            );
        }
    }
}

impl<R: Read> Read for ProgressMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.read += n as u64;
        self.update(n);
        Ok(n)
    }
}

/// Byte count with a binary unit, "1.50KiB". Plain bytes have no decimals.
pub fn fmt_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}{}", UNITS[0])
    } else {
        format!("{scaled:.2}{}", UNITS[unit])
    }
}

/// Duration in the coarsest units that still say something: "1h 20m 30s", "4.2s", "7.00ms".
pub fn fmt_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let secs = duration.as_secs_f64() % 60.0;

    let mut output = String::with_capacity(12);
    if hours > 0 {
        let _ = write!(output, "{hours}h ");
    }
    if minutes > 0 {
        let _ = write!(output, "{minutes}m ");
    }
    if total_secs >= 60 {
        if secs >= 0.5 {
            let _ = write!(output, "{:.0}s", secs);
        }
    } else if secs >= 4.0 {
        let _ = write!(output, "{secs:.1}s");
    } else if secs >= 1.0 {
        let _ = write!(output, "{secs:.2}s");
    } else {
        let _ = write!(output, "{:.2}ms", secs * 1000.0);
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::time::Duration;

    use super::{fmt_duration, fmt_size, ProgressMonitor};

    #[test]
    fn human_readable_size() {
        assert_eq!(fmt_size(0), "0B");
        assert_eq!(fmt_size(100), "100B");
        assert_eq!(fmt_size(1023), "1023B");
        assert_eq!(fmt_size(1536), "1.50KiB");
        assert_eq!(fmt_size(7 * (1 << 20)), "7.00MiB");
        assert_eq!(fmt_size(123 * (1 << 30)), "123.00GiB");
    }

    #[test]
    fn human_readable_duration() {
        assert_eq!(fmt_duration(Duration::from_millis(7)), "7.00ms");
        assert_eq!(fmt_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(fmt_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(fmt_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(fmt_duration(Duration::from_secs(5 * 60)), "5m");
        assert_eq!(fmt_duration(Duration::from_secs(3 * 60 * 60)), "3h");
        assert_eq!(
            fmt_duration(Duration::from_secs(60 * 60 + 20 * 60 + 30)),
            "1h 20m 30s"
        );
    }

    #[test]
    fn monitor_passes_bytes_through() {
        let data = b"every byte has to come out the other side".to_vec();
        let mut monitor = ProgressMonitor::new(data.as_slice(), data.len() as u64, "read", true);
        let mut out = Vec::new();
        monitor.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(monitor.read, data.len() as u64);
        assert!(monitor.progress_bar.is_finished());
    }
}
