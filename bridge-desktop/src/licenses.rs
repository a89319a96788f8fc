//! Console Licenses Screen Implementation

use bridge_traits::error::Result;
use bridge_traits::navigation::LicensesNavigator;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// A third-party component and the license it ships under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseNotice {
    pub component: String,
    pub license: String,
}

impl LicenseNotice {
    pub fn new(component: impl Into<String>, license: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            license: license.into(),
        }
    }
}

/// Notices for the libraries the desktop build links.
pub fn bundled_notices() -> Vec<LicenseNotice> {
    [
        ("async-trait", "MIT OR Apache-2.0"),
        ("chrono", "MIT OR Apache-2.0"),
        ("clap", "MIT OR Apache-2.0"),
        ("futures", "MIT OR Apache-2.0"),
        ("serde", "MIT OR Apache-2.0"),
        ("serde_json", "MIT OR Apache-2.0"),
        ("thiserror", "MIT OR Apache-2.0"),
        ("tokio", "MIT"),
        ("tokio-util", "MIT"),
        ("tracing", "MIT"),
        ("tracing-subscriber", "MIT"),
    ]
    .into_iter()
    .map(|(component, license)| LicenseNotice::new(component, license))
    .collect()
}

/// Licenses "screen" that writes the notice list to a writer.
pub struct ConsoleLicensesScreen {
    notices: Vec<LicenseNotice>,
    out: Mutex<Box<dyn Write + Send>>,
    opened: AtomicUsize,
}

impl ConsoleLicensesScreen {
    /// Writes the bundled notices to stdout.
    pub fn new() -> Self {
        Self::with_writer(bundled_notices(), Box::new(io::stdout()))
    }

    pub fn with_writer(notices: Vec<LicenseNotice>, out: Box<dyn Write + Send>) -> Self {
        Self {
            notices,
            out: Mutex::new(out),
            opened: AtomicUsize::new(0),
        }
    }

    pub fn notices(&self) -> &[LicenseNotice] {
        &self.notices
    }

    /// How many times the screen has been opened.
    pub fn times_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Default for ConsoleLicensesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LicensesNavigator for ConsoleLicensesScreen {
    fn open_licenses(&self) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "Open source licenses")?;
        for notice in &self.notices {
            writeln!(out, "  {:<20} {}", notice.component, notice.license)?;
        }
        out.flush()?;

        self.opened.fetch_add(1, Ordering::SeqCst);
        info!(count = self.notices.len(), "Opened licenses screen");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::BridgeError;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bundled_notices_cover_runtime() {
        let notices = bundled_notices();
        assert!(notices.iter().any(|n| n.component == "tokio"));
        assert!(notices.iter().any(|n| n.component == "tracing"));
    }

    #[test]
    fn test_open_writes_every_notice() {
        let buffer = SharedBuffer::default();
        let screen = ConsoleLicensesScreen::with_writer(
            vec![LicenseNotice::new("tokio", "MIT")],
            Box::new(buffer.clone()),
        );

        screen.open_licenses().unwrap();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(written.starts_with("Open source licenses"));
        assert!(written.contains("tokio"));
        assert_eq!(screen.times_opened(), 1);
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let screen = ConsoleLicensesScreen::with_writer(bundled_notices(), Box::new(BrokenPipe));

        let err = screen.open_licenses().unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
        assert_eq!(screen.times_opened(), 0);
    }
}
