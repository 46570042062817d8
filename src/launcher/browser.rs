//! Client view opening.

use std::cell::RefCell;
use std::io;

/// Opens a URL in the operator's browser.
pub trait BrowserOpener {
    /// Hand `url` to the browser and return without waiting for it.
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        tracing::debug!("Opening {}", url);
        open::that_detached(url)
    }
}

/// Browser double that records the URLs it was asked to open.
#[derive(Debug, Default)]
pub struct MockBrowser {
    opened: RefCell<Vec<String>>,
    fails: bool,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A browser that cannot be launched.
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Default::default()
        }
    }

    /// URLs passed to `open`, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl BrowserOpener for MockBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        if self.fails {
            Err(io::Error::new(io::ErrorKind::NotFound, "no browser available"))
        } else {
            Ok(())
        }
    }
}
