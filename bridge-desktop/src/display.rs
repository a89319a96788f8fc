//! Console Text Display Implementation

use bridge_traits::display::TextDisplay;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Text display that keeps the current text in memory and echoes every
/// update to stdout.
#[derive(Debug)]
pub struct ConsoleTextDisplay {
    text: Mutex<String>,
    echo: bool,
}

impl ConsoleTextDisplay {
    /// A display that echoes updates to stdout.
    pub fn new() -> Self {
        Self {
            text: Mutex::new(String::new()),
            echo: true,
        }
    }

    /// A display that only records the text.
    pub fn quiet() -> Self {
        Self {
            echo: false,
            ..Self::new()
        }
    }
}

impl Default for ConsoleTextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDisplay for ConsoleTextDisplay {
    fn set_text(&self, text: &str) {
        let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        current.clear();
        current.push_str(text);
        trace!(text, "Display updated");
        if self.echo {
            println!("[display] {text}");
        }
    }

    fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
