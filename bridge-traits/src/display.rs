//! Text output surface
//!
//! The single place a screen renders its result to. Hosts back this with a
//! label widget; the desktop bridge writes to stdout.

use crate::platform::PlatformSendSync;

/// A text widget that shows one string at a time.
///
/// `set_text` is only ever called from the main executor, but the display may
/// be read from any thread.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::display::TextDisplay;
///
/// fn render(display: &dyn TextDisplay, value: &str) {
///     display.set_text(value);
/// }
/// ```
pub trait TextDisplay: PlatformSendSync {
    /// Replaces the displayed text.
    fn set_text(&self, text: &str);

    /// The text currently displayed.
    fn text(&self) -> String;
}
