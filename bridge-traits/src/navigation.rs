//! Screen navigation

use crate::{error::Result, platform::PlatformSendSync};

/// Opens the third-party license notices screen.
///
/// - **Android**: the OSS licenses activity
/// - **Desktop**: prints the bundled notices
pub trait LicensesNavigator: PlatformSendSync {
    fn open_licenses(&self) -> Result<()>;
}
