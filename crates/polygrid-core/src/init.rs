//! Process-wide initialization.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the library. Hosts call this once at startup, before any
/// surface is created; later calls do nothing.
///
/// Returns `true` for the call that performed the initialization.
pub fn init() -> bool {
    let mut first = false;
    INIT.call_once(|| {
        log::info!("polygrid-core {} initialized", env!("CARGO_PKG_VERSION"));
        first = true;
    });
    first
}

/// Whether [`init`] has run.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
