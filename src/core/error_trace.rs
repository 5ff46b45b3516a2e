//! Active error trace capture
//!
//! Stands in for the runtime's "currently active exception": a thread-local
//! slot holding the most recently recorded error trace. A log call made with
//! `print_exception` attaches the slot's contents when present; an empty
//! slot is not an error.

use std::cell::RefCell;
use std::error::Error;

thread_local! {
    static ACTIVE_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Record an error (and its source chain) as the active trace for this
/// thread. Overwrites any previously recorded trace.
pub fn record_active_error(err: &(dyn Error + '_)) {
    set_active_trace(format_error_chain(err));
}

/// Clear the active trace for this thread.
pub fn clear_active_error() {
    ACTIVE_TRACE.with(|slot| slot.borrow_mut().take());
}

/// The currently active trace, if one has been recorded on this thread.
pub fn current_trace() -> Option<String> {
    ACTIVE_TRACE.with(|slot| slot.borrow().clone())
}

pub(crate) fn set_active_trace(trace: String) {
    ACTIVE_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
}

/// Render an error and its `source()` chain as multi-line trace text.
pub fn format_error_chain(err: &(dyn Error + '_)) -> String {
    let mut out = format!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!("\nCaused by: {}", cause));
        source = cause.source();
    }
    out
}
