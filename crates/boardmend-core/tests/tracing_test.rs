//! Tests for the tracing setup.

use std::sync::Mutex;

use boardmend_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
}

#[test]
fn invalid_filter_falls_back_to_default() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("BOARDMEND_LOG", "this_is=not=a_valid_filter");
    init_tracing();
    std::env::remove_var("BOARDMEND_LOG");
}
