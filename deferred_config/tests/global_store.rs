//! Tests for the process-wide store access point.
//!
//! The global store lives for the whole test binary, so every test here is
//! written to hold regardless of which one runs first.

use std::sync::atomic::{AtomicUsize, Ordering};

use deferred_config::{CommitSlot, ConfigError, ConfigStore};
use serial_test::serial;

static BUILDS: AtomicUsize = AtomicUsize::new(0);

fn build_store() -> ConfigStore {
    BUILDS.fetch_add(1, Ordering::SeqCst);
    ConfigStore::builder(CommitSlot::new()).build()
}

#[test]
#[serial]
fn global_store_initialises_once() {
    let first = ConfigStore::global_or_init(build_store);
    let second = ConfigStore::global_or_init(build_store);
    assert!(std::ptr::eq(first, second));
    assert!(BUILDS.load(Ordering::SeqCst) <= 1);
    assert!(ConfigStore::try_global().is_some());
}

#[test]
#[serial]
fn installing_over_existing_store_fails() {
    let existing = ConfigStore::global_or_init(build_store);
    let err = ConfigStore::init_global(ConfigStore::builder(CommitSlot::new()).build())
        .expect_err("global store already exists");
    assert!(matches!(err, ConfigError::AlreadyInitialised));
    let current = ConfigStore::try_global().expect("global store present");
    assert!(std::ptr::eq(existing, current));
}
