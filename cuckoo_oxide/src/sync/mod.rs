//! Striped locking primitives

mod stripe_lock;

pub(crate) use stripe_lock::StripeLock;
