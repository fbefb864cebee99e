//! Process wide string interner
//!
//! Spell names repeat on nearly every line, so per participant spell tables
//! store 4 byte keys instead of owned strings.

use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

/// Interned string key.
pub type IStr = Spur;

static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

pub fn interner() -> &'static ThreadedRodeo {
    INTERNER.get_or_init(ThreadedRodeo::default)
}

pub fn intern(s: &str) -> IStr {
    interner().get_or_intern(s)
}

pub fn resolve(key: IStr) -> &'static str {
    interner().resolve(&key)
}
