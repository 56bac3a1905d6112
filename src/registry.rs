use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::operations::{raw_operations, RawOperation};

static OPERATIONS: Lazy<HashMap<&'static str, RawOperation>> =
    Lazy::new(|| raw_operations().into_iter().collect());

/// Resolve an operation name to its canonical name and JSON entry point.
pub(crate) fn lookup(name: &str) -> Option<(&'static str, RawOperation)> {
    OPERATIONS
        .get_key_value(name)
        .map(|(name, raw)| (*name, *raw))
}
