//! Key ordering used by the sorter.

use std::cmp::Ordering;

/// Comparison of mapping keys.
///
/// Implementations may report `Equal` for distinct keys (e.g. a collator at
/// reduced strength); the sorter breaks such ties by code point.
pub trait KeyOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Plain code-point order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodePointOrder;

impl KeyOrder for CodePointOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Compare with `order`, falling back to code points on ties.
pub fn total_cmp(order: &dyn KeyOrder, a: &str, b: &str) -> Ordering {
    order.compare(a, b).then_with(|| a.cmp(b))
}
