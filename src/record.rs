//! Searchable records and the key abstraction the algorithms work over.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Anything with a string key the sorter and searchers can compare on.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A single SKU record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    sku: String,
}

impl Record {
    pub fn new(sku: impl Into<String>) -> Self {
        Record { sku: sku.into() }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }
}

impl Keyed for Record {
    fn key(&self) -> &str {
        &self.sku
    }
}

impl<T: Keyed + ?Sized> Keyed for &T {
    fn key(&self) -> &str {
        (**self).key()
    }
}

impl<T: Keyed + ?Sized> Keyed for Rc<T> {
    fn key(&self) -> &str {
        (**self).key()
    }
}

impl Keyed for str {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for String {
    fn key(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sku)
    }
}
