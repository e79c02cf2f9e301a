//! Locale-aware key ordering backed by ICU collation.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::KeyOrder;

/// Orders keys the way a reader of `locale` expects ("a" < "B" < "é" < "z").
///
/// `und` selects the CLDR root collation.
pub struct LocaleCollator {
    locale: String,
    collator: Collator,
}

impl LocaleCollator {
    pub fn new(locale: &str) -> ApplicationResult<Self> {
        let parsed: Locale = locale.parse().map_err(|e| ApplicationError::Locale {
            locale: locale.to_string(),
            message: format!("{e}"),
        })?;

        let collator = Collator::try_new(&parsed.into(), CollatorOptions::new()).map_err(|e| {
            ApplicationError::Locale {
                locale: locale.to_string(),
                message: format!("{e}"),
            }
        })?;

        Ok(Self {
            locale: locale.to_string(),
            collator,
        })
    }
}

impl KeyOrder for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

impl fmt::Debug for LocaleCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCollator")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
