//! Phone numbers picked from the address book.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneNumberError {
    #[error("phone number is empty")]
    Empty,
}

/// A phone number with all whitespace removed.
///
/// No other canonicalisation: "+1 555" and "1555" are different numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, PhoneNumberError> {
        let normalized: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if normalized.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientList(Vec<PhoneNumber>);

impl RecipientList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the number was already present.
    pub fn insert(&mut self, number: PhoneNumber) -> bool {
        if self.0.contains(&number) {
            return false;
        }
        self.0.push(number);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhoneNumber> {
        self.0.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<PhoneNumber> {
        self.0.clone()
    }
}

impl FromIterator<PhoneNumber> for RecipientList {
    fn from_iter<I: IntoIterator<Item = PhoneNumber>>(iter: I) -> Self {
        let mut list = Self::new();
        for number in iter {
            list.insert(number);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_strips_whitespace() {
        let number = PhoneNumber::parse(" +1 555 123\t4567 ").unwrap();
        assert_eq!(number.as_str(), "+15551234567");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneNumberError::Empty));
        assert_eq!(PhoneNumber::parse(""), Err(PhoneNumberError::Empty));
    }

    #[test]
    fn test_duplicate_after_normalisation() {
        let mut list = RecipientList::new();
        assert!(list.insert(PhoneNumber::parse("+1 555 123 4567").unwrap()));
        assert!(!list.insert(PhoneNumber::parse("+15551234567").unwrap()));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_no_country_code_canonicalisation() {
        let mut list = RecipientList::new();
        list.insert(PhoneNumber::parse("+15551234567").unwrap());
        list.insert(PhoneNumber::parse("5551234567").unwrap());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_keeps_insertion_order() {
        let list: RecipientList = ["3", "1", "2", "1"]
            .into_iter()
            .map(|n| PhoneNumber::parse(n).unwrap())
            .collect();
        let order: Vec<&str> = list.iter().map(PhoneNumber::as_str).collect();
        assert_eq!(order, ["3", "1", "2"]);
    }

    proptest! {
        #[test]
        fn prop_inserting_twice_keeps_one_entry(raw in "[+0-9 ]{1,16}") {
            prop_assume!(raw.chars().any(|c| !c.is_whitespace()));
            let mut list = RecipientList::new();
            list.insert(PhoneNumber::parse(&raw).unwrap());
            list.insert(PhoneNumber::parse(&raw).unwrap());
            prop_assert_eq!(list.len(), 1);
        }
    }
}
