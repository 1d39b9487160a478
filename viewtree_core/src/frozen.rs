// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Write-protected values and the shared empty singletons.
//!
//! [`EMPTY_OBJ`] and [`EMPTY_ARRAY`] are returned as default values in many
//! places so that callers can test for "nothing here" by identity instead of
//! by content. They are frozen so that no caller can slip an entry in.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Deref;

use crate::error::ImmutableValueError;

/// A value that can be frozen against further mutation.
///
/// Reads always succeed. Writes go through [`try_get_mut`](Self::try_get_mut)
/// or [`try_update`](Self::try_update) and fail with [`ImmutableValueError`]
/// once the value is frozen. Freezing is one-way.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Frozen<T> {
    value: T,
    frozen: bool,
}

impl<T> Frozen<T> {
    /// Wraps a value that is still mutable.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            frozen: false,
        }
    }

    /// Wraps a value that is frozen from the start.
    #[must_use]
    pub const fn sealed(value: T) -> Self {
        Self {
            value,
            frozen: true,
        }
    }

    /// Freezes the value. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns whether the value is frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns a shared reference to the value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Returns a mutable reference to the value.
    ///
    /// # Errors
    ///
    /// Returns [`ImmutableValueError`] if the value is frozen.
    pub fn try_get_mut(&mut self) -> Result<&mut T, ImmutableValueError> {
        if self.frozen {
            return Err(ImmutableValueError);
        }
        Ok(&mut self.value)
    }

    /// Applies `f` to the value.
    ///
    /// # Errors
    ///
    /// Returns [`ImmutableValueError`] without calling `f` if the value is
    /// frozen.
    pub fn try_update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, ImmutableValueError> {
        self.try_get_mut().map(f)
    }

    /// Unwraps the value, frozen or not.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// The shared empty object.
pub static EMPTY_OBJ: Frozen<BTreeMap<String, String>> = Frozen::sealed(BTreeMap::new());

/// The shared empty sequence.
pub static EMPTY_ARRAY: Frozen<Vec<String>> = Frozen::sealed(Vec::new());

/// Returns whether `value` is [`EMPTY_OBJ`] itself (not merely equal to it).
#[must_use]
pub fn is_empty_obj(value: &Frozen<BTreeMap<String, String>>) -> bool {
    core::ptr::eq(value, &EMPTY_OBJ)
}

/// Returns whether `value` is [`EMPTY_ARRAY`] itself (not merely equal to it).
#[must_use]
pub fn is_empty_array(value: &Frozen<Vec<String>>) -> bool {
    core::ptr::eq(value, &EMPTY_ARRAY)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn singletons_are_frozen_and_empty() {
        assert!(EMPTY_OBJ.is_frozen());
        assert!(EMPTY_ARRAY.is_frozen());
        assert!(EMPTY_OBJ.is_empty());
        assert!(EMPTY_ARRAY.is_empty());
    }

    #[test]
    fn singletons_compare_by_identity() {
        assert!(is_empty_obj(&EMPTY_OBJ));
        assert!(is_empty_array(&EMPTY_ARRAY));

        let copy = EMPTY_OBJ.clone();
        assert_eq!(copy, EMPTY_OBJ);
        assert!(!is_empty_obj(&copy), "equal is not identical");
    }

    #[test]
    fn frozen_copy_rejects_mutation() {
        let mut obj = EMPTY_OBJ.clone();
        let result = obj.try_update(|map| map.insert("k".to_string(), "v".to_string()));
        assert_eq!(result, Err(ImmutableValueError));
        assert!(obj.is_empty());

        let mut arr = EMPTY_ARRAY.clone();
        assert!(arr.try_get_mut().is_err());
    }

    #[test]
    fn mutation_fails_only_after_freeze() {
        let mut list = Frozen::new(Vec::new());
        list.try_update(|v| v.push(1_u8)).unwrap();
        list.freeze();
        assert_eq!(list.try_update(|v| v.push(2)), Err(ImmutableValueError));
        assert_eq!(list.into_inner(), [1_u8]);
    }
}
