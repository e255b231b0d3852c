//! Call Key Module
//!
//! Order-normalized representation of a function call's arguments.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CacheError, Result};

// == Call Key ==
/// Positional and named argument values collected for cache-key derivation.
///
/// Positional order is preserved and significant. Named entries are kept
/// sorted by name, so the order they were supplied in never changes the
/// canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallKey {
    /// Positional values in call order
    positional: Vec<Value>,
    /// Named values, sorted by name
    named: BTreeMap<String, Value>,
}

impl CallKey {
    // == Constructor ==
    /// Creates an empty CallKey.
    ///
    /// An empty key is valid and still hashes deterministically.
    pub fn new() -> Self {
        Self::default()
    }

    // == Positional Arguments ==
    /// Appends a positional argument value.
    ///
    /// # Arguments
    /// * `value` - Any serializable value
    pub fn arg<T: Serialize>(mut self, value: &T) -> Result<Self> {
        self.positional.push(to_key_value(value)?);
        Ok(self)
    }

    // == Named Arguments ==
    /// Adds a named argument value.
    ///
    /// A repeated name overwrites the earlier value.
    ///
    /// # Arguments
    /// * `name` - The argument name
    /// * `value` - Any serializable value
    pub fn named<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self> {
        self.named.insert(name.to_string(), to_key_value(value)?);
        Ok(self)
    }

    // == Canonical Form ==
    /// Returns the canonical tuple for this call: the positional values in
    /// order, then the named entries as a map sorted by name.
    ///
    /// The fixed two-element shape keeps a trailing positional map distinct
    /// from named arguments without needing a sentinel value.
    pub fn canonical(&self) -> Value {
        let named: Map<String, Value> = self
            .named
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Value::Array(vec![
            Value::Array(self.positional.clone()),
            Value::Object(named),
        ])
    }

    /// Returns true if the key holds no positional and no named values.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

// == Value Conversion ==
/// Converts a serializable value into the canonical tree representation.
///
/// Mapping-valued arguments become sorted objects (serde_json's default map
/// keeps keys ordered), so nested mappings canonicalize recursively.
fn to_key_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| CacheError::KeyEncoding(format!("Value is not serializable: {}", e)))
}

// == Cache Args ==
/// Argument packs accepted by a memoized call.
///
/// Implemented for `CallKey` itself (mixed positional and named arguments)
/// and for tuples of serializable values, which map to positional arguments
/// in order.
pub trait CacheArgs {
    /// Builds the CallKey for this argument pack.
    fn call_key(&self) -> Result<CallKey>;
}

impl CacheArgs for CallKey {
    fn call_key(&self) -> Result<CallKey> {
        Ok(self.clone())
    }
}

impl CacheArgs for () {
    fn call_key(&self) -> Result<CallKey> {
        Ok(CallKey::new())
    }
}

/// Implements CacheArgs for tuples of serializable values.
macro_rules! impl_cache_args_for_tuple {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: Serialize),+> CacheArgs for ($($name,)+) {
            fn call_key(&self) -> Result<CallKey> {
                let key = CallKey::new();
                $(let key = key.arg(&self.$index)?;)+
                Ok(key)
            }
        }
    };
}

impl_cache_args_for_tuple!(A0: 0);
impl_cache_args_for_tuple!(A0: 0, A1: 1);
impl_cache_args_for_tuple!(A0: 0, A1: 1, A2: 2);
impl_cache_args_for_tuple!(A0: 0, A1: 1, A2: 2, A3: 3);
impl_cache_args_for_tuple!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4);
impl_cache_args_for_tuple!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5);
impl_cache_args_for_tuple!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6);
impl_cache_args_for_tuple!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5, A6: 6, A7: 7);
