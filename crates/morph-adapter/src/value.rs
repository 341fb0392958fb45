//! Type-erased values passed between adapters

use std::any::{type_name, Any};
use std::fmt::{self, Debug, Formatter};

/// Type-erased value travelling along a conversion path
///
/// Adapters receive and return `Value`s; the Rust type name is kept alongside
/// the box so mismatches can be reported without reflection.
pub struct Value {
    inner: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Value {
    /// Box a concrete value
    #[inline]
    #[must_use]
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Rust type name of the boxed value
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether the boxed value is a `T`
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the boxed value as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Unbox the value as `T`
    ///
    /// # Errors
    /// Returns the untouched `Value` if it does not hold a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { inner, type_name }),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_downcast_roundtrip() {
        let value = Value::new(42_i32);
        assert!(value.is::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert_eq!(value.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn value_downcast_mismatch_returns_value() {
        let value = Value::new(String::from("five"));
        let back = value.downcast::<i64>().unwrap_err();
        assert!(back.type_name().ends_with("String"));
        assert_eq!(back.downcast::<String>().unwrap(), "five");
    }

    #[test]
    fn value_debug_shows_type() {
        let value = Value::new(1.5_f64);
        assert_eq!(format!("{value:?}"), "Value<f64>");
    }
}
