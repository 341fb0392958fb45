//! Built-in adapters between primitive types
//!
//! Numeric widening (`i8 → i16 → i32 → i64`, integers to floats, `f32 → f64`),
//! `char` to its code point, and `String ⇄ Vec<char>`. Widening that cannot
//! lose information is marked lossless; `i32 → f32` and `i64 → f32/f64` are not.

use morph_adapter::{Adapter, AdapterError, AdapterRegistry, ConflictStrategy, Value};
use morph_type::builtin::{CHAR, CHAR_VEC, F32, F64, I16, I32, I64, I8, STRING};
use morph_type::TypeIdentity;
use std::any::Any;

fn widen<S, T>(source: &TypeIdentity, target: &TypeIdentity) -> Adapter
where
    S: Any + Send,
    T: From<S> + Any + Send,
{
    Adapter::uni(source.clone(), target.clone(), |x: S| Ok(T::from(x))).lossless()
}

#[allow(clippy::cast_precision_loss)]
fn lossy_numeric() -> Vec<Adapter> {
    vec![
        Adapter::uni(I32.clone(), F32.clone(), |x: i32| Ok(x as f32)),
        Adapter::uni(I64.clone(), F32.clone(), |x: i64| Ok(x as f32)),
        Adapter::uni(I64.clone(), F64.clone(), |x: i64| Ok(x as f64)),
    ]
}

/// Every built-in adapter, in registration order
#[must_use]
pub fn builtin_adapters() -> Vec<Adapter> {
    let mut adapters = vec![
        widen::<i8, i16>(&I8, &I16),
        widen::<i8, i32>(&I8, &I32),
        widen::<i8, i64>(&I8, &I64),
        widen::<i8, f32>(&I8, &F32),
        widen::<i8, f64>(&I8, &F64),
        widen::<i16, i32>(&I16, &I32),
        widen::<i16, i64>(&I16, &I64),
        widen::<i16, f32>(&I16, &F32),
        widen::<i16, f64>(&I16, &F64),
        widen::<i32, i64>(&I32, &I64),
        widen::<i32, f64>(&I32, &F64),
        widen::<f32, f64>(&F32, &F64),
    ];
    adapters.extend(lossy_numeric());
    adapters.push(
        Adapter::uni(CHAR.clone(), I32.clone(), |c: char| {
            i32::try_from(u32::from(c)).map_err(AdapterError::from_error)
        })
        .lossless(),
    );
    adapters.push(Adapter::uni(CHAR.clone(), I64.clone(), |c: char| Ok(i64::from(u32::from(c)))).lossless());
    adapters.push(
        Adapter::bi(
            STRING.clone(),
            CHAR_VEC.clone(),
            |s: String| Ok(s.chars().collect::<Vec<char>>()),
            |chars: Vec<char>| Ok(chars.into_iter().collect::<String>()),
        )
        .lossless(),
    );
    adapters
}

/// Register the built-in adapters, keeping any existing route
///
/// Returns how many were added.
pub fn install(registry: &AdapterRegistry) -> usize {
    let mut added = 0;
    for adapter in builtin_adapters() {
        let route = format!("{} -> {}", adapter.source(), adapter.target());
        match registry.register_with(adapter, ConflictStrategy::Ignore) {
            Ok(outcome) if outcome.changed() => added += 1,
            Ok(_) => tracing::debug!(%route, "built-in adapter shadowed by existing route"),
            Err(error) => tracing::warn!(%route, %error, "built-in adapter skipped"),
        }
    }
    tracing::debug!(added, "built-in adapters installed");
    added
}

/// Parse command-line text as a value of a built-in identity
///
/// Returns `None` for non-built-in identities.
///
/// # Errors
/// [`AdapterError::Failed`] when the text does not parse.
pub fn parse_value(ty: &TypeIdentity, raw: &str) -> Option<Result<Value, AdapterError>> {
    fn parsed<T>(raw: &str) -> Result<Value, AdapterError>
    where
        T: std::str::FromStr + Any + Send,
        T::Err: std::error::Error,
    {
        raw.trim().parse::<T>().map(Value::new).map_err(AdapterError::from_error)
    }

    let value = if *ty == *I8 {
        parsed::<i8>(raw)
    } else if *ty == *I16 {
        parsed::<i16>(raw)
    } else if *ty == *I32 {
        parsed::<i32>(raw)
    } else if *ty == *I64 {
        parsed::<i64>(raw)
    } else if *ty == *F32 {
        parsed::<f32>(raw)
    } else if *ty == *F64 {
        parsed::<f64>(raw)
    } else if *ty == *CHAR {
        parsed::<char>(raw)
    } else if *ty == *STRING {
        Ok(Value::new(raw.to_string()))
    } else if *ty == *CHAR_VEC {
        Ok(Value::new(raw.chars().collect::<Vec<char>>()))
    } else {
        return None;
    };
    Some(value)
}

/// Render a value of a built-in identity as text
///
/// Returns `None` when the identity is not built in or the value does not
/// hold the matching Rust type.
#[must_use]
pub fn render_value(ty: &TypeIdentity, value: &Value) -> Option<String> {
    fn shown<T: ToString + Any>(value: &Value) -> Option<String> {
        value.downcast_ref::<T>().map(ToString::to_string)
    }

    if *ty == *I8 {
        shown::<i8>(value)
    } else if *ty == *I16 {
        shown::<i16>(value)
    } else if *ty == *I32 {
        shown::<i32>(value)
    } else if *ty == *I64 {
        shown::<i64>(value)
    } else if *ty == *F32 {
        shown::<f32>(value)
    } else if *ty == *F64 {
        shown::<f64>(value)
    } else if *ty == *CHAR {
        shown::<char>(value)
    } else if *ty == *STRING {
        shown::<String>(value)
    } else if *ty == *CHAR_VEC {
        value
            .downcast_ref::<Vec<char>>()
            .map(|chars| format!("{chars:?}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_install_once() {
        let registry = AdapterRegistry::new();
        let added = install(&registry);
        assert_eq!(added, builtin_adapters().len());
        assert_eq!(install(&registry), 0);
        assert_eq!(registry.len(), added);
    }

    #[test]
    fn builtins_never_identity() {
        assert!(builtin_adapters().iter().all(|a| !a.is_identity()));
    }

    #[test]
    fn lossy_widenings_are_marked() {
        let registry = AdapterRegistry::new();
        install(&registry);
        assert!(!registry.get(&I64, &F64).unwrap().is_lossless());
        assert!(!registry.get(&I32, &F32).unwrap().is_lossless());
        assert!(registry.get(&I32, &F64).unwrap().is_lossless());
        assert!(registry.get(&STRING, &CHAR_VEC).unwrap().is_lossless());
    }

    #[test]
    fn char_to_code_point() {
        let registry = AdapterRegistry::new();
        install(&registry);
        let adapter = registry.get(&CHAR, &I32).unwrap();
        let out = adapter.forward(Value::new('A')).unwrap();
        assert_eq!(out.downcast::<i32>().unwrap(), 65);
    }

    #[test]
    fn parse_and_render_builtins() {
        let value = parse_value(&I32, " 42 ").unwrap().unwrap();
        assert_eq!(render_value(&I32, &value).as_deref(), Some("42"));

        let chars = parse_value(&CHAR_VEC, "ab").unwrap().unwrap();
        assert_eq!(render_value(&CHAR_VEC, &chars).as_deref(), Some("['a', 'b']"));

        assert!(parse_value(&I8, "300").unwrap().is_err());
        let custom = TypeIdentity::named("Custom").unwrap();
        assert!(parse_value(&custom, "x").is_none());
        assert!(render_value(&I64, &value).is_none());
    }
}
