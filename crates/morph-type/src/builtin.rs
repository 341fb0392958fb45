//! Identities of the primitive types covered by the built-in adapters

use crate::identity::TypeIdentity;
use once_cell::sync::Lazy;

fn primitive(name: &str) -> TypeIdentity {
    TypeIdentity::from_parts(name.to_string(), Vec::new())
}

/// `i8`
pub static I8: Lazy<TypeIdentity> = Lazy::new(|| primitive("i8"));
/// `i16`
pub static I16: Lazy<TypeIdentity> = Lazy::new(|| primitive("i16"));
/// `i32`
pub static I32: Lazy<TypeIdentity> = Lazy::new(|| primitive("i32"));
/// `i64`
pub static I64: Lazy<TypeIdentity> = Lazy::new(|| primitive("i64"));
/// `f32`
pub static F32: Lazy<TypeIdentity> = Lazy::new(|| primitive("f32"));
/// `f64`
pub static F64: Lazy<TypeIdentity> = Lazy::new(|| primitive("f64"));
/// `char`
pub static CHAR: Lazy<TypeIdentity> = Lazy::new(|| primitive("char"));
/// `String`
pub static STRING: Lazy<TypeIdentity> = Lazy::new(|| primitive("String"));
/// `Vec<char>`
pub static CHAR_VEC: Lazy<TypeIdentity> =
    Lazy::new(|| TypeIdentity::from_parts("Vec".to_string(), vec![CHAR.clone()]));

/// All built-in identities, in declaration order
#[must_use]
pub fn all() -> Vec<TypeIdentity> {
    vec![
        I8.clone(),
        I16.clone(),
        I32.clone(),
        I64.clone(),
        F32.clone(),
        F64.clone(),
        CHAR.clone(),
        STRING.clone(),
        CHAR_VEC.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_match_parsed_forms() {
        for id in all() {
            let parsed = TypeIdentity::parse(&id.to_string()).unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn char_vec_is_parametric() {
        assert_eq!(CHAR_VEC.to_string(), "Vec<char>");
        assert_eq!(CHAR_VEC.params(), &[CHAR.clone()]);
    }
}
