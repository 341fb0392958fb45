//! Identity, round-trip and determinism laws

use morph_core::{Morph, MorphConfig, TypeIdentity, Value};
use morph_test_utils::{double, integer, integer_to_string, shift, string_to_double};
use proptest::prelude::*;

fn bare() -> Morph {
    Morph::with_config(MorphConfig::new().with_default_adapters(false))
}

fn arb_type() -> impl Strategy<Value = TypeIdentity> {
    "[A-Z][a-z]{0,6}".prop_map(|name| TypeIdentity::named(name).unwrap())
}

proptest! {
    #[test]
    fn prop_identity_conversion_returns_input(ty in arb_type(), v in any::<i64>(), with_defaults in any::<bool>()) {
        let morph = Morph::with_config(MorphConfig::new().with_default_adapters(with_defaults));
        let out: i64 = morph.convert_to(&ty, &ty, v).unwrap();
        prop_assert_eq!(out, v);
        let back: i64 = morph.reverse_to(&ty, &ty, v).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn prop_round_trip_through_invertible_chain(
        deltas in proptest::collection::vec(-1000_i64..1000, 1..8),
        v in -1_000_000_i64..1_000_000,
    ) {
        let morph = bare();
        for (i, delta) in deltas.iter().enumerate() {
            morph.register(shift(&format!("S{i}"), &format!("S{}", i + 1), *delta)).unwrap();
        }
        let from = TypeIdentity::named("S0").unwrap();
        let into = TypeIdentity::named(format!("S{}", deltas.len())).unwrap();

        let forward: i64 = morph.convert_to(&from, &into, v).unwrap();
        prop_assert_eq!(forward, v + deltas.iter().sum::<i64>());
        let back: i64 = morph.reverse_to(&into, &from, forward).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn prop_example_chain_round_trips(v in -(1_i64 << 52)..(1_i64 << 52)) {
        let morph = bare();
        morph.register(integer_to_string()).unwrap();
        morph.register(string_to_double()).unwrap();

        let d = morph.convert(&integer(), &double(), Value::new(v)).unwrap();
        let back = morph.reverse(&double(), &integer(), d).unwrap();
        prop_assert_eq!(back.downcast::<i64>().unwrap(), v);
    }

    #[test]
    fn prop_repeated_resolution_is_stable(
        edges in proptest::collection::vec((0_u8..6, 0_u8..6), 0..20),
        from in 0_u8..6,
        into in 0_u8..6,
    ) {
        let morph = Morph::with_config(
            MorphConfig::new()
                .with_default_adapters(false)
                .with_conflict_strategy(morph_core::ConflictStrategy::Ignore),
        );
        for (a, b) in edges {
            if a != b {
                morph.register(shift(&format!("N{a}"), &format!("N{b}"), 1)).unwrap();
            }
        }
        let from = TypeIdentity::named(format!("N{from}")).unwrap();
        let into = TypeIdentity::named(format!("N{into}")).unwrap();

        let first = morph.describe_path(&from, &into);
        for _ in 0..3 {
            prop_assert_eq!(&morph.describe_path(&from, &into), &first);
        }
    }
}
