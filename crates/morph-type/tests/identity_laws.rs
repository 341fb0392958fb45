//! Display/parse and hashing laws for type identities

use morph_type::TypeIdentity;
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_identity() -> impl Strategy<Value = TypeIdentity> {
    let leaf = "[A-Za-z_][A-Za-z0-9_]{0,6}".prop_map(|name| TypeIdentity::named(name).unwrap());
    leaf.prop_recursive(3, 16, 3, |inner| {
        ("[A-Z][a-z]{0,5}", proptest::collection::vec(inner, 1..3))
            .prop_map(|(name, params)| TypeIdentity::new(name, params).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_display_parse_is_identity(id in arb_identity()) {
        let parsed: TypeIdentity = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    #[test]
    fn prop_equal_identities_collapse_in_sets(id in arb_identity()) {
        let copy: TypeIdentity = id.to_string().parse().unwrap();
        let set: HashSet<TypeIdentity> = [id, copy].into_iter().collect();
        prop_assert_eq!(set.len(), 1);
    }
}

#[test]
fn distinct_parameters_are_distinct_nodes() {
    let mut set = HashSet::new();
    set.insert(TypeIdentity::parse("Map<String, Integer>").unwrap());
    set.insert(TypeIdentity::parse("Map<String, Long>").unwrap());
    set.insert(TypeIdentity::parse("Map").unwrap());
    assert_eq!(set.len(), 3);
}
