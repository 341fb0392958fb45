//! End-to-end engine behaviour

use morph_core::{
    Adapter, AdapterError, ConversionError, Morph, MorphConfig, Registration, Value,
};
use morph_test_utils::{
    add, counting, double, failing, id, integer, integer_to_string, shift, string, string_to_double,
    Calls,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, OnceLock};
use std::thread;

fn bare() -> Morph {
    Morph::with_config(MorphConfig::new().with_default_adapters(false))
}

fn example() -> Morph {
    let morph = bare();
    morph.register(integer_to_string()).unwrap();
    morph.register(string_to_double()).unwrap();
    morph
}

#[test]
fn example_integer_to_double_and_back() {
    let morph = example();

    let converter = morph.converter(&integer(), &double()).unwrap();
    assert_eq!(converter.len(), 2);

    let out: f64 = morph.convert_to(&integer(), &double(), 5_i64).unwrap();
    assert!((out - 5.0).abs() < f64::EPSILON);

    let back: i64 = morph.reverse_to(&double(), &integer(), 5.0_f64).unwrap();
    assert_eq!(back, 5);
}

#[test]
fn composition_matches_manual_chain() {
    let morph = bare();
    let ab = add("A", "B", 3);
    let bc = Adapter::uni(id("B"), id("C"), |x: i64| Ok(x * 2));

    let manual = bc
        .forward(ab.forward(Value::new(10_i64)).unwrap())
        .unwrap()
        .downcast::<i64>()
        .unwrap();

    morph.register(ab).unwrap();
    morph.register(bc).unwrap();
    let composed: i64 = morph.convert_to(&id("A"), &id("C"), 10_i64).unwrap();
    assert_eq!(composed, manual);
    assert_eq!(composed, 26);
}

#[test]
fn no_path_detection() {
    let morph = bare();
    morph.register(add("A", "B", 1)).unwrap();
    morph.register(add("C", "D", 1)).unwrap();

    assert!(!morph.can_convert(&id("A"), &id("D")));
    let err = morph.convert(&id("A"), &id("D"), Value::new(1_i64)).unwrap_err();
    assert_eq!(
        err,
        ConversionError::NoPathFound {
            from: id("A"),
            into: id("D"),
        }
    );
}

#[test]
fn reverse_without_forward_path_reports_no_reverse_path() {
    let morph = bare();
    morph.register(shift("A", "B", 1)).unwrap();

    let err = morph.reverse(&id("C"), &id("A"), Value::new(1_i64)).unwrap_err();
    assert_eq!(
        err,
        ConversionError::NoReversePath {
            from: id("C"),
            into: id("A"),
        }
    );
}

#[test]
fn forward_only_step_rejects_reverse_without_running_backward() {
    let morph = bare();
    let first = Calls::default();
    let middle = Calls::default();
    let last = Calls::default();
    morph.register(counting("A", "B", true, &first)).unwrap();
    morph.register(counting("B", "C", false, &middle)).unwrap();
    morph.register(counting("C", "D", true, &last)).unwrap();

    let err = morph.reverse(&id("D"), &id("A"), Value::new(1_i64)).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::NonInvertiblePath { step_index: 1, .. }
    ));
    assert_eq!(first.backward() + middle.backward() + last.backward(), 0);
    assert_eq!(first.forward() + middle.forward() + last.forward(), 0);
}

#[test]
fn reverse_reports_last_forward_only_step() {
    let morph = bare();
    let calls = Calls::default();
    morph.register(counting("A", "B", false, &calls)).unwrap();
    morph.register(counting("B", "C", true, &calls)).unwrap();
    morph.register(counting("C", "D", false, &calls)).unwrap();

    let err = morph.reverse(&id("D"), &id("A"), Value::new(1_i64)).unwrap_err();
    match err {
        ConversionError::NonInvertiblePath { step_index, from, into, .. } => {
            assert_eq!(step_index, 2);
            assert_eq!(from, id("C"));
            assert_eq!(into, id("D"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.forward() + calls.backward(), 0);
}

#[test]
fn failing_step_is_identified() {
    let morph = bare();
    morph.register(shift("A", "B", 1)).unwrap();
    morph.register(failing("B", "C", "cannot reach C")).unwrap();
    let calls = Calls::default();
    morph.register(counting("C", "D", true, &calls)).unwrap();

    let err = morph.convert(&id("A"), &id("D"), Value::new(1_i64)).unwrap_err();
    assert_eq!(err.step_index(), Some(1));
    assert_eq!(calls.forward(), 0);

    let message = err.detailed_message();
    assert!(message.contains("cannot reach C"));
    assert!(message.contains(">> 1: B -> C  <-- here"));
}

#[test]
fn unparsable_value_reports_adapter_failure() {
    let morph = example();
    let err = morph
        .reverse(&string(), &integer(), Value::new("twelve".to_string()))
        .unwrap_err();
    match err {
        ConversionError::ConversionFailed { step_index, from, into, .. } => {
            assert_eq!(step_index, 0);
            assert_eq!(from, string());
            assert_eq!(into, integer());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn tie_break_uses_earliest_registration() {
    for _ in 0..5 {
        let morph = bare();
        morph.register(add("A", "B", 1)).unwrap();
        morph.register(add("A", "Bprime", 100)).unwrap();
        morph.register(add("B", "C", 0)).unwrap();
        morph.register(add("Bprime", "C", 0)).unwrap();

        let out: i64 = morph.convert_to(&id("A"), &id("C"), 0_i64).unwrap();
        assert_eq!(out, 1);
        let steps = morph.describe_path(&id("A"), &id("C")).unwrap();
        assert_eq!(steps[0].into, id("B"));
    }
}

#[test]
fn explicit_costs_switch_to_cheapest_path() {
    let morph = bare();
    morph.register(add("A", "C", 100)).unwrap();
    morph.register(add("A", "B", 1)).unwrap();
    morph.register(add("B", "C", 1)).unwrap();

    // unit costs: fewest hops
    let direct: i64 = morph.convert_to(&id("A"), &id("C"), 0_i64).unwrap();
    assert_eq!(direct, 100);

    morph
        .map(id("A"))
        .cost(5)
        .strategy(morph_core::ConflictStrategy::Override)
        .to(id("C"), |x: i64| Ok(x + 100))
        .unwrap();
    let cheapest: i64 = morph.convert_to(&id("A"), &id("C"), 0_i64).unwrap();
    assert_eq!(cheapest, 2);
}

#[test]
fn registration_after_resolution_is_visible() {
    let morph = bare();
    morph.register(add("A", "B", 1)).unwrap();
    assert!(!morph.can_convert(&id("A"), &id("C")));

    morph.register(add("B", "C", 1)).unwrap();
    assert!(morph.can_convert(&id("A"), &id("C")));
    let out: i64 = morph.convert_to(&id("A"), &id("C"), 0_i64).unwrap();
    assert_eq!(out, 2);
}

#[test]
fn registration_errors_leave_engine_unchanged() {
    let morph = bare();
    assert_eq!(morph.register(add("A", "B", 1)), Ok(Registration::Added));
    let version = morph.registry().version();

    assert!(morph.register(add("A", "B", 2)).is_err());
    assert!(morph.register(add("A", "A", 2)).is_err());
    assert_eq!(morph.registry().version(), version);

    let out: i64 = morph.convert_to(&id("A"), &id("B"), 0_i64).unwrap();
    assert_eq!(out, 1);
}

#[test]
fn lossless_conversion() {
    let morph = bare();
    morph.register(shift("A", "B", 1).lossless()).unwrap();
    morph.register(add("B", "C", 1)).unwrap();

    let ok = morph.convert_lossless(&id("A"), &id("B"), Value::new(1_i64)).unwrap();
    assert_eq!(ok.downcast::<i64>().unwrap(), 2);

    let err = morph
        .convert_lossless(&id("A"), &id("C"), Value::new(1_i64))
        .unwrap_err();
    assert!(matches!(
        err,
        ConversionError::NoLosslessConversion { step_index: 1, .. }
    ));
}

#[test]
fn self_reentering_adapter_is_detected() {
    let engine: Arc<OnceLock<Arc<Morph>>> = Arc::new(OnceLock::new());
    let morph = Arc::new(bare());

    let inner = Arc::clone(&engine);
    morph
        .map(id("A"))
        .to(id("B"), move |x: i64| {
            let morph = inner.get().ok_or_else(|| AdapterError::msg("engine not ready"))?;
            morph
                .convert_to::<i64, i64>(&id("A"), &id("B"), x)
                .map_err(AdapterError::from_error)
        })
        .unwrap();
    assert!(engine.set(Arc::clone(&morph)).is_ok());

    let err = morph.convert_to::<_, i64>(&id("A"), &id("B"), 1_i64).unwrap_err();
    match err {
        ConversionError::ConversionFailed { step_index, cause, .. } => {
            assert_eq!(step_index, 0);
            assert!(cause.to_string().contains("cycling conversion"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn nested_conversion_through_other_adapters_is_allowed() {
    let engine: Arc<OnceLock<Arc<Morph>>> = Arc::new(OnceLock::new());
    let morph = Arc::new(bare());
    morph.register(add("X", "Y", 10)).unwrap();

    let inner = Arc::clone(&engine);
    morph
        .map(id("A"))
        .to(id("B"), move |x: i64| {
            let morph = inner.get().ok_or_else(|| AdapterError::msg("engine not ready"))?;
            morph
                .convert_to::<i64, i64>(&id("X"), &id("Y"), x)
                .map_err(AdapterError::from_error)
        })
        .unwrap();
    assert!(engine.set(Arc::clone(&morph)).is_ok());

    let out: i64 = morph.convert_to(&id("A"), &id("B"), 1_i64).unwrap();
    assert_eq!(out, 11);
}

#[test]
fn builtin_adapters() {
    let morph = Morph::new();
    let i8_ = id("i8");
    let i64_ = id("i64");
    let f64_ = id("f64");

    let out: f64 = morph.convert_to(&i8_, &f64_, 4_i8).unwrap();
    assert!((out - 4.0).abs() < f64::EPSILON);

    assert!(morph
        .convert_lossless(&i8_, &f64_, Value::new(4_i8))
        .is_ok());
    assert!(matches!(
        morph.convert_lossless(&i64_, &f64_, Value::new(4_i64)),
        Err(ConversionError::NoLosslessConversion { .. })
    ));

    let code: i64 = morph.convert_to(&id("char"), &i64_, 'a').unwrap();
    assert_eq!(code, 97);

    let chars: Vec<char> = morph
        .convert_to(&id("String"), &id("Vec<char>"), "hey".to_string())
        .unwrap();
    let text: String = morph.reverse_to(&id("Vec<char>"), &id("String"), chars).unwrap();
    assert_eq!(text, "hey");

    assert!(!morph.can_convert(&f64_, &i8_));
}

#[test]
fn converters_are_shared_across_threads() {
    let morph = Arc::new(example());
    let converter = Arc::new(morph.converter(&integer(), &double()).unwrap());

    let workers: Vec<_> = (0..8_i64)
        .map(|n| {
            let converter = Arc::clone(&converter);
            let morph = Arc::clone(&morph);
            thread::spawn(move || {
                for i in 0..100 {
                    let value = n * 1000 + i;
                    let out: f64 = converter.convert_to(value).unwrap();
                    let back: i64 = morph.reverse_to(&double(), &integer(), out).unwrap();
                    assert_eq!(back, value);
                }
            })
        })
        .collect();

    let registrar = {
        let morph = Arc::clone(&morph);
        thread::spawn(move || {
            for i in 0..50 {
                morph.register(add(&format!("R{i}"), &format!("R{}", i + 1), 1)).unwrap();
            }
        })
    };

    for worker in workers {
        worker.join().unwrap();
    }
    registrar.join().unwrap();
    assert!(morph.can_convert(&id("R0"), &id("R50")));
}
