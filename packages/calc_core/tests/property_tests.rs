use proptest::prelude::*;

use calc_core::{Calculator, CalculatorState, Key, Operator, Transition};

// --- Entry keys (no operators) ---

fn arb_entry_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        4 => (0u8..=9).prop_map(Key::Digit),
        1 => Just(Key::Decimal),
    ]
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        6 => arb_entry_key(),
        2 => prop_oneof![
            Just(Key::Operator(Operator::Add)),
            Just(Key::Operator(Operator::Subtract)),
            Just(Key::Operator(Operator::Multiply)),
            Just(Key::Operator(Operator::Divide)),
        ],
        1 => Just(Key::Equals),
        1 => Just(Key::Clear),
    ]
}

/// Reference model for a run of entry keys on a fresh calculator.
fn expected_buffer(keys: &[Key]) -> String {
    let mut buffer = String::from("0");
    for key in keys {
        match key {
            Key::Digit(d) => {
                if buffer == "0" {
                    buffer = d.to_string();
                } else {
                    buffer.push_str(&d.to_string());
                }
            }
            Key::Decimal => {
                if !buffer.contains('.') {
                    buffer.push('.');
                }
            }
            _ => unreachable!(),
        }
    }
    buffer
}

/// Press keys, answering every compute request locally.
fn drive(calc: &mut Calculator, keys: &[Key]) {
    for key in keys {
        if let Transition::Compute(req) = calc.press(*key).unwrap() {
            calc.complete(req.id, req.operator.apply(req.lhs, req.rhs));
        }
    }
}

proptest! {
    #[test]
    fn entry_keys_concatenate(keys in prop::collection::vec(arb_entry_key(), 0..24)) {
        let mut calc = Calculator::new();
        drive(&mut calc, &keys);
        prop_assert_eq!(calc.display(), expected_buffer(&keys));
    }

    #[test]
    fn at_most_one_decimal_point(keys in prop::collection::vec(arb_key(), 0..40)) {
        let mut calc = Calculator::new();
        for key in keys {
            drive(&mut calc, &[key]);
            prop_assert!(calc.display().matches('.').count() <= 1);
            prop_assert!(!calc.display().is_empty());
        }
    }

    #[test]
    fn decimal_is_idempotent(keys in prop::collection::vec(arb_entry_key(), 0..16)) {
        let mut calc = Calculator::new();
        drive(&mut calc, &keys);
        drive(&mut calc, &[Key::Decimal]);
        let once = calc.display().to_string();
        drive(&mut calc, &[Key::Decimal]);
        prop_assert_eq!(calc.display(), once);
    }

    #[test]
    fn digit_after_operator_replaces(
        keys in prop::collection::vec(arb_key(), 0..30),
        op in prop_oneof![
            Just(Key::Operator(Operator::Add)),
            Just(Key::Operator(Operator::Multiply)),
            Just(Key::Equals),
        ],
        digit in 0u8..=9,
    ) {
        let mut calc = Calculator::new();
        drive(&mut calc, &keys);
        drive(&mut calc, &[op]);
        prop_assert!(calc.state().fresh_entry);
        drive(&mut calc, &[Key::Digit(digit)]);
        prop_assert_eq!(calc.display(), digit.to_string());
        prop_assert!(!calc.state().fresh_entry);
    }

    #[test]
    fn clear_always_resets(keys in prop::collection::vec(arb_key(), 0..40)) {
        let mut calc = Calculator::new();
        drive(&mut calc, &keys);
        drive(&mut calc, &[Key::Clear]);
        prop_assert_eq!(calc.state(), &CalculatorState::default());
        prop_assert!(!calc.is_loading());
    }

    #[test]
    fn never_left_loading_when_answered(keys in prop::collection::vec(arb_key(), 0..40)) {
        let mut calc = Calculator::new();
        drive(&mut calc, &keys);
        prop_assert!(!calc.is_loading());
    }
}
