//! User-defined aggregate binding integration tests

mod test_utils;

use bindguard::catalog::DataType;
use bindguard::loader::{Aggregator, Artifact, ClassPath, AGGREGATOR_CONTRACT};
use bindguard::sql::{
    AggregatorWrapper, CompilerContext, Diagnostic, ResolvedAggregateBinding, RuntimeType,
};
use proptest::prelude::*;
use test_utils::{
    init_tracing, test_catalog, test_class_path, txn, Mode, AVGPLUS_CLASS, MODE_CLASS,
};

fn decimal() -> DataType {
    DataType::Decimal {
        precision: 31,
        scale: 5,
    }
}

// ============ Contract Conformance Tests ============

#[test]
fn test_conforming_aggregate_binds() {
    init_tracing();
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    let binding = ctx.bind_user_aggregate(objs.mode, &DataType::Int).unwrap();
    assert_eq!(
        binding,
        ResolvedAggregateBinding {
            return_type: DataType::Int,
            wrapper: AggregatorWrapper::UserDefined,
            operand_cast: None,
        }
    );
    assert_eq!(binding.wrapper.to_string(), "UserDefinedAggregator");
}

#[test]
fn test_input_mismatch_names_both_types() {
    init_tracing();
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    let err = ctx.bind_user_aggregate(objs.avgplus, &decimal()).unwrap_err();
    assert_eq!(
        err,
        Diagnostic::InputTypeMismatch {
            schema: "APP".to_string(),
            name: "AVGPLUS".to_string(),
            expected: "Decimal".to_string(),
            actual: "i32".to_string(),
        }
    );
    assert_eq!(err.sql_state(), "42ZC6");
}

#[test]
fn test_input_reported_before_return() {
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    // Both input and return disagree with INTEGER -> INTEGER
    cp.deploy(Artifact::new(MODE_CLASS).implementing(
        &AGGREGATOR_CONTRACT,
        vec![Some(RuntimeType::Int64), Some(RuntimeType::Float64), None],
    ));
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    assert!(matches!(
        ctx.bind_user_aggregate(objs.mode, &DataType::Int),
        Err(Diagnostic::InputTypeMismatch { .. })
    ));
}

#[test]
fn test_missing_implementation() {
    init_tracing();
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    assert!(cp.undeploy(MODE_CLASS));
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    match ctx.bind_user_aggregate(objs.mode, &DataType::Int) {
        Err(Diagnostic::ImplementationLoadFailure {
            class_name,
            schema,
            name,
            ..
        }) => {
            assert_eq!(class_name, MODE_CLASS);
            assert_eq!(schema, "APP");
            assert_eq!(name, "MODE");
        }
        other => panic!("Expected ImplementationLoadFailure, got {:?}", other),
    }
}

#[test]
fn test_non_aggregator_artifact() {
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    cp.deploy(Artifact::new(MODE_CLASS));
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    let err = ctx
        .bind_user_aggregate(objs.mode, &DataType::Int)
        .unwrap_err();
    assert_eq!(err.sql_state(), "42ZC4");
}

// ============ Reload Tests ============

#[test]
fn test_binding_is_repeatable() {
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    let first = ctx.bind_user_aggregate(objs.mode, &DataType::Int);
    let second = ctx.bind_user_aggregate(objs.mode, &DataType::Int);
    assert_eq!(first, second);

    let first = ctx.bind_user_aggregate(objs.avgplus, &decimal());
    let second = ctx.bind_user_aggregate(objs.avgplus, &decimal());
    assert_eq!(first, second);
}

#[test]
fn test_redeploy_seen_by_next_bind() {
    let (catalog, objs) = test_catalog();
    let cp = test_class_path();
    let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

    assert!(ctx.bind_user_aggregate(objs.avgplus, &decimal()).is_err());

    cp.deploy(Artifact::new(AVGPLUS_CLASS).implementing(
        &AGGREGATOR_CONTRACT,
        vec![
            Some(RuntimeType::Decimal),
            Some(RuntimeType::Decimal),
            None,
        ],
    ));

    let binding = ctx.bind_user_aggregate(objs.avgplus, &decimal()).unwrap();
    assert_eq!(binding.return_type, decimal());
}

// ============ Aggregator Tests ============

#[test]
fn test_mode_aggregator_evaluates() {
    let mut left = Mode::default();
    left.init();
    for v in [3, 1, 3] {
        left.accumulate(v);
    }

    let mut right = Mode::default();
    right.init();
    for v in [1, 1, 7] {
        right.accumulate(v);
    }

    left.merge(&right);
    assert_eq!(left.terminate(), Some(1));

    let empty = Mode::default();
    assert_eq!(empty.terminate(), None);
}

#[test]
fn test_mode_contract_arguments() {
    let cp = ClassPath::new();
    cp.deploy_aggregator::<Mode>(MODE_CLASS);
    assert!(cp.contains(MODE_CLASS));
}

// ============ Property Tests ============

fn integer_operand() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::TinyInt),
        Just(DataType::SmallInt),
        Just(DataType::Int),
    ]
}

proptest! {
    /// Operands sharing the declared representation bind to the same result,
    /// with a cast only when the SQL type differs
    #[test]
    fn prop_bind_is_deterministic(input in integer_operand(), repeats in 1usize..4) {
        let (catalog, objs) = test_catalog();
        let cp = test_class_path();
        let ctx = CompilerContext::new(txn(), "bob", &catalog, &cp);

        let first = ctx.bind_user_aggregate(objs.mode, &input).unwrap();
        prop_assert_eq!(first.return_type.clone(), DataType::Int);
        prop_assert_eq!(first.operand_cast.is_some(), input != DataType::Int);

        for _ in 0..repeats {
            let again = ctx.bind_user_aggregate(objs.mode, &input).unwrap();
            prop_assert_eq!(&again, &first);
        }
    }
}
