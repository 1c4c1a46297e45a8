use mathreg_sdk::{
    ElementBuffer, MathObject, ObjectKind, PublicCode, SdkError, Session, SessionConfig,
};

fn session() -> Session {
    Session::with_config(SessionConfig::default()).unwrap()
}

fn f64s(n: usize) -> ElementBuffer {
    let values: Vec<f64> = (0..n).map(|i| i as f64 + 0.5).collect();
    ElementBuffer::from_f64s(&values)
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
#[allow(clippy::approx_constant)]
fn bind_lookup_remove_shutdown() {
    let mut s = Session::new();
    s.init_table(256).unwrap();

    s.create_bind_scalar(3.14, "pi").unwrap();
    assert_eq!(s.lookup("pi"), Some(ObjectKind::Scalar));
    match s.value("pi") {
        Some(MathObject::Scalar(v)) => assert_eq!(v.value(), 3.14),
        other => panic!("expected scalar, got {other:?}"),
    }

    s.remove_binding("pi").unwrap();
    assert_eq!(s.lookup("pi"), None);
    assert_eq!(s.value("pi"), None);

    assert_eq!(s.shutdown().unwrap(), 1);
    assert_eq!(s.object_count(), 0);
}

#[test]
fn all_kinds_round_trip_through_names() {
    let mut s = session();
    s.create_bind_scalar(1.0, "s").unwrap();
    s.create_bind_vector(f64s(3), "v").unwrap();
    s.create_bind_matrix(f64s(8), 4, 2, "m").unwrap();

    assert_eq!(s.lookup("s"), Some(ObjectKind::Scalar));
    assert_eq!(s.lookup("v"), Some(ObjectKind::Vector));
    assert_eq!(s.lookup("m"), Some(ObjectKind::Matrix));
    assert_eq!(s.value("m").unwrap().shape(), (4, 2));
    assert_eq!(
        s.value("v").unwrap().elements().unwrap().as_f64s(),
        Some(vec![0.5, 1.5, 2.5])
    );
    assert_eq!(s.bindings().len(), 3);
}

// ---------------------------------------------------------------------------
// Creation failures
// ---------------------------------------------------------------------------

#[test]
fn bad_shape_returns_buffer_and_code_two() {
    let mut s = session();
    let buffer = f64s(8);
    let rejected = s.create_bind_matrix(buffer.clone(), 3, 2, "m").unwrap_err();
    assert_eq!(rejected.code(), PublicCode::AllocationFailure);
    assert!(matches!(rejected.error(), SdkError::Create(_)));
    assert_eq!(rejected.into_buffer(), Some(buffer));
    assert_eq!(s.lookup("m"), None);
    assert_eq!(s.object_count(), 0);
}

#[test]
fn empty_buffer_always_rejected() {
    let mut s = session();
    let rejected = s.create_bind_vector(ElementBuffer::empty(), "v").unwrap_err();
    assert_eq!(rejected.code(), PublicCode::AllocationFailure);
    let rejected = s
        .create_bind_matrix(ElementBuffer::empty(), 1, 1, "m")
        .unwrap_err();
    assert_eq!(rejected.code(), PublicCode::AllocationFailure);
    assert_eq!(s.object_count(), 0);
}

#[test]
fn failed_bind_leaves_no_object_behind() {
    let mut s = session();
    let buffer = f64s(4);
    let rejected = s.create_bind_matrix(buffer.clone(), 2, 2, "").unwrap_err();
    assert_eq!(rejected.code(), PublicCode::InvalidInput);
    assert!(matches!(rejected.error(), SdkError::Bind(_)));
    // The object was created, then reclaimed once the name was refused.
    assert_eq!(rejected.into_buffer(), Some(buffer));
    assert_eq!(s.object_count(), 0);

    let err = s.create_bind_scalar(1.0, "").unwrap_err();
    assert_eq!(err.code(), PublicCode::InvalidInput);
    assert_eq!(s.object_count(), 0);
}

// ---------------------------------------------------------------------------
// Rebinding and aliasing
// ---------------------------------------------------------------------------

#[test]
fn rebinding_a_name_moves_its_reference() {
    let mut s = session();
    s.create_bind_scalar(1.0, "x").unwrap();
    s.create_bind_scalar(2.0, "x").unwrap();

    match s.value("x") {
        Some(MathObject::Scalar(v)) => assert_eq!(v.value(), 2.0),
        other => panic!("expected scalar, got {other:?}"),
    }
    assert_eq!(s.refcount("x"), Some(2));
    // The first scalar lost its binding but keeps its creator reference.
    assert_eq!(s.object_count(), 2);
    assert_eq!(s.bindings().len(), 1);
}

#[test]
fn aliases_share_one_object() {
    let mut s = session();
    s.create_bind_vector(f64s(2), "a").unwrap();
    s.bind_alias("a", "b").unwrap();
    assert_eq!(s.refcount("a"), Some(3));
    assert_eq!(s.value("a"), s.value("b"));

    s.remove_binding("a").unwrap();
    assert_eq!(s.refcount("b"), Some(2));
    assert_eq!(s.lookup("b"), Some(ObjectKind::Vector));
}

#[test]
fn alias_of_unbound_name_is_caller_error() {
    let mut s = session();
    let err = s.bind_alias("missing", "b").unwrap_err();
    assert_eq!(err.code(), PublicCode::InvalidInput);
}

// ---------------------------------------------------------------------------
// Removal and teardown
// ---------------------------------------------------------------------------

#[test]
fn remove_unbound_name_is_caller_error() {
    let mut s = session();
    s.create_bind_scalar(1.0, "x").unwrap();
    let err = s.remove_binding("y").unwrap_err();
    assert_eq!(err.code(), PublicCode::InvalidInput);
    assert_eq!(s.refcount("x"), Some(2));
}

#[test]
fn shutdown_with_live_bindings_empties_store() {
    let mut s = session();
    s.create_bind_scalar(1.0, "a").unwrap();
    s.create_bind_vector(f64s(5), "b").unwrap();
    s.bind_alias("b", "c").unwrap();
    assert_eq!(s.shutdown().unwrap(), 2);
    assert_eq!(s.object_count(), 0);
    assert!(s.bindings().is_empty());
}

#[test]
fn drop_shuts_down_cleanly() {
    let mut s = session();
    s.create_bind_matrix(f64s(6), 2, 3, "m").unwrap();
    drop(s);
}
