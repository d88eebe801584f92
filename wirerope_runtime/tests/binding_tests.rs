//! End-to-end binding behavior: wire identity, cache-slot separation,
//! calling conventions, and the benign first-access race.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use wirerope_runtime::{
    Binding, CallArgs, CallMode, InstanceObj, OwnerRef, RawCallable, RopeCore, TypeObj, Value,
    Wire, WireFactory, WireRope,
};

// =============================================================================
// Recording Wire Implementation
// =============================================================================

/// Factory that counts constructions and records owner metadata.
struct Recording {
    constructed: AtomicUsize,
    mode: CallMode,
}

impl Recording {
    fn new() -> Self {
        Self {
            constructed: AtomicUsize::new(0),
            mode: CallMode::Forwarding,
        }
    }

    fn delegated() -> Self {
        Self {
            constructed: AtomicUsize::new(0),
            mode: CallMode::Delegated,
        }
    }

    fn count(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

struct RecWire {
    core: Arc<RopeCore<Recording>>,
    /// Type name of the owner at construction; None for bare functions.
    owner: Option<String>,
    /// Whether the owner was the type itself.
    type_level: Option<bool>,
    /// Set by `bind_owner` for property wires.
    bound_to: Mutex<Option<String>>,
}

impl Wire for RecWire {
    fn invoke(&self, args: &CallArgs) -> Value {
        self.core.callable().call(args)
    }

    fn bind_owner(&self, owner: &OwnerRef) {
        *self.bound_to.lock() = Some(owner.type_name().to_string());
    }
}

impl WireFactory for Recording {
    type Wire = RecWire;

    fn construct(
        &self,
        core: &Arc<RopeCore<Self>>,
        owner: Option<&OwnerRef>,
        _binding: Binding,
    ) -> Arc<RecWire> {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Arc::new(RecWire {
            core: core.clone(),
            owner: owner.map(|o| o.type_name().to_string()),
            type_level: owner.map(OwnerRef::is_type),
            bound_to: Mutex::new(None),
        })
    }

    fn call_mode(&self) -> CallMode {
        self.mode
    }
}

fn int(n: i64) -> Value {
    Value::new(n)
}

fn as_int(v: &Value) -> i64 {
    v.downcast_ref::<i64>().copied().expect("expected i64 value")
}

// =============================================================================
// Method Binding
// =============================================================================

#[test]
fn test_method_wire_identity_stable() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::new(1_i64)));

    let ty = TypeObj::new("Widget");
    let obj = InstanceObj::new(&ty);
    let binding = Binding::for_instance(&obj);

    let first = rope.get(&binding);
    let second = rope.get(&binding);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(wr.factory().count(), 1);
    assert_eq!(first.owner.as_deref(), Some("Widget"));
    assert_eq!(first.type_level, Some(false));
}

#[test]
fn test_instance_and_type_level_slots_distinct() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));

    let ty = TypeObj::new("Widget");
    let obj = InstanceObj::new(&ty);

    let bound = rope.get(&Binding::for_instance(&obj));
    let unbound = rope.get(&Binding::type_level(&ty));
    assert!(!Arc::ptr_eq(&bound, &unbound));
    assert_eq!(wr.factory().count(), 2);
    assert_eq!(bound.type_level, Some(false));
    assert_eq!(unbound.type_level, Some(true));

    // Each slot stays identity-stable on its own.
    assert!(Arc::ptr_eq(&bound, &rope.get(&Binding::for_instance(&obj))));
    assert!(Arc::ptr_eq(&unbound, &rope.get(&Binding::type_level(&ty))));
    assert_eq!(wr.factory().count(), 2);
}

#[test]
fn test_inherited_method_distinct_per_subclass() {
    let wr = WireRope::new(Recording::new());
    // One definition, inherited by two subclasses.
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));

    let base = TypeObj::new("Base");
    let north = base.subtype("North");
    let south = base.subtype("South");

    let on_north = rope.get(&Binding::type_level(&north));
    let on_south = rope.get(&Binding::type_level(&south));
    assert!(!Arc::ptr_eq(&on_north, &on_south));
    assert_eq!(on_north.owner.as_deref(), Some("North"));
    assert_eq!(on_south.owner.as_deref(), Some("South"));
    assert_eq!(wr.factory().count(), 2);
}

#[test]
fn test_invalid_binding_still_wires_against_instance() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));

    let ty = TypeObj::new("Widget");
    let unrelated = TypeObj::new("Gadget");
    let obj = InstanceObj::new(&ty);

    // The resolver reports no owner for this pair; the rope wires the
    // access anyway, against the instance.
    let mismatched = Binding::for_instance(&obj).with_type(&unrelated);
    let wire = rope.get(&mismatched);
    assert_eq!(wire.owner.as_deref(), Some("Widget"));

    // The fallback landed in the instance's canonical slot.
    let canonical = rope.get(&Binding::for_instance(&obj));
    assert!(Arc::ptr_eq(&wire, &canonical));
    assert_eq!(wr.factory().count(), 1);
}

#[test]
fn test_owner_drop_releases_slot() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));

    let ty = TypeObj::new("Widget");
    let obj = InstanceObj::new(&ty);
    let _ = rope.get(&Binding::for_instance(&obj));
    assert_eq!(rope.core().table().len(), 1);

    drop(obj);
    rope.core().table().sweep();
    assert!(rope.core().table().is_empty());

    // A fresh owner gets a fresh wire.
    let next = InstanceObj::new(&ty);
    let _ = rope.get(&Binding::for_instance(&next));
    assert_eq!(wr.factory().count(), 2);
}

#[test]
fn test_concurrent_first_access_is_benign() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));

    let ty = TypeObj::new("Widget");
    let obj = InstanceObj::new(&ty);
    let binding = Binding::for_instance(&obj);
    let barrier = Barrier::new(2);

    std::thread::scope(|scope| {
        for _ in 0..2 {
            scope.spawn(|| {
                barrier.wait();
                // Each context gets a usable wire even if it loses the race.
                let _ = rope.get(&binding);
            });
        }
    });

    // Two transient wires at most; afterwards every lookup agrees.
    let count = wr.factory().count();
    assert!(count == 1 || count == 2, "constructed {count} wires");
    let settled = rope.get(&binding);
    assert!(Arc::ptr_eq(&settled, &rope.get(&binding)));
    assert_eq!(wr.factory().count(), count);
}

// =============================================================================
// Property Binding
// =============================================================================

#[test]
fn test_property_wire_constructed_once() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::property("size", |_| Value::new(42_i64)));

    let ty = TypeObj::new("Widget");
    let obj = InstanceObj::new(&ty);
    let binding = Binding::for_instance(&obj);

    assert_eq!(as_int(&rope.value(&binding)), 42);
    assert_eq!(as_int(&rope.value(&binding)), 42);
    assert_eq!(wr.factory().count(), 1);

    // The cached wire was pinned to its owner at construction.
    let key = OwnerRef::Instance(obj.clone()).key();
    let wire = rope.core().table().get(key).expect("wire cached");
    assert_eq!(wire.bound_to.lock().as_deref(), Some("Widget"));
}

#[test]
fn test_property_per_owner_values() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::property("size", |_| Value::new(7_i64)));

    let ty = TypeObj::new("Widget");
    let a = InstanceObj::new(&ty);
    let b = InstanceObj::new(&ty);

    assert_eq!(as_int(&rope.value(&Binding::for_instance(&a))), 7);
    assert_eq!(as_int(&rope.value(&Binding::for_instance(&b))), 7);
    // One wire per owner, not per access.
    assert_eq!(wr.factory().count(), 2);
}

// =============================================================================
// Bare Functions and Callable Objects
// =============================================================================

#[test]
fn test_function_wire_built_eagerly() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::function("noop", |_| Value::none()));
    // Constructed at wrap time, before any call, with no owner.
    assert_eq!(wr.factory().count(), 1);
    assert_eq!(rope.wire().owner, None);

    let _ = rope.call(&CallArgs::new());
    assert_eq!(wr.factory().count(), 1);
}

#[test]
fn test_function_forwards_all_argument_combinations() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::function("tally", |args| {
        let base = args.pos(0).and_then(|v| v.downcast_ref::<i64>()).copied();
        let bump = args.kw("bump").and_then(|v| v.downcast_ref::<i64>()).copied();
        Value::new((
            base.unwrap_or(0) + bump.unwrap_or(0),
            args.arity(),
            args.kw_len(),
        ))
    }));

    let observed = |args: &CallArgs| -> (i64, usize, usize) {
        *rope
            .call(args)
            .downcast_ref::<(i64, usize, usize)>()
            .expect("tally result")
    };

    assert_eq!(observed(&CallArgs::new()), (0, 0, 0));
    assert_eq!(observed(&CallArgs::positional([int(5)])), (5, 1, 0));
    // Keyword-only call.
    assert_eq!(observed(&CallArgs::new().with_kw("bump", int(7))), (7, 0, 1));
    assert_eq!(
        observed(&CallArgs::positional([int(5)]).with_kw("bump", int(7))),
        (12, 1, 1)
    );
}

#[test]
fn test_wrapper_metadata_matches_original() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(
        &RawCallable::function("add", |args| {
            let a = args.pos(0).map(|v| as_int(v)).unwrap_or(0);
            let b = args.pos(1).map(|v| as_int(v)).unwrap_or(0);
            int(a + b)
        })
        .with_doc("Add two numbers."),
    );

    assert_eq!(rope.name(), "add");
    assert_eq!(rope.doc(), Some("Add two numbers."));
    let out = rope.call(&CallArgs::positional([int(1), int(2)]));
    assert_eq!(as_int(&out), 3);
}

#[test]
fn test_callable_object_wraps_like_function() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::callable_object("counter", |args| {
        int(args.arity() as i64)
    }));
    assert_eq!(wr.factory().count(), 1);
    assert_eq!(as_int(&rope.call(&CallArgs::positional([int(1), int(2)]))), 2);
}

#[test]
fn test_delegated_mode_exposes_wire_directly() {
    let wr = WireRope::new(Recording::delegated());
    let rope = wr.wrap(&RawCallable::function("noop", |_| int(9)));

    // No call-forwarding layer; callers go through the wire itself.
    let wire = rope.wire();
    assert_eq!(as_int(&wire.invoke(&CallArgs::new())), 9);
    assert_eq!(wr.factory().count(), 1);
}

// =============================================================================
// Usage Errors
// =============================================================================

#[test]
#[should_panic(expected = "not callable")]
fn test_delegated_rope_is_not_callable() {
    let wr = WireRope::new(Recording::delegated());
    let rope = wr.wrap(&RawCallable::function("noop", |_| Value::none()));
    let _ = rope.call(&CallArgs::new());
}

#[test]
#[should_panic(expected = "not a method rope")]
fn test_function_rope_rejects_method_access() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::function("noop", |_| Value::none()));
    let ty = TypeObj::new("Widget");
    let _ = rope.get(&Binding::type_level(&ty));
}

#[test]
#[should_panic(expected = "per-owner")]
fn test_method_rope_has_no_shared_wire() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));
    let _ = rope.wire();
}

#[test]
#[should_panic(expected = "neither an instance nor a type")]
fn test_detached_method_access_is_fatal() {
    let wr = WireRope::new(Recording::new());
    let rope = wr.wrap(&RawCallable::method("compute", |_| Value::none()));
    let _ = rope.get(&Binding::detached());
}
