//! Integration tests for decorators and the Reflector accessors
//!
//! Exercises the public API the way a request-handling layer would: register
//! annotations on a controller and its handlers, then resolve the effective
//! value by walking from the handler up to the class.

use std::sync::Arc;

use reflector::{
    set_metadata, Decorator, DecoratorOptions, MetadataStore, MethodDescriptor, ReflectError,
    Reflector, Target,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

struct CatsController;

impl CatsController {
    fn find_all(&self) {}
    fn create(&self) {}
}

fn class() -> Target {
    Target::class::<CatsController>()
}

fn find_all() -> MethodDescriptor {
    MethodDescriptor::of("find_all", &CatsController::find_all)
}

fn create() -> MethodDescriptor {
    MethodDescriptor::of("create", &CatsController::create)
}

// ============================================================================
// Store roundtrip
// ============================================================================

mod roundtrip {
    use super::*;

    #[test]
    fn test_define_then_lookup() {
        let store = MetadataStore::new();
        store.define("k".into(), json!({"a": [1, 2]}), class());
        assert_eq!(store.lookup("k", &class()), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_transformed_roundtrip() {
        let reflector = Reflector::default();
        let timeout = Reflector::create_decorator(
            DecoratorOptions::<u64>::new().transform(|secs| json!({ "ms": secs * 1000 })),
        );

        timeout
            .call(3)
            .unwrap()
            .apply_to_class(reflector.store(), &class());

        assert_eq!(reflector.get(&timeout, &class()), Some(json!({"ms": 3000})));
    }

    #[test]
    fn test_absent_pairs() {
        let reflector = Reflector::default();
        set_metadata("present", true).apply_to_class(reflector.store(), &class());

        assert_eq!(reflector.get("absent", &class()), None);
        assert_eq!(reflector.get("present", &find_all().value()), None);
    }

    #[test]
    fn test_most_recent_write_wins() {
        let reflector = Reflector::default();
        set_metadata("k", 1).apply_to_class(reflector.store(), &class());
        set_metadata("k", 2).apply_to_class(reflector.store(), &class());
        assert_eq!(reflector.get("k", &class()), Some(json!(2)));
    }
}

// ============================================================================
// Decorators
// ============================================================================

mod decorators {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Throttle {
        limit: u32,
        ttl: u32,
    }

    #[test]
    fn test_method_annotation_lands_on_callable() {
        let reflector = Reflector::default();
        set_metadata("public", true).apply_to_method(reflector.store(), &class(), &find_all());

        // A descriptor obtained separately still resolves to the same callable
        let again = MethodDescriptor::of("find_all", &CatsController::find_all);
        assert_eq!(reflector.get("public", &again.value()), Some(json!(true)));
        assert_eq!(
            reflector.get("public", &Target::function(&CatsController::find_all)),
            Some(json!(true))
        );
        assert_eq!(reflector.get("public", &class()), None);
        assert_eq!(reflector.get("public", &create().value()), None);
    }

    #[test]
    fn test_marker_decorator_stores_empty_object() {
        let reflector = Reflector::default();
        let public = Reflector::create_decorator(DecoratorOptions::<()>::new());

        public
            .call(())
            .unwrap()
            .apply_to_method(reflector.store(), &class(), &find_all());

        assert_eq!(reflector.get(&public, &find_all().value()), Some(json!({})));
    }

    #[test]
    fn test_struct_parameters() {
        let reflector = Reflector::default();
        let throttle = Reflector::create_decorator(DecoratorOptions::<Throttle>::new().key("throttle"));

        throttle
            .call(Throttle { limit: 10, ttl: 60 })
            .unwrap()
            .apply_to_class(reflector.store(), &class());

        let stored: Option<Throttle> = reflector.get_as(&throttle, &class()).unwrap();
        assert_eq!(stored, Some(Throttle { limit: 10, ttl: 60 }));
        assert_eq!(throttle.key(), "throttle");
    }

    #[test]
    fn test_explicit_key_shared_with_set_metadata() {
        let reflector = Reflector::default();
        let roles = Reflector::create_decorator(DecoratorOptions::<Vec<String>>::new().key("roles"));

        set_metadata("roles", json!(["admin"])).apply_to_class(reflector.store(), &class());
        assert_eq!(reflector.get(&roles, &class()), Some(json!(["admin"])));
    }

    #[test]
    fn test_auto_keys_never_collide() {
        let mut keys = std::collections::HashSet::new();
        for _ in 0..10_000 {
            let decorator = Reflector::create_decorator(DecoratorOptions::<u8>::new());
            assert!(keys.insert(decorator.key().clone()));
        }
    }

    #[test]
    fn test_fn_pointer_handlers_do_not_share_annotations() {
        fn list() -> &'static str {
            "list"
        }
        fn remove() -> &'static str {
            "remove"
        }

        let reflector = Reflector::default();
        let handlers: [fn() -> &'static str; 2] = [list, remove];
        let targets = [
            Target::address(handlers[0] as *const (), "list"),
            Target::address(handlers[1] as *const (), "remove"),
        ];

        set_metadata("roles", json!(["admin"])).apply_to_method(
            reflector.store(),
            &class(),
            &MethodDescriptor::new("list", targets[0]),
        );

        assert_eq!(reflector.get("roles", &targets[0]), Some(json!(["admin"])));
        assert_eq!(reflector.get("roles", &targets[1]), None);
        assert_eq!(Target::try_function(&handlers[0]), None);
    }

    #[test]
    fn test_non_finite_floats_store_empty_object() {
        // JSON has no NaN or infinity; they serialize to null
        let reflector = Reflector::default();
        let weight = Reflector::create_decorator(DecoratorOptions::<f64>::new().key("weight"));

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            weight
                .call(value)
                .unwrap()
                .apply_to_class(reflector.store(), &class());
            assert_eq!(reflector.get(&weight, &class()), Some(json!({})));
        }

        weight.call(0.25).unwrap().apply_to_class(reflector.store(), &class());
        assert_eq!(reflector.get(&weight, &class()), Some(json!(0.25)));
    }

    #[test]
    fn test_serialization_failure_reports_key() {
        let decorator = Reflector::create_decorator(
            DecoratorOptions::<f64>::new()
                .key("ratio")
                .transform(|ratio| {
                    let mut map = std::collections::HashMap::new();
                    map.insert(vec![1u8], ratio);
                    map
                }),
        );

        match decorator.call(0.5) {
            Err(ReflectError::Serialize { key, .. }) => assert_eq!(key, "ratio"),
            other => panic!("expected serialization error, got {other:?}"),
        }
    }
}

// ============================================================================
// Retrieval policies
// ============================================================================

mod retrieval {
    use super::*;

    #[test]
    fn test_get_all_order_and_length() {
        let reflector = Reflector::default();
        let targets = [find_all().value(), create().value(), class()];
        set_metadata("k", "m").apply_to_method(reflector.store(), &class(), &create());
        set_metadata("k", "c").apply_to_class(reflector.store(), &class());

        let all = reflector.get_all("k", &targets);
        assert_eq!(all.len(), targets.len());
        for (slot, target) in all.iter().zip(&targets) {
            assert_eq!(slot, &reflector.get("k", target));
        }
        assert_eq!(all, vec![None, Some(json!("m")), Some(json!("c"))]);
    }

    #[test]
    fn test_override_precedence() {
        let reflector = Reflector::default();
        let targets = [find_all().value(), class()];

        set_metadata("k", "vc").apply_to_class(reflector.store(), &class());
        assert_eq!(reflector.get_all_and_override("k", &targets), Some(json!("vc")));

        set_metadata("k", "vm").apply_to_method(reflector.store(), &class(), &find_all());
        assert_eq!(reflector.get_all_and_override("k", &targets), Some(json!("vm")));
    }

    #[test]
    fn test_override_all_absent() {
        let reflector = Reflector::default();
        assert_eq!(
            reflector.get_all_and_override("k", &[find_all().value(), class()]),
            None
        );
        assert_eq!(reflector.get_all_and_override("k", &[]), None);
    }

    #[test]
    fn test_merge_object_union_later_wins() {
        let reflector = Reflector::default();
        let t1 = find_all().value();
        let t2 = class();
        reflector.store().define("k".into(), json!({"a": 1, "b": 1}), t1);
        reflector.store().define("k".into(), json!({"b": 2, "c": 2}), t2);

        assert_eq!(
            reflector.get_all_and_merge("k", &[t1, t2]),
            json!({"a": 1, "b": 2, "c": 2})
        );
    }

    #[test]
    fn test_merge_sequence_concatenation() {
        let reflector = Reflector::default();
        let t1 = find_all().value();
        let t2 = class();
        reflector.store().define("k".into(), json!([1, 2]), t1);
        reflector.store().define("k".into(), json!([3]), t2);

        assert_eq!(reflector.get_all_and_merge("k", &[t1, t2]), json!([1, 2, 3]));
    }

    #[test]
    fn test_merge_all_absent_is_empty_sequence() {
        let reflector = Reflector::default();
        assert_eq!(
            reflector.get_all_and_merge("k", &[find_all().value(), class()]),
            json!([])
        );
        assert_eq!(reflector.get_all_and_merge("k", &[]), json!([]));
    }

    #[test]
    fn test_merge_single_object_unwrapped() {
        let reflector = Reflector::default();
        set_metadata("k", json!({"a": 1})).apply_to_class(reflector.store(), &class());

        assert_eq!(
            reflector.get_all_and_merge("k", &[find_all().value(), class()]),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_merge_single_scalar_wrapped() {
        let reflector = Reflector::default();
        set_metadata("k", "x").apply_to_class(reflector.store(), &class());

        assert_eq!(
            reflector.get_all_and_merge("k", &[find_all().value(), class()]),
            json!(["x"])
        );
    }

    #[test]
    fn test_merge_heterogeneous_shapes_degrade() {
        let reflector = Reflector::default();
        let targets = [find_all().value(), create().value(), class()];
        reflector.store().define("k".into(), json!({"a": 1}), targets[0]);
        reflector.store().define("k".into(), json!("x"), targets[1]);
        reflector.store().define("k".into(), json!({"b": 2}), targets[2]);

        assert_eq!(
            reflector.get_all_and_merge("k", &targets),
            json!([{"a": 1}, "x", {"b": 2}])
        );
    }
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn test_roles_method_overrides_class() {
        let reflector = Reflector::default();
        let roles = Reflector::create_decorator(DecoratorOptions::<Vec<&'static str>>::new().key("roles"));

        reflector
            .annotate(class())
            .decorate(&roles.call(vec!["admin"]).unwrap())
            .method(&find_all(), &[roles.call(vec!["user"]).unwrap()]);

        let handler = Target::function(&CatsController::find_all);
        assert_eq!(
            reflector.get_all_and_override(&roles, &[handler, class()]),
            Some(json!(["user"]))
        );

        // A handler without its own roles falls back to the class
        assert_eq!(
            reflector.get_all_and_override(&roles, &[create().value(), class()]),
            Some(json!(["admin"]))
        );

        let merged: Vec<String> = reflector
            .get_all_and_merge_as(&roles, &[handler, class()])
            .unwrap();
        assert_eq!(merged, vec!["user".to_string(), "admin".to_string()]);
    }

    #[test]
    fn test_typed_merge_of_single_sequence_is_wrapped() {
        let reflector = Reflector::default();
        let roles = Reflector::create_decorator(DecoratorOptions::<Vec<String>>::new().key("roles"));
        roles
            .call(vec!["admin".into()])
            .unwrap()
            .apply_to_class(reflector.store(), &class());
        let targets = [find_all().value(), class()];

        // One defined scope: the sequence comes back wrapped
        assert_eq!(reflector.get_all_and_merge(&roles, &targets), json!([["admin"]]));
        let wrapped: Vec<Vec<String>> = reflector.get_all_and_merge_as(&roles, &targets).unwrap();
        assert_eq!(wrapped, vec![vec!["admin".to_string()]]);
        assert!(matches!(
            reflector.get_all_and_merge_as::<Vec<String>>(&roles, &targets),
            Err(ReflectError::Deserialize { target: None, .. })
        ));

        // Two defined scopes: flat concatenation
        roles
            .call(vec!["user".into()])
            .unwrap()
            .apply_to_method(reflector.store(), &class(), &find_all());
        let flat: Vec<String> = reflector.get_all_and_merge_as(&roles, &targets).unwrap();
        assert_eq!(flat, vec!["user".to_string(), "admin".to_string()]);
    }

    #[test]
    fn test_isolated_stores_do_not_leak() {
        let first = Reflector::new(Arc::new(MetadataStore::new()));
        let second = Reflector::new(Arc::new(MetadataStore::new()));

        set_metadata("k", 1).apply_to_class(first.store(), &class());
        assert_eq!(first.get("k", &class()), Some(json!(1)));
        assert_eq!(second.get("k", &class()), None);
    }

    #[test]
    fn test_global_reflector() {
        struct GlobalController;
        let target = Target::class::<GlobalController>();

        set_metadata("global-test", "on").apply_to_class(&MetadataStore::global(), &target);
        assert_eq!(Reflector::global().get("global-test", &target), Some(json!("on")));
    }
}
