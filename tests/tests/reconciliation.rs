//! Engine behaviour beyond the reference scenarios: clearing, cascades,
//! options, error taxonomy and the plan/apply phase boundary.

use graft_tests::prelude::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn parcel_with_items(graph: &mut Graph, ids: &[i64]) -> EntityHandle {
    let parcel = seed_parcel(graph, 1, fields! { "name" => "north" }).unwrap();
    for id in ids {
        seed_item(graph, parcel, Some(*id), &format!("item-{}", id)).unwrap();
    }
    parcel
}

mod clearing {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: clear_collection_is_explicit ==========
    #[test]
    fn test_clear_collection_is_explicit() {
        // GIVEN a parcel with two items behind a recording store
        init_tracing();
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1, 2]);
        let mut store = RecordingStore::new(graph);

        // WHEN merging items = None
        let outcome = engine
            .merge(
                &mut store,
                parcel,
                "Parcel",
                &attrs! { "items" => Attribute::clear_one_to_many() },
            )
            .unwrap();

        // THEN exactly one clear_collection call, never a single-slot write
        assert_eq!(outcome.collections_cleared, 1);
        assert_eq!(
            store.mutations(),
            vec![StoreCall::ClearCollection(CollectionRef::new(parcel, "items"))]
        );
        assert!(members(store.inner(), parcel, "items").is_empty());
    }

    // ========== TEST: clear_owner_regardless_of_content ==========
    #[test]
    fn test_clear_owner_regardless_of_content() {
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let empty = seed_parcel(&mut graph, 1, fields!()).unwrap();
        let linked = seed_parcel(&mut graph, 2, fields!()).unwrap();
        seed_owner(&mut graph, linked, Some(5), "olga").unwrap();

        for parcel in [empty, linked] {
            engine
                .merge(
                    &mut graph,
                    parcel,
                    "Parcel",
                    &attrs! { "owner" => Attribute::clear_many_to_one() },
                )
                .unwrap();
            assert_eq!(graph.get_child(parcel, "owner").unwrap(), None);
        }
    }

    // ========== TEST: empty_list_keeps_anonymous_members ==========
    #[test]
    fn test_empty_list_keeps_anonymous_members() {
        // GIVEN one identified and one anonymous item
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1]);
        let anonymous = seed_item(&mut graph, parcel, None, "loose").unwrap();

        // WHEN merging an empty list
        let outcome = engine
            .merge(&mut graph, parcel, "Parcel", &attrs! { "items" => Vec::<AssociationValue>::new() })
            .unwrap();

        // THEN only the identified member is removed
        assert_eq!(outcome.members_removed, 1);
        assert_eq!(members(&graph, parcel, "items"), vec![anonymous]);
    }
}

mod cascade {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: deep_cascade_reconciles_every_level ==========
    #[test]
    fn test_deep_cascade_reconciles_every_level() {
        // GIVEN parcel -> owner -> address and parcel -> item 1 -> tags {1, 2}
        init_tracing();
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields!()).unwrap();
        let owner = seed_owner(&mut graph, parcel, Some(5), "olga").unwrap();
        let address = graph
            .create_entity("Address", None, fields! { "city" => "Ghent" })
            .unwrap();
        graph.set_child(owner, "address", Some(address)).unwrap();
        let item = seed_item(&mut graph, parcel, Some(1), "a").unwrap();
        seed_member(&mut graph, item, "tags", "Tag", Some(1), fields! { "label" => "old" }).unwrap();
        seed_member(&mut graph, item, "tags", "Tag", Some(2), fields! { "label" => "gone" }).unwrap();

        // WHEN merging a three-level map
        let attributes = attrs! {
            "owner" => AssociationValue::with_id(5i64)
                .attr("address", AssociationValue::new().attr("street", "Main St")),
            "items" => vec![
                AssociationValue::with_id(1i64).attr("tags", vec![
                    AssociationValue::with_id(1i64).attr("label", "new"),
                    AssociationValue::new().attr("label", "fresh"),
                ]),
            ],
        };
        engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN the address is updated in place
        assert_eq!(graph.get_child(owner, "address").unwrap(), Some(address));
        assert_eq!(field(&graph, address, "street"), Some(Value::from("Main St")));
        assert_eq!(field(&graph, address, "city"), Some(Value::from("Ghent")));

        // AND the tags were diffed two levels down
        let expected = EntitySnapshot::new("Item")
            .with_id(1i64)
            .field("name", "a")
            .members(
                "tags",
                vec![
                    EntitySnapshot::new("Tag").with_id(1i64).field("label", "new"),
                    EntitySnapshot::new("Tag").field("label", "fresh"),
                ],
            );
        assert_eq!(graph.snapshot(item).unwrap(), expected);
    }

    // ========== TEST: new_subtree_is_built_from_scratch ==========
    #[test]
    fn test_new_subtree_is_built_from_scratch() {
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields!()).unwrap();

        let attributes = attrs! {
            "owner" => AssociationValue::new()
                .attr("name", "x")
                .attr("address", AssociationValue::new().attr("city", "Lyon")),
        };
        let outcome = engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        assert_eq!(outcome.children_linked, 2);
        let expected = EntitySnapshot::new("Parcel").with_id(1i64).child(
            "owner",
            EntitySnapshot::new("Owner")
                .field("name", "x")
                .child("address", EntitySnapshot::new("Address").field("city", "Lyon")),
        );
        assert_eq!(graph.snapshot(parcel).unwrap(), expected);
    }
}

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: update_in_place_by_default ==========
    #[test]
    fn test_update_in_place_by_default() {
        // GIVEN owner 5 linked
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields!()).unwrap();
        let owner = seed_owner(&mut graph, parcel, Some(5), "olga").unwrap();

        // WHEN merging an owner value carrying identifier 6
        let attributes = attrs! { "owner" => AssociationValue::with_id(6i64).attr("name", "piet") };
        engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN owner 5 keeps the slot and receives the fields
        assert_eq!(graph.get_child(parcel, "owner").unwrap(), Some(owner));
        assert_eq!(field(&graph, owner, "name"), Some(Value::from("piet")));
        assert_eq!(graph.find("Owner", &Identifier::new(6i64)), None);
    }

    // ========== TEST: relink_on_identity_change ==========
    #[test]
    fn test_relink_on_identity_change() {
        let registry = parcel_registry().unwrap();
        let options = MergeOptions::from_json(r#"{ "relink_on_identity_change": true }"#).unwrap();
        let engine = MergeEngine::with_options(&registry, options);
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields!()).unwrap();
        let old_owner = seed_owner(&mut graph, parcel, Some(5), "olga").unwrap();

        let attributes = attrs! { "owner" => AssociationValue::with_id(6i64).attr("name", "piet") };
        let outcome = engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        assert_eq!(outcome.children_linked, 1);
        let new_owner = graph.get_child(parcel, "owner").unwrap().unwrap();
        assert_ne!(new_owner, old_owner);
        assert_eq!(graph.identifier(new_owner).unwrap(), Some(Identifier::new(6i64)));
        assert_eq!(field(&graph, old_owner, "name"), Some(Value::from("olga")));
    }

    // ========== TEST: unknown_attribute_policy ==========
    #[test]
    fn test_unknown_attribute_policy() {
        let registry = parcel_registry().unwrap();
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields!()).unwrap();
        let attributes = attrs! { "name" => "north", "colour" => "red" };

        let lenient = MergeEngine::new(&registry);
        let outcome = lenient.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();
        assert_eq!(outcome.primitives_assigned, 1);
        assert_eq!(field(&graph, parcel, "colour"), None);

        let strict = MergeEngine::with_options(&registry, MergeOptions::strict());
        let err = strict
            .merge(&mut graph, parcel, "Parcel", &attributes)
            .unwrap_err();
        assert!(matches!(err, MergeError::UnknownAttribute { ref attr, .. } if attr == "colour"));
    }

    // ========== TEST: read_only_attribute_is_rejected ==========
    #[test]
    fn test_read_only_attribute_is_rejected() {
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields! { "area" => 10.0 }).unwrap();

        let err = engine
            .merge(&mut graph, parcel, "Parcel", &attrs! { "area" => 12.5 })
            .unwrap_err();

        assert!(matches!(err, MergeError::ReadOnlyAttribute { .. }));
        assert_eq!(field(&graph, parcel, "area"), Some(Value::Float(10.0)));
    }

    // ========== TEST: primitive_type_checks ==========
    #[test]
    fn test_primitive_type_checks() {
        let registry = parcel_registry().unwrap();
        let mut graph = Graph::new();
        let parcel = seed_parcel(&mut graph, 1, fields!()).unwrap();
        let attributes = attrs! { "name" => 42i64 };

        let checked = MergeEngine::new(&registry);
        let err = checked
            .merge(&mut graph, parcel, "Parcel", &attributes)
            .unwrap_err();
        assert!(matches!(err, MergeError::InvalidPrimitiveType { .. }));

        let unchecked = MergeEngine::with_options(
            &registry,
            MergeOptions::default().with_primitive_type_checks(false),
        );
        unchecked.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();
        assert_eq!(field(&graph, parcel, "name"), Some(Value::Int(42)));
    }
}

mod duplicates {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: duplicate_identifiers_touch_one_entity ==========
    #[test]
    fn test_duplicate_identifiers_touch_one_entity() {
        // GIVEN item 1 in the collection
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1]);

        // WHEN the input names item 1 twice and item 4 twice
        let attributes = attrs! {
            "items" => vec![
                AssociationValue::with_id(1i64).attr("name", "first"),
                AssociationValue::with_id(4i64).attr("kind", "shed"),
                AssociationValue::with_id(1i64).attr("kind", "barn"),
                AssociationValue::with_id(4i64).attr("name", "four"),
            ],
        };
        let outcome = engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN one add, no removal, and the copies' fields land on one entity
        assert_eq!(outcome.members_added, 1);
        assert_eq!(outcome.members_removed, 0);
        assert_eq!(members(&graph, parcel, "items").len(), 2);
        let four = member_by_id(&graph, parcel, "items", 4).unwrap();
        assert_eq!(field(&graph, four, "kind"), Some(Value::from("shed")));
        assert_eq!(field(&graph, four, "name"), Some(Value::from("four")));
        let one = member_by_id(&graph, parcel, "items", 1).unwrap();
        assert_eq!(field(&graph, one, "name"), Some(Value::from("first")));
        assert_eq!(field(&graph, one, "kind"), Some(Value::from("barn")));
    }

    // ========== TEST: repeated_item_adds_nested_tag_once ==========
    #[test]
    fn test_repeated_item_adds_nested_tag_once() {
        // GIVEN an empty parcel
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[]);

        // WHEN item 7 appears twice, each copy carrying tag 1
        let copy = || AssociationValue::with_id(7i64).attr("tags", vec![AssociationValue::with_id(1i64)]);
        let attributes = attrs! { "items" => vec![copy(), copy()] };
        let outcome = engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN item 7 and tag 1 are each added exactly once
        assert_eq!(outcome.members_added, 2);
        let seven = member_by_id(&graph, parcel, "items", 7).unwrap();
        assert_eq!(members(&graph, parcel, "items"), vec![seven]);
        assert_eq!(members(&graph, seven, "tags").len(), 1);
        assert_eq!(member_ids(&graph, seven, "tags"), BTreeSet::from([1]));
    }

    // ========== TEST: repeated_item_last_nested_list_wins ==========
    #[test]
    fn test_repeated_item_last_nested_list_wins() {
        // GIVEN item 7 tagged with tag 1
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[7]);
        let seven = member_by_id(&graph, parcel, "items", 7).unwrap();
        seed_member(&mut graph, seven, "tags", "Tag", Some(1), fields!()).unwrap();

        // WHEN item 7 appears twice with different tag lists
        let attributes = attrs! {
            "items" => vec![
                AssociationValue::with_id(7i64).attr("tags", vec![AssociationValue::with_id(2i64)]),
                AssociationValue::with_id(7i64).attr("tags", vec![AssociationValue::with_id(3i64)]),
            ],
        };
        let outcome = engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN the last list is reconciled once: tag 3 added, tag 1 removed
        assert_eq!(outcome.members_added, 1);
        assert_eq!(outcome.members_removed, 1);
        assert_eq!(member_ids(&graph, seven, "tags"), BTreeSet::from([3]));
        assert_eq!(graph.find("Tag", &Identifier::new(2i64)), None);
    }

    // ========== TEST: dropped_member_stored_twice_is_fully_removed ==========
    #[test]
    fn test_dropped_member_stored_twice_is_fully_removed() {
        // GIVEN item 2 added to the collection twice
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1, 2]);
        let two = member_by_id(&graph, parcel, "items", 2).unwrap();
        graph
            .add_entity(&CollectionRef::new(parcel, "items"), two)
            .unwrap();

        // WHEN the input keeps only item 1
        let attributes = attrs! { "items" => vec![AssociationValue::with_id(1i64)] };
        let outcome = engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN every occurrence of item 2 is detached
        assert_eq!(outcome.members_removed, 2);
        assert_eq!(member_ids(&graph, parcel, "items"), BTreeSet::from([1]));
        assert_eq!(members(&graph, parcel, "items").len(), 1);
    }

    // ========== TEST: existing_entity_outside_collection_is_added ==========
    #[test]
    fn test_existing_entity_outside_collection_is_added() {
        // GIVEN item 9 exists but belongs to no parcel
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[]);
        let loose = graph
            .create_entity("Item", Some(Identifier::new(9i64)), fields! { "name" => "loose" })
            .unwrap();

        // WHEN the input names item 9
        let attributes = attrs! { "items" => vec![AssociationValue::with_id(9i64)] };
        engine.merge(&mut graph, parcel, "Parcel", &attributes).unwrap();

        // THEN the resolver returns the existing entity and it is added
        assert_eq!(members(&graph, parcel, "items"), vec![loose]);
        assert_eq!(graph.entities_by_type("Item").count(), 1);
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: schema_mismatch_applies_nothing ==========
    #[test]
    fn test_schema_mismatch_applies_nothing() {
        // GIVEN a map whose nested item carries a primitive where tags are declared
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1]);
        let before = graph.snapshot(parcel).unwrap();
        let mut store = RecordingStore::new(graph);

        let attributes = attrs! {
            "name" => "south",
            "items" => vec![AssociationValue::with_id(1i64).attr("tags", "oops")],
        };

        // WHEN merging
        let err = engine
            .merge(&mut store, parcel, "Parcel", &attributes)
            .unwrap_err();

        // THEN the whole merge fails and nothing was mutated
        assert!(err.is_schema_mismatch());
        assert!(store.mutations().is_empty());
        assert_eq!(store.inner().snapshot(parcel).unwrap(), before);
    }

    // ========== TEST: resolution_failure_aborts_before_apply ==========
    #[test]
    fn test_resolution_failure_aborts_before_apply() {
        // GIVEN a store that only resolves existing identities
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::with_mode(ResolveMode::ExistingOnly);
        let parcel = parcel_with_items(&mut graph, &[1]);
        let before = graph.snapshot(parcel).unwrap();

        // WHEN the input references an unknown item
        let attributes = attrs! {
            "name" => "south",
            "items" => vec![AssociationValue::with_id(1i64), AssociationValue::with_id(77i64)],
        };
        let err = engine
            .merge(&mut graph, parcel, "Parcel", &attributes)
            .unwrap_err();

        // THEN resolution failure and an unchanged parcel
        assert!(err.is_resolution_failure());
        assert!(matches!(err, MergeError::Resolution { ref type_key, .. } if type_key == "Item"));
        assert_eq!(graph.snapshot(parcel).unwrap(), before);
    }

    // ========== TEST: lookup_failure_when_member_vanishes ==========
    #[test]
    fn test_lookup_failure_when_member_vanishes() {
        // GIVEN a plan that removes item 2
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1, 2]);
        let plan = engine
            .plan(
                &mut graph,
                parcel,
                "Parcel",
                &attrs! { "items" => vec![AssociationValue::with_id(1i64)] },
            )
            .unwrap();

        // WHEN item 2 is detached before the plan runs
        let two = member_by_id(&graph, parcel, "items", 2).unwrap();
        graph
            .remove_entity(&CollectionRef::new(parcel, "items"), two)
            .unwrap();
        let err = engine.apply(&mut graph, plan).unwrap_err();

        // THEN lookup failure
        assert!(err.is_lookup_failure());
    }

    // ========== TEST: lookup_failure_when_updated_member_vanishes ==========
    #[test]
    fn test_lookup_failure_when_updated_member_vanishes() {
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1]);
        let plan = engine
            .plan(
                &mut graph,
                parcel,
                "Parcel",
                &attrs! { "items" => vec![AssociationValue::with_id(1i64).attr("name", "x")] },
            )
            .unwrap();

        let one = member_by_id(&graph, parcel, "items", 1).unwrap();
        graph
            .remove_entity(&CollectionRef::new(parcel, "items"), one)
            .unwrap();

        assert!(engine.apply(&mut graph, plan).unwrap_err().is_lookup_failure());
        assert_eq!(field(&graph, one, "name"), Some(Value::from("item-1")));
    }
}

mod phases {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rich_input() -> AttributeMap {
        attrs! {
            "name" => "south",
            "owner" => AssociationValue::with_id(8i64).attr("name", "new owner"),
            "items" => vec![
                AssociationValue::with_id(1i64).attr("name", "kept"),
                AssociationValue::new().attr("name", "added"),
            ],
        }
    }

    // ========== TEST: plan_only_resolves ==========
    #[test]
    fn test_plan_only_resolves() {
        // GIVEN parcel with items 1 and 2 behind a recording store
        init_tracing();
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1, 2]);
        let mut store = RecordingStore::new(graph);

        // WHEN planning
        let plan = engine.plan(&mut store, parcel, "Parcel", &rich_input()).unwrap();

        // THEN nothing but find_or_create touched the store
        assert!(store.mutations().is_empty());
        let resolved: Vec<String> = store
            .resolutions()
            .into_iter()
            .map(|call| match call {
                StoreCall::FindOrCreate { type_key, .. } => type_key,
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(resolved, vec!["Owner".to_string(), "Item".to_string()]);
        assert_eq!(plan.operation_count(), 4);
    }

    // ========== TEST: apply_never_resolves ==========
    #[test]
    fn test_apply_never_resolves() {
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[1, 2]);
        let mut store = RecordingStore::new(graph);
        let plan = engine.plan(&mut store, parcel, "Parcel", &rich_input()).unwrap();
        store.reset();

        let outcome = engine.apply(&mut store, plan).unwrap();

        assert!(store.resolutions().is_empty());
        assert_eq!(outcome.children_linked, 1);
        assert_eq!(outcome.members_added, 1);
        assert_eq!(outcome.members_removed, 1);
        assert_eq!(
            member_ids(store.inner(), parcel, "items"),
            BTreeSet::from([1])
        );
        assert_eq!(members(store.inner(), parcel, "items").len(), 2);
    }

    // ========== TEST: plan_renders_before_apply ==========
    #[test]
    fn test_plan_renders_before_apply() {
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[2]);

        let plan = engine
            .plan(
                &mut graph,
                parcel,
                "Parcel",
                &attrs! {
                    "name" => "south",
                    "owner" => Attribute::clear_many_to_one(),
                    "items" => Vec::<AssociationValue>::new(),
                },
            )
            .unwrap();

        let expected = format!(
            "update Parcel {parcel} set name\n  unlink owner\n  remove {item} (2) from {parcel}.items\n",
            parcel = parcel,
            item = member_by_id(&graph, parcel, "items", 2).unwrap(),
        );
        assert_eq!(plan.to_string(), expected);
    }

    // ========== TEST: mutation_order_follows_plan ==========
    #[test]
    fn test_mutation_order_follows_plan() {
        // GIVEN owner slot empty and item 2 to be removed
        let registry = parcel_registry().unwrap();
        let engine = MergeEngine::new(&registry);
        let mut graph = Graph::new();
        let parcel = parcel_with_items(&mut graph, &[2]);
        let mut store = RecordingStore::new(graph);
        let plan = engine
            .plan(
                &mut store,
                parcel,
                "Parcel",
                &attrs! {
                    "owner" => AssociationValue::new().attr("name", "x"),
                    "items" => vec![AssociationValue::new()],
                },
            )
            .unwrap();
        store.reset();

        // WHEN applied
        engine.apply(&mut store, plan).unwrap();

        // THEN link happens before the owner's fields, adds before removals
        let kinds: Vec<&str> = store
            .mutations()
            .iter()
            .map(|call| match call {
                StoreCall::SetChild { .. } => "set_child",
                StoreCall::SetPrimitive { .. } => "set_primitive",
                StoreCall::AddEntity { .. } => "add",
                StoreCall::RemoveEntity { .. } => "remove",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["set_child", "set_primitive", "add", "remove"]);
    }
}
