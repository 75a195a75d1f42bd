use listing_index::cli::render::render_outline;
use listing_index::index::{primary_metric, secondary_metric};
use listing_index::{Criteria, FieldValue, Listing, ListingError, ListingTree};

fn listing(city: &str, price: f64, surface: f64, bedrooms: u32, bathrooms: u32) -> Listing {
    Listing::new(city, price, surface, bedrooms, bathrooms)
}

fn sample_tree() -> ListingTree {
    let mut tree = ListingTree::new();
    for record in [
        listing("Bogota", 100.0, 10.0, 1, 1),
        listing("Medellin", 300.0, 10.0, 2, 1),
        listing("Cali", 200.0, 10.0, 3, 2),
        listing("Bogota", 400.0, 10.0, 2, 2),
        listing("Cali", 50.0, 10.0, 1, 0),
    ] {
        tree.insert(record).unwrap();
    }
    tree
}

#[test]
fn iteration_is_sorted_and_counts_every_node() {
    let tree = sample_tree();
    let keys: Vec<f64> = tree.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![5.0, 10.0, 20.0, 30.0, 40.0]);
    assert_eq!(tree.len(), 5);
    assert_eq!((&tree).into_iter().count(), 5);
    assert_eq!(tree.min_key(), Some(5.0));
    assert_eq!(tree.max_key(), Some(40.0));
}

#[test]
fn collisions_are_findable_under_both_keys() {
    let mut tree = sample_tree();
    let twin = listing("Pasto", 200.0, 10.0, 3, 2);
    let secondary = secondary_metric(&twin).unwrap();
    assert_eq!(primary_metric(&twin).unwrap(), 20.0);

    tree.insert(twin.clone()).unwrap();
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.find_by_metric(secondary), Some(&twin));
    assert!(tree.find_by_metric(20.0).is_some());

    let stats = tree.stats();
    assert_eq!(stats.records_inserted, 6);
    assert_eq!(stats.key_collisions, 1);
    let report = tree.verify();
    assert!(report.success);
    assert_eq!(report.counts.nodes, 7);
    assert_eq!(report.counts.distinct_records, 6);
}

#[test]
fn explicit_keys_must_be_finite() {
    let mut tree = ListingTree::new();
    tree.insert_with_key(1.5, listing("Cali", 1.0, 1.0, 0, 0))
        .unwrap();
    let err = tree
        .insert_with_key(f64::NAN, listing("Cali", 1.0, 1.0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, ListingError::InvalidArgument(_)));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root_key(), Some(1.5));
}

#[test]
fn zero_surface_is_a_metric_error() {
    let mut tree = sample_tree();
    let err = tree.insert(listing("Cali", 10.0, 0.0, 1, 1)).unwrap_err();
    assert!(matches!(
        err,
        ListingError::InvalidMetricInput {
            field: "surface_total",
            ..
        }
    ));
    assert_eq!(tree.len(), 5);
}

#[test]
fn deletes_and_misses_are_counted() {
    let mut tree = sample_tree();
    let removed = tree.delete_by_metric(20.0).unwrap();
    assert_eq!(removed.city, "Cali");
    assert!(tree.delete_by_metric(20.0).is_none());
    assert!(tree.find_by_metric(20.0).is_none());

    let stats = tree.stats();
    assert_eq!(stats.deletes, 1);
    assert_eq!(stats.delete_misses, 1);
    assert_eq!(stats.nodes, 4);
    assert!(tree.verify().success);
}

#[test]
fn relational_queries_on_public_api() {
    let tree = sample_tree();
    // 20 is the root after the rotation on the third insert.
    assert_eq!(tree.root_key(), Some(20.0));
    assert_eq!(tree.level_of(20.0), Some(1));
    assert_eq!(tree.level_of(5.0), Some(3));
    assert_eq!(tree.parent_of(5.0).map(|r| r.price), Some(100.0));
    assert_eq!(tree.grandparent_of(5.0).map(|r| r.price), Some(200.0));
    assert_eq!(tree.uncle_of(5.0).map(|r| r.price), Some(300.0));
    assert_eq!(tree.sibling_of(5.0), None);
    assert_eq!(tree.balance_factor_of(10.0), Some(1));
    assert_eq!(tree.level_of(99.0), None);
    assert_eq!(tree.uncle_of(99.0), None);
}

#[test]
fn criteria_round_trip_through_json() {
    let criteria = Criteria::default()
        .city("Bogota")
        .min_bedrooms(2)
        .max_price(500_000.0)
        .metric_range(0.0, 1_000.0);
    let json = serde_json::to_string(&criteria).unwrap();
    let back: Criteria = serde_json::from_str(&json).unwrap();
    assert_eq!(back, criteria);

    let tree = sample_tree();
    let hits = tree.find_by_criteria(&back);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].price, 400.0);
}

#[test]
fn outline_shows_projected_tree() {
    let mut tree = ListingTree::new();
    tree.insert(listing("A", 100.0, 10.0, 1, 1)).unwrap();
    tree.insert(listing("B", 300.0, 10.0, 1, 1)).unwrap();
    tree.insert(listing("C", 200.0, 10.0, 1, 1)).unwrap();

    let outline = render_outline(&tree.project().unwrap());
    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("20, city=C"));
    assert!(lines[1].starts_with("├── 10, city=A"));
    assert!(lines[2].starts_with("└── 30, city=B"));
}

#[test]
fn extras_survive_insertion() {
    let mut tree = ListingTree::new();
    let record = listing("Bogota", 100.0, 10.0, 1, 1)
        .with_extra("l3", FieldValue::String("Chapinero".into()))
        .with_extra("rooms", FieldValue::Int(3));
    let key = tree.insert(record).unwrap();
    let found = tree.find_by_metric(key).unwrap();
    assert_eq!(found.extra.get("rooms"), Some(&FieldValue::Int(3)));
    assert!(found.to_string().ends_with("l3=Chapinero rooms=3"));
}
