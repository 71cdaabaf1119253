use proptest::prelude::*;

use moment_platform::cache::{QueryCache, QueryKey, Resource};

fn key_from(segments: &[String]) -> QueryKey {
    let (root, rest) = segments.split_first().expect("at least one segment");
    rest.iter().fold(QueryKey::new(root), |key, s| key.with(s))
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9-]{1,8}", 1..6)
}

proptest! {
    #[test]
    fn every_prefix_matches(segs in segments(), cut in 1usize..6) {
        let key = key_from(&segs);
        let cut = cut.min(segs.len());
        let filter = key_from(&segs[..cut]);
        prop_assert!(key.matches(&filter));
    }

    #[test]
    fn longer_filter_never_matches(segs in segments(), extra in "[a-z]{1,4}") {
        let key = key_from(&segs);
        let filter = key.clone().with(extra);
        prop_assert!(!key.matches(&filter));
    }

    #[test]
    fn different_root_never_matches(segs in segments(), other in "[A-Z]{1,6}") {
        let key = key_from(&segs);
        prop_assert!(!key.matches(&QueryKey::new(&other)));
    }
}

#[test]
fn invalidating_a_resource_spares_other_roots() {
    let cache = QueryCache::default();
    let moments = QueryKey::new("moments").with("0x01").with(1);
    let feed = QueryKey::new("moments-feed").with("null").with(2);
    let listings = QueryKey::new("listings").with(1).with(12);
    for key in [&moments, &feed, &listings] {
        cache.set_data(key, &serde_json::json!({"data": []})).unwrap();
    }

    assert_eq!(cache.invalidate_resources(&[Resource::Moments]), 2);
    assert!(cache.is_invalidated(&moments));
    assert!(cache.is_invalidated(&feed));
    assert!(!cache.is_invalidated(&listings));
}
