//! Tests for the device data model.

use super::*;

fn device(path: &str, product: &str) -> Device {
    Device::new(path, product)
}

mod device {
    use super::*;

    #[test]
    fn accessors_return_fields() {
        let d = device("/dev/ttyACM0", "Foo Bar");

        assert_eq!(d.path(), "/dev/ttyACM0");
        assert_eq!(d.product(), "Foo Bar");
    }

    #[test]
    fn equality_requires_both_fields() {
        assert_eq!(device("/dev/a", "x"), device("/dev/a", "x"));
        assert_ne!(device("/dev/a", "x"), device("/dev/b", "x"));
        assert_ne!(device("/dev/a", "x"), device("/dev/a", "y"));
    }

    #[test]
    fn orders_by_path_first() {
        assert!(device("/dev/a", "zzz") < device("/dev/b", "aaa"));
    }

    #[test]
    fn orders_by_product_when_paths_match() {
        assert!(device("/dev/a", "alpha") < device("/dev/a", "beta"));
    }

    #[test]
    fn is_complete_requires_path_and_product() {
        assert!(device("/dev/a", "x").is_complete());
        assert!(!device("", "x").is_complete());
        assert!(!device("/dev/a", "").is_complete());
    }

    #[test]
    fn display_matches_listing_format() {
        assert_eq!(
            device("/dev/ttyACM0", "Linkbot").to_string(),
            "'Linkbot'@/dev/ttyACM0"
        );
    }
}

mod device_set {
    use super::*;

    #[test]
    fn collect_sorts_and_deduplicates() {
        let set: DeviceSet = vec![
            device("/dev/c", "x"),
            device("/dev/a", "x"),
            device("/dev/c", "x"),
            device("/dev/b", "x"),
        ]
        .into_iter()
        .collect();

        let paths: Vec<_> = set.iter().map(Device::path).collect();
        assert_eq!(paths, vec!["/dev/a", "/dev/b", "/dev/c"]);
    }

    #[test]
    fn same_path_different_product_are_distinct_members() {
        let set: DeviceSet = vec![device("/dev/a", "old"), device("/dev/a", "new")]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn new_is_empty() {
        let set = DeviceSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn contains_and_find_by_path() {
        let set: DeviceSet = std::iter::once(device("/dev/a", "x")).collect();

        assert!(set.contains(&device("/dev/a", "x")));
        assert!(!set.contains(&device("/dev/a", "y")));
        assert_eq!(set.find_by_path("/dev/a"), Some(&device("/dev/a", "x")));
        assert_eq!(set.find_by_path("/dev/b"), None);
    }

    #[test]
    fn serializes_as_sorted_array() {
        let set: DeviceSet = vec![device("/dev/b", "B"), device("/dev/a", "A")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&set).unwrap();

        assert_eq!(
            json,
            r#"[{"path":"/dev/a","product":"A"},{"path":"/dev/b","product":"B"}]"#
        );
    }
}

mod device_event {
    use super::*;

    #[test]
    fn helpers_set_kind() {
        let add = DeviceEvent::added(device("/dev/a", "x"));
        let remove = DeviceEvent::removed(device("/dev/a", "x"));

        assert!(add.is_added());
        assert!(!add.is_removed());
        assert!(remove.is_removed());
        assert!(!remove.is_added());
    }

    #[test]
    fn display_prefixes_kind() {
        let event = DeviceEvent::added(device("/dev/ttyACM0", "Foo Bar"));
        assert_eq!(event.to_string(), "ADD 'Foo Bar'@/dev/ttyACM0");

        let event = DeviceEvent::removed(device("/dev/ttyACM0", "Foo Bar"));
        assert_eq!(event.to_string(), "REMOVE 'Foo Bar'@/dev/ttyACM0");
    }

    #[test]
    fn serializes_kind_in_lowercase() {
        let event = DeviceEvent::removed(device("/dev/ttyACM1", "Bar"));

        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(
            json,
            r#"{"kind":"remove","device":{"path":"/dev/ttyACM1","product":"Bar"}}"#
        );
    }
}
