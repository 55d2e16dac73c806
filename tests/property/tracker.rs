use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use proptest::prelude::*;

use groupwatch::fs::mock::MockFileSystem;
use groupwatch::group::{GroupTracker, NamingScheme, TrackerSettings};

const PREFIXES: [&str; 3] = ["A", "B", "C"];

fn launched_at() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// One file write: (prefix index, group id, size, seconds after launch).
fn write() -> impl Strategy<Value = (usize, u8, u64, u64)> {
    (0..PREFIXES.len(), 0u8..4, 0u64..3, 1u64..4)
}

proptest! {
    #[test]
    fn groups_are_claimed_at_most_once_and_never_overfilled(
        rounds in proptest::collection::vec(proptest::collection::vec(write(), 0..6), 1..10),
    ) {
        let fs = MockFileSystem::new();
        let mut tracker = GroupTracker::new(
            TrackerSettings {
                extension: "h5".to_string(),
                required: PREFIXES.iter().map(|p| p.to_string()).collect(),
                naming: NamingScheme {
                    separator: "_".to_string(),
                    min_tokens: 2,
                    id_start: 1,
                    id_end: 2,
                },
                launched_at: launched_at(),
            },
            Arc::new(fs.clone()),
        );

        let mut claimed = HashSet::new();
        for writes in rounds {
            for (prefix, id, size, secs) in writes {
                fs.put_file(
                    format!("/data/{}_{id}.h5", PREFIXES[prefix]),
                    size,
                    launched_at() + Duration::from_secs(secs),
                );
            }

            for group in tracker.scan(Path::new("/data")).unwrap() {
                prop_assert_eq!(group.files.len(), PREFIXES.len());
                prop_assert!(claimed.insert(group.id.clone()), "claimed twice: {}", group.id);
            }

            for id in 0u8..4 {
                let id = id.to_string();
                if let Some(group) = tracker.group(&id) {
                    prop_assert!(group.found <= PREFIXES.len());
                    prop_assert_eq!(group.found, group.files.len());
                    prop_assert!(!tracker.is_claimed(&id));
                }
            }
        }
    }
}
