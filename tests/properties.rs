//! Property tests for env round-trips and next-date derivation.

use bullpen::core::domain::{RotationInterval, SecretEntry};
use bullpen::core::rotation::calculate_next_rotation_date;
use bullpen::core::store::MemoryStore;
use bullpen::core::vault::{ExportOptions, ImportOptions, VaultStore};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,15}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    // Printable ASCII plus the whitespace that forces quoting.
    "[ -~\t\n]{0,40}"
}

proptest! {
    #[test]
    fn prop_export_then_import_preserves_values(
        pairs in prop::collection::btree_map(key_strategy(), value_strategy(), 0..12)
    ) {
        let mut source = VaultStore::new(MemoryStore::new());
        source.load_vault().unwrap();
        source.create_project("src", "").unwrap();
        for (key, value) in &pairs {
            source.add_secret("src", SecretEntry::new(key.clone(), value.clone())).unwrap();
        }

        let text = source.export_env(&ExportOptions::new("src")).unwrap();

        let mut target = VaultStore::new(MemoryStore::new());
        target.load_vault().unwrap();
        target
            .import_env(&text, &ImportOptions::new("dst").overwrite(true))
            .unwrap();

        for (key, value) in &pairs {
            let copied = target.find_secret("dst", "default", key);
            prop_assert_eq!(copied.map(|s| s.value.as_str()), Some(value.as_str()));
        }
        let count = if pairs.is_empty() {
            0
        } else {
            target.list_secrets("dst", None).unwrap().len()
        };
        prop_assert_eq!(count, pairs.len());
    }

    #[test]
    fn prop_seven_days_is_exact_and_chain_increases(
        secs in 0i64..3_000_000_000,
        steps in 1usize..20,
    ) {
        let interval = RotationInterval::Duration("7d".to_string());
        let start = Utc.timestamp_opt(secs, 0).unwrap();

        let first = calculate_next_rotation_date(&interval, None, Some(start));
        prop_assert_eq!(first, start + Duration::days(7));

        let mut last = first;
        for _ in 0..steps {
            let next = calculate_next_rotation_date(&interval, None, Some(last));
            prop_assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn prop_named_intervals_chain_increases(
        secs in 0i64..3_000_000_000,
        which in 0usize..5,
    ) {
        let interval = [
            RotationInterval::Daily,
            RotationInterval::Weekly,
            RotationInterval::Monthly,
            RotationInterval::Quarterly,
            RotationInterval::Annually,
        ][which]
            .clone();
        let mut last = Utc.timestamp_opt(secs, 0).unwrap();
        for _ in 0..12 {
            let next = calculate_next_rotation_date(&interval, None, Some(last));
            prop_assert!(next > last);
            last = next;
        }
    }
}
