//! Tests for the settings record.

use std::time::Duration;

use serde_json::json;

use super::*;
use crate::time::from_epoch_millis;

mod defaults_record {
    use super::*;

    #[test]
    fn default_record_matches_install_defaults() {
        let settings = Settings::default();

        assert!(settings.enabled);
        assert_eq!(settings.rotation_interval_minutes, 1);
        assert_eq!(
            settings.header_names,
            vec!["X-Forwarded-For", "X-Real-IP", "Forwarded"]
        );
        assert_eq!(settings.mode, Mode::Range);
        assert_eq!(settings.manual_address, "127.0.0.1");
        assert_eq!(settings.range_from, "0.0.0.0");
        assert_eq!(settings.range_to, "255.255.255.255");
        assert_eq!(settings.excluded_domains, vec!["ignore_this_domain.com"]);
        assert_eq!(settings.current_address, defaults::UNKNOWN_ADDRESS);
        assert_eq!(settings.next_rotation_time, None);
    }

    #[test]
    fn default_headers_are_in_the_catalog() {
        for header in defaults::HEADER_NAMES {
            assert!(defaults::KNOWN_HEADERS.contains(&header));
        }
    }

    #[test]
    fn is_rewriting_requires_enabled_and_headers() {
        let mut settings = Settings::default();
        assert!(settings.is_rewriting());

        settings.enabled = false;
        assert!(!settings.is_rewriting());

        settings.enabled = true;
        settings.header_names.clear();
        assert!(!settings.is_rewriting());
    }
}

mod persisted_layout {
    use super::*;

    #[test]
    fn serializes_flat_camel_case_record() {
        let value = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(value["enabled"], json!(true));
        assert_eq!(value["rotationIntervalMinutes"], json!(1));
        assert_eq!(value["mode"], json!("range"));
        assert_eq!(value["manualAddress"], json!("127.0.0.1"));
        assert_eq!(value["currentAddress"], json!("N/A"));
        assert_eq!(value["nextRotationTime"], json!(null));
    }

    #[test]
    fn sets_are_persisted_as_delimited_text() {
        let value = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(
            value["headerNames"],
            json!("X-Forwarded-For\nX-Real-IP\nForwarded")
        );
        assert_eq!(value["excludedDomains"], json!("ignore_this_domain.com"));
    }

    #[test]
    fn round_trips_through_json() {
        let settings = Settings {
            mode: Mode::List,
            next_rotation_time: Some(1_700_000_000_000),
            current_address: "8.8.8.8".to_string(),
            ..Settings::default()
        };

        let text = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn empty_sets_round_trip() {
        let settings = Settings {
            header_names: vec![],
            excluded_domains: vec![],
            ..Settings::default()
        };

        let text = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&text).unwrap();
        assert!(back.header_names.is_empty());
        assert!(back.excluded_domains.is_empty());
    }

    #[test]
    fn header_names_also_accept_an_array() {
        let mut value = serde_json::to_value(Settings::default()).unwrap();
        value["headerNames"] = json!(["X-Real-IP", " Via ", ""]);

        let settings: Settings = serde_json::from_value(value).unwrap();
        assert_eq!(settings.header_names, vec!["X-Real-IP", "Via"]);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut value = serde_json::to_value(Settings::default()).unwrap();
        value["mode"] = json!("subnet");

        assert!(serde_json::from_value::<Settings>(value).is_err());
    }
}

mod patch {
    use super::*;

    #[test]
    fn empty_patch_changes_nothing() {
        let mut settings = Settings::default();
        let patch = SettingsPatch::default();
        assert!(patch.is_empty());

        settings.apply(patch);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn supplied_fields_replace_current_values() {
        let mut settings = Settings::default();
        settings.apply(SettingsPatch {
            enabled: Some(false),
            mode: Some(Mode::Manual),
            manual_address: Some("4.4.4.4".to_string()),
            rotation_interval_minutes: Some(15),
            ..SettingsPatch::default()
        });

        assert!(!settings.enabled);
        assert_eq!(settings.mode, Mode::Manual);
        assert_eq!(settings.manual_address, "4.4.4.4");
        assert_eq!(settings.rotation_interval_minutes, 15);
        assert_eq!(settings.range_from, "0.0.0.0");
    }

    #[test]
    fn sets_are_normalized() {
        let mut settings = Settings::default();
        settings.apply(SettingsPatch {
            header_names: Some(vec![
                " X-Real-IP ".to_string(),
                "x-real-ip".to_string(),
                String::new(),
                "Forwarded".to_string(),
            ]),
            excluded_domains: Some(vec!["  a.com".to_string(), "\t".to_string()]),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.header_names, vec!["X-Real-IP", "Forwarded"]);
        assert_eq!(settings.excluded_domains, vec!["a.com"]);
    }

    #[test]
    fn patch_json_never_touches_caches() {
        let mut settings = Settings {
            current_address: "1.2.3.4".to_string(),
            next_rotation_time: Some(42),
            ..Settings::default()
        };

        let patch: SettingsPatch = serde_json::from_value(json!({
            "currentAddress": "6.6.6.6",
            "nextRotationTime": 7,
            "rangeTo": "10.0.0.255"
        }))
        .unwrap();
        settings.apply(patch);

        assert_eq!(settings.current_address, "1.2.3.4");
        assert_eq!(settings.next_rotation_time, Some(42));
        assert_eq!(settings.range_to, "10.0.0.255");
    }

    #[test]
    fn patch_accepts_delimited_domain_text() {
        let patch: SettingsPatch = serde_json::from_value(json!({
            "excludedDomains": "example.com\n\n  intranet.local \n"
        }))
        .unwrap();

        assert_eq!(
            patch.excluded_domains,
            Some(vec!["example.com".to_string(), "intranet.local".to_string()])
        );
    }
}

mod rotation_status {
    use super::*;

    #[test]
    fn paused_without_next_rotation() {
        let settings = Settings::default();
        let status = settings.rotation_status(from_epoch_millis(0));

        assert_eq!(status, RotationStatus::Paused);
        assert_eq!(status.to_string(), "Rotation is manual or paused.");
    }

    #[test]
    fn counts_down_minutes_and_padded_seconds() {
        let settings = Settings {
            next_rotation_time: Some(200_000),
            ..Settings::default()
        };
        let status = settings.rotation_status(from_epoch_millis(75_000));

        assert_eq!(status, RotationStatus::In(Duration::from_secs(125)));
        assert_eq!(status.to_string(), "Next rotation in: 2:05");
    }

    #[test]
    fn due_once_the_time_has_passed() {
        let settings = Settings {
            next_rotation_time: Some(1_000),
            ..Settings::default()
        };

        assert_eq!(
            settings.rotation_status(from_epoch_millis(1_000)),
            RotationStatus::Due
        );
        assert_eq!(
            settings.rotation_status(from_epoch_millis(5_000)).to_string(),
            "Rotating now..."
        );
    }
}

mod normalize {
    use super::*;

    #[test]
    fn keeps_first_spelling_and_order() {
        assert_eq!(
            normalize_set(["b", "A", "a", " B ", "c"]),
            vec!["b", "A", "c"]
        );
    }
}
