//! Tests for address generation.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{AddressError, FALLBACK_ADDRESS, encode, generate, list_entries};
use crate::settings::{Mode, Settings};

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

fn range(from: &str, to: &str) -> Settings {
    Settings {
        mode: Mode::Range,
        range_from: from.to_string(),
        range_to: to.to_string(),
        ..Settings::default()
    }
}

fn list(text: &str) -> Settings {
    Settings {
        mode: Mode::List,
        address_list: text.to_string(),
        ..Settings::default()
    }
}

mod manual {
    use super::*;

    #[test]
    fn returns_manual_address_verbatim() {
        let settings = Settings {
            mode: Mode::Manual,
            manual_address: "4.4.4.4".to_string(),
            ..Settings::default()
        };

        assert_eq!(generate(&settings, &mut rng()).unwrap(), "4.4.4.4");
    }

    #[test]
    fn does_not_validate_manual_address() {
        let settings = Settings {
            mode: Mode::Manual,
            manual_address: "not-an-ip".to_string(),
            ..Settings::default()
        };

        assert_eq!(generate(&settings, &mut rng()).unwrap(), "not-an-ip");
    }

    #[test]
    fn ignores_other_mode_parameters() {
        let settings = Settings {
            mode: Mode::Manual,
            manual_address: "4.4.4.4".to_string(),
            range_from: "garbage".to_string(),
            address_list: String::new(),
            ..Settings::default()
        };

        assert!(generate(&settings, &mut rng()).is_ok());
    }
}

mod range_mode {
    use super::*;

    #[test]
    fn degenerate_range_always_returns_the_single_address() {
        let settings = range("10.0.0.0", "10.0.0.0");
        let mut rng = rng();

        for _ in 0..100 {
            assert_eq!(generate(&settings, &mut rng).unwrap(), "10.0.0.0");
        }
    }

    #[test]
    fn reversed_bounds_behave_like_ordered_bounds() {
        let reversed = range("255.255.255.255", "0.0.0.0");
        let ordered = range("0.0.0.0", "255.255.255.255");
        let (mut rng_a, mut rng_b) = (rng(), rng());

        for _ in 0..100 {
            assert_eq!(
                generate(&reversed, &mut rng_a).unwrap(),
                generate(&ordered, &mut rng_b).unwrap()
            );
        }
    }

    #[test]
    fn results_stay_within_inclusive_bounds() {
        let settings = range("192.168.1.250", "192.168.2.5");
        let low = encode("192.168.1.250").unwrap();
        let high = encode("192.168.2.5").unwrap();
        let mut rng = rng();

        for _ in 0..1_000 {
            let value = encode(&generate(&settings, &mut rng).unwrap()).unwrap();
            assert!((low..=high).contains(&value));
        }
    }

    #[test]
    fn both_endpoints_are_reachable() {
        let settings = range("10.0.0.1", "10.0.0.2");
        let mut rng = rng();
        let seen: std::collections::HashSet<String> = (0..200)
            .map(|_| generate(&settings, &mut rng).unwrap())
            .collect();

        assert!(seen.contains("10.0.0.1"));
        assert!(seen.contains("10.0.0.2"));
    }

    #[test]
    fn malformed_bound_is_an_error() {
        let settings = range("10.0.0.1", "10.0.0.300");

        assert!(matches!(
            generate(&settings, &mut rng()),
            Err(AddressError::InvalidAddress { address, .. }) if address == "10.0.0.300"
        ));
    }
}

mod list_mode {
    use super::*;

    #[test]
    fn empty_list_falls_back() {
        assert_eq!(generate(&list(""), &mut rng()).unwrap(), FALLBACK_ADDRESS);
        assert_eq!(FALLBACK_ADDRESS, "127.0.0.1");
    }

    #[test]
    fn blank_lines_only_falls_back() {
        assert_eq!(
            generate(&list("\n   \n\t\n"), &mut rng()).unwrap(),
            "127.0.0.1"
        );
    }

    #[test]
    fn choice_is_roughly_uniform() {
        let settings = list("1.1.1.1\n2.2.2.2");
        let mut rng = rng();
        let trials = 10_000;

        let ones = (0..trials)
            .map(|_| generate(&settings, &mut rng).unwrap())
            .inspect(|address| assert!(address == "1.1.1.1" || address == "2.2.2.2"))
            .filter(|address| address == "1.1.1.1")
            .count();

        assert!((4_500..=5_500).contains(&ones), "got {ones} of {trials}");
    }

    #[test]
    fn entries_are_trimmed() {
        let settings = list("   8.8.8.8  \n");
        assert_eq!(generate(&settings, &mut rng()).unwrap(), "8.8.8.8");
    }

    #[test]
    fn list_entries_drops_blanks_and_keeps_order() {
        assert_eq!(
            list_entries(" a \n\n b\r\n  \nc"),
            vec!["a", "b", "c"]
        );
    }
}
