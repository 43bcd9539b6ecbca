//! Tests for the dotted-decimal codec.

use super::{AddressError, decode, encode};

mod round_trip {
    use super::*;

    #[test]
    fn boundary_addresses_survive_encode_decode() {
        for address in ["0.0.0.0", "255.255.255.255", "127.0.0.1", "192.168.1.1"] {
            let encoded = encode(address).unwrap();
            assert_eq!(decode(encoded), address);
        }
    }

    #[test]
    fn encode_packs_big_endian() {
        assert_eq!(encode("0.0.0.0").unwrap(), 0);
        assert_eq!(encode("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(encode("127.0.0.1").unwrap(), 0x7F00_0001);
        assert_eq!(encode("1.2.3.4").unwrap(), 0x0102_0304);
    }

    #[test]
    fn decode_unpacks_big_endian() {
        assert_eq!(decode(0x0A00_00FF), "10.0.0.255");
    }

    #[test]
    fn leading_zeros_are_tolerated() {
        assert_eq!(encode("010.000.000.001").unwrap(), encode("10.0.0.1").unwrap());
    }
}

mod invalid {
    use super::*;

    fn reason_for(address: &str) -> &'static str {
        match encode(address) {
            Err(AddressError::InvalidAddress { reason, .. }) => reason,
            Ok(value) => panic!("Expected '{address}' to be rejected, got {value}"),
        }
    }

    #[test]
    fn rejects_too_few_octets() {
        assert_eq!(reason_for("1.2.3"), "expected 4 octets");
    }

    #[test]
    fn rejects_too_many_octets() {
        assert_eq!(reason_for("1.2.3.4.5"), "expected 4 octets");
    }

    #[test]
    fn rejects_out_of_range_octet() {
        assert_eq!(reason_for("256.0.0.1"), "octet out of range 0-255");
        assert_eq!(reason_for("999.1.1.1"), "octet out of range 0-255");
    }

    #[test]
    fn rejects_non_numeric_octets() {
        assert_eq!(reason_for("a.b.c.d"), "octet is not a decimal number");
        assert_eq!(reason_for("1.2.3.+4"), "octet is not a decimal number");
        assert_eq!(reason_for(" 1.2.3.4"), "octet is not a decimal number");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(reason_for(""), "octet is not a decimal number");
        assert_eq!(reason_for("1..3.4"), "octet is not a decimal number");
    }

    #[test]
    fn error_message_names_the_address() {
        let error = encode("not-an-ip").unwrap_err();
        assert!(error.to_string().contains("not-an-ip"));
    }
}
