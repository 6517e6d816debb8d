use kiln_asset::ContentHash;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_hash_hex_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let hash = ContentHash::compute(&data);
        let parsed: ContentHash = hash.to_string().parse().unwrap();
        prop_assert_eq!(hash, parsed);
    }

    #[test]
    fn prop_from_slice_requires_32_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        match ContentHash::from_slice(&bytes) {
            Ok(hash) => {
                prop_assert_eq!(bytes.len(), 32);
                prop_assert_eq!(hash.as_bytes().as_slice(), bytes.as_slice());
            }
            Err(_) => prop_assert_ne!(bytes.len(), 32),
        }
    }

    #[test]
    fn prop_parts_framing_keeps_boundaries(
        a in proptest::collection::vec(any::<u8>(), 0..32),
        b in proptest::collection::vec(any::<u8>(), 1..32),
    ) {
        let mut joined = a.clone();
        joined.extend_from_slice(&b);

        // Invariant: part boundaries feed the hash, so splitting the same
        // bytes differently yields a different key
        let split = ContentHash::compute_parts(&[&a, &b]);
        prop_assert_ne!(split, ContentHash::compute(&joined));
        prop_assert_ne!(split, ContentHash::compute_parts(&[&joined]));
    }
}
