// Property checks: whatever a codec writes, the same codec reads back.

#[cfg(test)]
mod tests {

    use std::collections::{BTreeMap, HashMap};

    use proptest::prelude::*;

    use objio::codec::{BinaryCodec, TextCodec};
    use objio::config::CodecConfig;
    use objio::io::ObjectIo;
    use objio::persist_record;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Reading {
        sensor: String,
        at: i64,
        value: f64,
        flags: Vec<bool>,
        note: Option<String>,
    }
    persist_record!(Reading => "reading" { sensor, at, value, flags, note });

    fn reading() -> impl Strategy<Value = Reading> {
        (
            ".{0,16}",
            any::<i64>(),
            -1e12f64..1e12,
            proptest::collection::vec(any::<bool>(), 0..8),
            proptest::option::of("[a-z ]{0,12}"),
        )
            .prop_map(|(sensor, at, value, flags, note)| Reading { sensor, at, value, flags, note })
    }

    fn text() -> ObjectIo<TextCodec> {
        ObjectIo::text(CodecConfig::default()).unwrap()
    }

    fn binary() -> ObjectIo<BinaryCodec> {
        ObjectIo::binary(CodecConfig::default()).unwrap()
    }

    proptest! {
        #[test]
        fn prop_records_roundtrip(rows in proptest::collection::vec(reading(), 0..8)) {
            let mut t = text();
            let bytes = t.to_bytes(&rows).unwrap();
            prop_assert_eq!(t.from_bytes::<Vec<Reading>>(&bytes).unwrap(), rows.clone());

            let mut b = binary();
            let bytes = b.to_bytes(&rows).unwrap();
            prop_assert_eq!(b.from_bytes::<Vec<Reading>>(&bytes).unwrap(), rows);
        }

        #[test]
        fn prop_maps_roundtrip(entries in proptest::collection::hash_map(".{0,8}", any::<u32>(), 0..16)) {
            let ordered: BTreeMap<String, u32> = entries.clone().into_iter().collect();

            let mut t = text();
            let bytes = t.to_bytes(&entries).unwrap();
            prop_assert_eq!(t.from_bytes::<HashMap<String, u32>>(&bytes).unwrap(), entries.clone());
            // Both map types share one descriptor.
            prop_assert_eq!(t.from_bytes::<BTreeMap<String, u32>>(&bytes).unwrap(), ordered);

            let mut b = binary();
            let bytes = b.to_bytes(&entries).unwrap();
            prop_assert_eq!(b.from_bytes::<HashMap<String, u32>>(&bytes).unwrap(), entries);
        }

        #[test]
        fn prop_binary_keeps_float_bits(values in proptest::collection::vec(any::<f64>(), 0..16)) {
            let mut b = binary();
            let bytes = b.to_bytes(&values).unwrap();
            let back = b.from_bytes::<Vec<f64>>(&bytes).unwrap();
            let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
            prop_assert_eq!(bits(&back), bits(&values));
        }

        #[test]
        fn prop_text_keeps_finite_floats(values in proptest::collection::vec(any::<f64>().prop_filter("finite", |f| f.is_finite()), 0..16)) {
            let mut t = text();
            let bytes = t.to_bytes(&values).unwrap();
            prop_assert_eq!(t.from_bytes::<Vec<f64>>(&bytes).unwrap(), values);
        }

        #[test]
        fn prop_truncation_never_panics(cut in 0usize..64, payload in ".{0,32}") {
            let mut b = binary();
            let bytes = b.to_bytes(&payload).unwrap();
            let cut = cut.min(bytes.len().saturating_sub(1));
            prop_assert!(b.from_bytes::<String>(&bytes[..cut]).is_err());

            let mut t = text();
            let bytes = t.to_bytes(&payload).unwrap();
            let cut = cut.min(bytes.len().saturating_sub(2));
            prop_assert!(t.from_bytes::<String>(&bytes[..cut]).is_err());
        }
    }
}
