//! Property tests for field conversions and repeated execution.

use base64::{engine::general_purpose, Engine as _};
use mapwright::{impl_shape, Mapper};
use mapwright_test_utils::fixtures::special::{ByteArrayClass, StringClass};
use proptest::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plain {
    pub count: i64,
    pub label: String,
    pub maybe: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wrapped {
    pub count: Option<i64>,
    pub label: String,
    pub maybe: i32,
}

impl_shape!(Plain {
    count: i64,
    label: String,
    maybe: Option<i32>,
});

impl_shape!(Wrapped {
    count: Option<i64>,
    label: String,
    maybe: i32,
});

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Bytes -> text -> bytes through two mappings gives back the input.
    #[test]
    fn test_base64_round_trip(
        convert_me in proptest::collection::vec(any::<u8>(), 0..256),
        other in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let encode = Mapper::default()
            .from::<ByteArrayClass>()
            .to::<StringClass>()
            .using("convert_me").to_set("convert_me")
            .using("byte_array_value").to_set("string_value")
            .create()
            .unwrap();
        let decode = Mapper::default()
            .from::<StringClass>()
            .to::<ByteArrayClass>()
            .using("convert_me").to_set("convert_me")
            .using("string_value").to_set("byte_array_value")
            .create()
            .unwrap();

        let source = ByteArrayClass { convert_me, byte_array_value: other };
        let text = encode.map(&source).unwrap();
        prop_assert_eq!(&text.convert_me, &general_purpose::STANDARD.encode(&source.convert_me));

        let back = decode.map(&text).unwrap();
        prop_assert_eq!(back, source);
    }

    /// Present values are wrapped and unwrapped unchanged; absent becomes zero.
    #[test]
    fn test_nullable_wrap_unwrap(count in any::<i64>(), maybe in any::<Option<i32>>(), label in ".{0,32}") {
        let mapping = Mapper::default().from::<Plain>().to::<Wrapped>().create().unwrap();

        let wrapped = mapping.map(&Plain { count, label: label.clone(), maybe }).unwrap();
        prop_assert_eq!(wrapped.count, Some(count));
        prop_assert_eq!(wrapped.maybe, maybe.unwrap_or_default());
        prop_assert_eq!(wrapped.label, label);
    }

    /// Executing a mapping repeatedly yields equal results.
    #[test]
    fn test_idempotent_execution(count in any::<i64>(), maybe in any::<Option<i32>>()) {
        let mapping = Mapper::default().from::<Plain>().to::<Wrapped>().create().unwrap();
        let source = Plain { count, label: "x".to_string(), maybe };

        let first = mapping.map(&source).unwrap();
        let second = mapping.map(&source).unwrap();
        prop_assert_eq!(first, second);
    }
}
