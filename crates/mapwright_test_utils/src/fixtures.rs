//! Fixture shapes, grouped by scenario.

/// Plain records: strings, numbers, nested children and nullable ids.
pub mod objects {
    use mapwright_schema::impl_shape;
    use uuid::Uuid;

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Child {
        pub string: String,
        pub int: i32,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Kid {
        pub string: String,
        pub int: i32,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Source {
        pub string: String,
        pub int: i32,
        pub child: Child,
        pub children: Vec<Child>,
        pub one: String,
        pub from_null_guid: Option<Uuid>,
        pub to_null_guid: Uuid,
        pub null_guid: Option<Uuid>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Target {
        pub string: String,
        pub int: i32,
        pub child: Child,
        pub children: Vec<Kid>,
        pub two: String,
        pub from_null_guid: Uuid,
        pub to_null_guid: Option<Uuid>,
        pub null_guid: Option<Uuid>,
    }

    impl_shape!(Child { string: String, int: i32 });
    impl_shape!(Kid { string: String, int: i32 });

    impl_shape!(Source {
        string: String,
        int: i32,
        #[opaque] child: Child,
        #[opaque] children: Vec<Child>,
        one: String,
        from_null_guid: Option<Uuid>,
        to_null_guid: Uuid,
        null_guid: Option<Uuid>,
    });

    impl_shape!(Target {
        string: String,
        int: i32,
        #[opaque] child: Child,
        #[opaque] children: Vec<Kid>,
        two: String,
        from_null_guid: Uuid,
        to_null_guid: Option<Uuid>,
        null_guid: Option<Uuid>,
    });

    /// A populated source with two children and every id set.
    pub fn sample_source() -> Source {
        Source {
            string: "STRING_VALUE".to_string(),
            int: 23,
            child: Child {
                string: "VALUE".to_string(),
                int: 32354,
            },
            children: vec![
                Child {
                    string: "VALUE_A".to_string(),
                    int: 19,
                },
                Child {
                    string: "VALUE_B".to_string(),
                    int: 20,
                },
            ],
            one: "1".to_string(),
            from_null_guid: Some(Uuid::new_v4()),
            to_null_guid: Uuid::new_v4(),
            null_guid: None,
        }
    }
}

/// Same-named text and binary fields, which only map through base64.
pub mod special {
    use mapwright_schema::impl_shape;

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct StringClass {
        pub convert_me: String,
        pub string_value: String,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ByteArrayClass {
        pub convert_me: Vec<u8>,
        pub byte_array_value: Vec<u8>,
    }

    impl_shape!(StringClass {
        convert_me: String,
        string_value: String,
    });

    impl_shape!(ByteArrayClass {
        convert_me: Vec<u8>,
        byte_array_value: Vec<u8>,
    });
}

/// Shapes that embed a base shape and expose its fields as their own.
pub mod inheritance {
    use mapwright_schema::impl_shape;

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SourceBase {
        pub base_string: String,
        pub source_base_string: String,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Source {
        pub name: String,
        pub source_string: String,
        pub base: SourceBase,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TargetBase {
        pub base_string: String,
        pub target_base_string: String,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Target {
        pub name: String,
        pub target_string: String,
        pub base: TargetBase,
    }

    impl_shape!(SourceBase {
        base_string: String,
        source_base_string: String,
    });

    impl_shape!(Source {
        name: String,
        source_string: String,
        #[inherit] base: SourceBase,
    });

    impl_shape!(TargetBase {
        base_string: String,
        target_base_string: String,
    });

    impl_shape!(Target {
        name: String,
        target_string: String,
        #[inherit] base: TargetBase,
    });

    pub fn sample_source() -> Source {
        Source {
            name: "NAME".to_string(),
            source_string: "SOURCESTRING".to_string(),
            base: SourceBase {
                base_string: "BASESTRING".to_string(),
                source_base_string: "SOURCEBASESTRING".to_string(),
            },
        }
    }
}

/// A parent holding a list of element records, mapped element by element.
pub mod collections {
    use mapwright_schema::impl_shape;
    use uuid::Uuid;

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SourceChild {
        pub id: Uuid,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TargetChild {
        pub id: Uuid,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Source {
        pub list: Vec<SourceChild>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Target {
        pub list: Vec<TargetChild>,
    }

    impl_shape!(SourceChild { id: Uuid });
    impl_shape!(TargetChild { id: Uuid });
    impl_shape!(Source { #[opaque] list: Vec<SourceChild> });
    impl_shape!(Target { #[opaque] list: Vec<TargetChild> });

    /// A source with `count` children, each with a fresh id.
    pub fn sample_source(count: usize) -> Source {
        Source {
            list: (0..count)
                .map(|_| SourceChild { id: Uuid::new_v4() })
                .collect(),
        }
    }
}
