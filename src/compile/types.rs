use crate::model::TypeRepr;

// (yang type, ConfM wrapper, Java primitive)
const BUILTINS: &[(&str, &str, &str)] = &[
    ("string", "com.tailf.confm.xs.String", "String"),
    ("boolean", "com.tailf.confm.xs.Boolean", "boolean"),
    ("int8", "com.tailf.confm.xs.Byte", "byte"),
    ("int16", "com.tailf.confm.xs.Short", "short"),
    ("int32", "com.tailf.confm.xs.Int", "int"),
    ("int64", "com.tailf.confm.xs.Long", "long"),
    ("uint8", "com.tailf.confm.xs.UnsignedByte", "short"),
    ("uint16", "com.tailf.confm.xs.UnsignedShort", "int"),
    ("uint32", "com.tailf.confm.xs.UnsignedInt", "long"),
    ("uint64", "com.tailf.confm.xs.UnsignedLong", "java.math.BigInteger"),
];

/// Map a YANG type name to its wrapper/primitive pair.
///
/// Pure: unknown names come back as the string pair with `defaulted` set;
/// reporting that is the caller's job.
pub fn resolve(type_name: &str) -> TypeRepr {
    match BUILTINS.iter().find(|(name, _, _)| *name == type_name) {
        Some((_, wrapper, primitive)) => TypeRepr {
            yang_type: type_name.to_string(),
            wrapper,
            primitive,
            defaulted: false,
        },
        None => TypeRepr {
            yang_type: type_name.to_string(),
            wrapper: BUILTINS[0].1,
            primitive: BUILTINS[0].2,
            defaulted: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_types() {
        let u = resolve("uint32");
        assert_eq!(u.wrapper, "com.tailf.confm.xs.UnsignedInt");
        assert_eq!(u.primitive, "long");
        assert!(!u.defaulted);
        assert!(!u.is_string());

        let s = resolve("string");
        assert!(s.is_string());
        assert!(!s.defaulted);
    }

    #[test]
    fn unknown_type_defaults_to_string() {
        let d = resolve("decimal64");
        assert!(d.defaulted);
        assert!(d.is_string());
        assert_eq!(d.wrapper, "com.tailf.confm.xs.String");
        assert_eq!(d.yang_type, "decimal64");
    }

    #[test]
    fn resolve_is_pure() {
        assert_eq!(resolve("inet:ip-address"), resolve("inet:ip-address"));
    }
}
