//! Standard scalar wrapper types
//!
//! Registered by most applications so specs can spell scalars with their
//! familiar wrapper names, e.g. `java.lang.Long(-44L)` or
//! `java.lang.String('text')`. Each evaluates to the plain scalar.

use crate::registry::{ParamType, RegistryBuilder, Signature, TypeRegistry};
use crate::value::Value;

pub const STRING: &str = "java.lang.String";
pub const INTEGER: &str = "java.lang.Integer";
pub const LONG: &str = "java.lang.Long";
pub const DOUBLE: &str = "java.lang.Double";
pub const BOOLEAN: &str = "java.lang.Boolean";

/// Register the standard wrapper types on `builder`
pub fn standard_types(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(
            STRING,
            Signature::new(vec![ParamType::Text], |args| {
                Ok(Value::Text(args.text(0)?.to_string()))
            }),
        )
        .register(
            INTEGER,
            Signature::new(vec![ParamType::Integer], |args| {
                Ok(Value::Integer(args.integer(0)?))
            }),
        )
        .register(
            LONG,
            Signature::new(vec![ParamType::Long], |args| Ok(Value::Long(args.long(0)?))),
        )
        .register(
            DOUBLE,
            Signature::new(vec![ParamType::Double], |args| {
                Ok(Value::Double(args.double(0)?))
            }),
        )
        .register(
            BOOLEAN,
            Signature::new(vec![ParamType::Boolean], |args| {
                Ok(Value::Boolean(args.boolean(0)?))
            }),
        )
}

impl TypeRegistry {
    /// Registry holding only the standard wrapper types
    pub fn standard() -> TypeRegistry {
        standard_types(TypeRegistry::builder()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::instantiate;
    use crate::context::BuildContext;
    use crate::error::BuildError;
    use spec_core::parse_spec;

    fn eval(source: &str) -> Result<Value, BuildError> {
        let root = parse_spec(source).unwrap();
        instantiate(&root, &TypeRegistry::standard(), &BuildContext::default())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(eval("java.lang.Double(-1.5)").unwrap(), Value::Double(-1.5));
        assert_eq!(eval("java.lang.Boolean(TRUE)").unwrap(), Value::Boolean(true));
        assert_eq!(eval("java.lang.Integer ( 123 )").unwrap(), Value::Integer(123));
        assert_eq!(eval("java.lang.Long(-44L)").unwrap(), Value::Long(-44));
        assert_eq!(
            eval("java.lang.String( 'te   \n st' )").unwrap(),
            Value::from("te   \n st")
        );
    }

    #[test]
    fn test_widening_into_wrappers() {
        assert_eq!(eval("java.lang.Long(7)").unwrap(), Value::Long(7));
        assert_eq!(eval("java.lang.Double(7L)").unwrap(), Value::Double(7.0));
    }

    #[test]
    fn test_raw_text_into_string() {
        assert_eq!(
            eval("java.lang.String(\"\"\"a\tb\"\"\")").unwrap(),
            Value::from("a\tb")
        );
    }

    #[test]
    fn test_no_narrowing() {
        assert!(matches!(
            eval("java.lang.Integer(8L)"),
            Err(BuildError::Resolution { .. })
        ));
        assert!(matches!(
            eval("java.lang.Boolean('TRUE')"),
            Err(BuildError::Resolution { .. })
        ));
    }

    #[test]
    fn test_registry_contents() {
        let registry = TypeRegistry::standard();
        assert_eq!(registry.len(), 5);
        assert!(registry.contains(STRING));
        assert!(!registry.contains("java.lang.Object"));
    }
}
