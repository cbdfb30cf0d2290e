//! Native function descriptors and the registry that resolves them.

use crate::types::DataType;
use std::collections::HashMap;

/// Identifies the executable implementation behind a native function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeHandle {
    /// Unary negation, `-x`
    Negative,
    /// Unary identity, `+x`
    Positive,
    /// Conversion to the given type
    Cast(DataType),
    Scalar(String),
    Aggregate(String),
}

/// Descriptor of a native function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    /// Canonical name, shared by every alias of the function
    pub display_name: String,
    pub deterministic: bool,
    pub handle: NativeHandle,
    /// Whether the implementation can be parameterized by a concrete type
    pub settable: bool,
    pub type_parameter: Option<DataType>,
}

impl FunctionInfo {
    pub fn scalar(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            deterministic: true,
            handle: NativeHandle::Scalar(display_name.to_string()),
            settable: false,
            type_parameter: None,
        }
    }

    pub fn aggregate(display_name: &str) -> Self {
        Self {
            handle: NativeHandle::Aggregate(display_name.to_string()),
            ..Self::scalar(display_name)
        }
    }

    pub fn cast(display_name: &str, target: DataType) -> Self {
        Self {
            handle: NativeHandle::Cast(target),
            ..Self::scalar(display_name)
        }
    }

    pub fn settable_cast(display_name: &str, default_target: DataType) -> Self {
        Self {
            settable: true,
            ..Self::cast(display_name, default_target)
        }
    }

    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    pub fn with_handle(mut self, handle: NativeHandle) -> Self {
        self.handle = handle;
        self
    }

    /// A fresh instance parameterized by `data_type`; `None` if not settable
    pub fn with_type_parameter(&self, data_type: DataType) -> Option<Self> {
        if !self.settable {
            return None;
        }
        let mut info = self.clone();
        if let NativeHandle::Cast(_) = info.handle {
            info.handle = NativeHandle::Cast(data_type.clone());
        }
        info.type_parameter = Some(data_type);
        Some(info)
    }

    /// Target type when this function is a cast
    pub fn cast_target(&self) -> Option<&DataType> {
        match &self.handle {
            NativeHandle::Cast(target) => Some(self.type_parameter.as_ref().unwrap_or(target)),
            _ => None,
        }
    }
}

/// Lookup service for native functions
pub trait FunctionRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<FunctionInfo>;

    /// Case normalization applied to names before any lookup
    fn normalize_name(&self, name: &str) -> String {
        name.trim().to_lowercase()
    }
}

/// In-memory registry of native functions, keyed by lower-cased name
#[derive(Debug, Clone, Default)]
pub struct BuiltinFunctionRegistry {
    functions: HashMap<String, FunctionInfo>,
}

impl BuiltinFunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the engine's built-in functions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        for name in ["+", "-", "*", "/", "%", "and", "or", "=", "<", "<=", ">", ">="] {
            registry.register(name, FunctionInfo::scalar(name));
        }
        registry.register("not", FunctionInfo::scalar("not"));
        registry.alias("!", "not");
        registry.alias("==", "=");
        registry.register("<>", FunctionInfo::scalar("<>"));
        registry.alias("!=", "<>");
        registry.register("<=>", FunctionInfo::scalar("<=>"));
        registry.register("in", FunctionInfo::scalar("in"));
        registry.register("isnull", FunctionInfo::scalar("isnull"));
        registry.register("isnotnull", FunctionInfo::scalar("isnotnull"));
        registry.register(
            "negative",
            FunctionInfo::scalar("negative").with_handle(NativeHandle::Negative),
        );
        registry.register(
            "positive",
            FunctionInfo::scalar("positive").with_handle(NativeHandle::Positive),
        );

        for name in [
            "abs", "upper", "lower", "concat", "substr", "length", "year", "month", "day",
            "to_date", "coalesce", "if", "round", "floor", "ceil",
        ] {
            registry.register(name, FunctionInfo::scalar(name));
        }
        registry.alias("ucase", "upper");
        registry.alias("lcase", "lower");
        registry.alias("substring", "substr");

        for name in ["rand", "unix_timestamp", "uuid", "current_timestamp"] {
            registry.register(name, FunctionInfo::scalar(name).non_deterministic());
        }

        for name in ["count", "sum", "avg", "min", "max"] {
            registry.register(name, FunctionInfo::aggregate(name));
        }

        registry.register("tinyint", FunctionInfo::cast("tinyint", DataType::TinyInt));
        registry.register("smallint", FunctionInfo::cast("smallint", DataType::SmallInt));
        registry.register("int", FunctionInfo::cast("int", DataType::Int));
        registry.register("bigint", FunctionInfo::cast("bigint", DataType::BigInt));
        registry.register("float", FunctionInfo::cast("float", DataType::Float));
        registry.register("double", FunctionInfo::cast("double", DataType::Double));
        registry.register("boolean", FunctionInfo::cast("boolean", DataType::Boolean));
        registry.register("string", FunctionInfo::cast("string", DataType::String));
        registry.register("timestamp", FunctionInfo::cast("timestamp", DataType::Timestamp));
        registry.register("datetime", FunctionInfo::cast("datetime", DataType::Date));
        registry.register("binary", FunctionInfo::cast("binary", DataType::Binary));
        registry.register(
            "char",
            FunctionInfo::settable_cast("char", DataType::Char(255)),
        );
        registry.register(
            "varchar",
            FunctionInfo::settable_cast("varchar", DataType::Varchar(65535)),
        );
        registry.register(
            "decimal",
            FunctionInfo::settable_cast(
                "decimal",
                DataType::Decimal {
                    precision: 10,
                    scale: 0,
                },
            ),
        );

        registry
    }

    pub fn register(&mut self, name: &str, info: FunctionInfo) {
        self.functions.insert(self.normalize_name(name), info);
    }

    /// Make `alias` resolve to the descriptor registered under `target`
    pub fn alias(&mut self, alias: &str, target: &str) {
        if let Some(info) = self.functions.get(&self.normalize_name(target)).cloned() {
            self.functions.insert(self.normalize_name(alias), info);
        }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionRegistry for BuiltinFunctionRegistry {
    fn lookup(&self, name: &str) -> Option<FunctionInfo> {
        self.functions.get(&self.normalize_name(name)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = BuiltinFunctionRegistry::with_builtins();
        let upper = registry.lookup("UPPER").unwrap();
        assert_eq!(upper.display_name, "upper");
        assert_eq!(registry.lookup(" Upper "), Some(upper));
        assert!(registry.lookup("no_such_fn").is_none());
    }

    #[test]
    fn test_aliases_share_display_name() {
        let registry = BuiltinFunctionRegistry::with_builtins();
        assert_eq!(registry.lookup("!").unwrap().display_name, "not");
        assert_eq!(registry.lookup("!=").unwrap().display_name, "<>");
        assert_eq!(registry.lookup("ucase").unwrap().display_name, "upper");
    }

    #[test]
    fn test_determinism_flags() {
        let registry = BuiltinFunctionRegistry::with_builtins();
        assert!(registry.lookup("abs").unwrap().deterministic);
        assert!(!registry.lookup("rand").unwrap().deterministic);
    }

    #[test]
    fn test_settable_cast() {
        let registry = BuiltinFunctionRegistry::with_builtins();
        let varchar = registry.lookup("varchar").unwrap();
        let sized = varchar.with_type_parameter(DataType::Varchar(20)).unwrap();
        assert_eq!(sized.type_parameter, Some(DataType::Varchar(20)));
        assert_eq!(sized.cast_target(), Some(&DataType::Varchar(20)));
        // the registered descriptor is left untouched
        assert_eq!(varchar.type_parameter, None);

        let int = registry.lookup("int").unwrap();
        assert!(int.with_type_parameter(DataType::Int).is_none());
        assert_eq!(int.cast_target(), Some(&DataType::Int));
    }
}
