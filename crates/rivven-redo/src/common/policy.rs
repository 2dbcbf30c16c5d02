//! Output format policy
//!
//! Controls message framing and how header, schema and column data are
//! represented. Supplied once when the output buffer is built.
//!
//! # Example
//!
//! ```rust
//! use rivven_redo::common::{FormatPolicy, MessageFormat, SchemaMode};
//!
//! let policy = FormatPolicy::builder()
//!     .message(MessageFormat::Short)
//!     .schema_mode(SchemaMode::Full)
//!     .build();
//!
//! assert_eq!(policy.message, MessageFormat::Short);
//! ```

use serde::{Deserialize, Serialize};

macro_rules! impl_enum_str {
    ($ty:ident, $label:literal, { $($variant:ident => [$name:literal $(, $alias:literal)*]),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($name $(| $alias)* => Ok($ty::$variant),)+
                    _ => Err(format!(concat!("Unknown ", $label, ": {}"), s)),
                }
            }
        }
    };
}

/// Message framing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// One message per transaction, begin to commit
    #[default]
    Full,
    /// One message per operation
    Short,
}

impl_enum_str!(MessageFormat, "message format", {
    Full => ["full"],
    Short => ["short"],
});

/// Transaction id representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XidFormat {
    /// `usn.slt.sqn`
    #[default]
    Text,
    /// Single combined integer
    Numeric,
}

impl_enum_str!(XidFormat, "xid format", {
    Text => ["text"],
    Numeric => ["numeric", "number"],
});

/// Where a header field is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    /// Message header only
    #[default]
    First,
    /// Message header and every payload entry
    AllPayloads,
}

impl_enum_str!(FieldScope, "field scope", {
    First => ["first"],
    AllPayloads => ["all_payloads", "all"],
});

/// Timestamp representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampRepr {
    /// Milliseconds since the Unix epoch
    #[default]
    UnixMillis,
    /// ISO-8601 UTC string
    Iso8601,
}

impl_enum_str!(TimestampRepr, "timestamp format", {
    UnixMillis => ["unix_millis", "epoch"],
    Iso8601 => ["iso8601", "iso"],
});

/// SCN representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScnRepr {
    /// Plain integer
    #[default]
    Decimal,
    /// Fixed-width 16 character hex string
    Hex,
}

impl_enum_str!(ScnRepr, "scn format", {
    Decimal => ["decimal"],
    Hex => ["hex"],
});

/// Timestamp representation and scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampFormat {
    pub repr: TimestampRepr,
    pub scope: FieldScope,
}

/// SCN representation and scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScnFormat {
    pub repr: ScnRepr,
    pub scope: FieldScope,
}

/// How much table metadata is attached to row payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// No schema object at all
    Omit,
    /// Owner and table name only
    #[default]
    OwnerName,
    /// Full column list, first occurrence of each table per session
    Full,
    /// Full column list on every payload
    FullRepeated,
}

impl_enum_str!(SchemaMode, "schema mode", {
    Omit => ["omit", "none"],
    OwnerName => ["owner_name", "name"],
    Full => ["full"],
    FullRepeated => ["full_repeated", "repeated"],
});

impl SchemaMode {
    pub fn includes_columns(&self) -> bool {
        matches!(self, SchemaMode::Full | SchemaMode::FullRepeated)
    }
}

/// Schema inclusion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaFormat {
    pub mode: SchemaMode,
    /// Emit the table object number
    pub include_obj: bool,
}

/// Which columns appear without a captured value in insert/delete images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    /// Only primary key columns get a null marker
    #[default]
    PrimaryKey,
    /// Every column gets a null marker
    Full,
}

impl_enum_str!(ColumnFormat, "column format", {
    PrimaryKey => ["primary_key", "pk"],
    Full => ["full", "all"],
});

/// Complete output format policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatPolicy {
    pub message: MessageFormat,
    pub xid: XidFormat,
    pub timestamp: TimestampFormat,
    pub scn: ScnFormat,
    pub schema: SchemaFormat,
    pub column: ColumnFormat,
}

impl FormatPolicy {
    /// Create a new policy builder.
    pub fn builder() -> FormatPolicyBuilder {
        FormatPolicyBuilder::default()
    }

    /// One message per transaction.
    pub fn full() -> Self {
        Self::default()
    }

    /// One message per operation.
    pub fn short() -> Self {
        Self {
            message: MessageFormat::Short,
            ..Default::default()
        }
    }

    pub fn is_short(&self) -> bool {
        self.message == MessageFormat::Short
    }
}

/// Builder for FormatPolicy.
#[derive(Debug, Default)]
pub struct FormatPolicyBuilder {
    policy: FormatPolicy,
}

impl FormatPolicyBuilder {
    pub fn message(mut self, format: MessageFormat) -> Self {
        self.policy.message = format;
        self
    }

    pub fn xid(mut self, format: XidFormat) -> Self {
        self.policy.xid = format;
        self
    }

    pub fn timestamp(mut self, repr: TimestampRepr, scope: FieldScope) -> Self {
        self.policy.timestamp = TimestampFormat { repr, scope };
        self
    }

    pub fn scn(mut self, repr: ScnRepr, scope: FieldScope) -> Self {
        self.policy.scn = ScnFormat { repr, scope };
        self
    }

    pub fn schema_mode(mut self, mode: SchemaMode) -> Self {
        self.policy.schema.mode = mode;
        self
    }

    pub fn include_obj(mut self, enabled: bool) -> Self {
        self.policy.schema.include_obj = enabled;
        self
    }

    pub fn column(mut self, format: ColumnFormat) -> Self {
        self.policy.column = format;
        self
    }

    pub fn build(self) -> FormatPolicy {
        self.policy
    }
}
