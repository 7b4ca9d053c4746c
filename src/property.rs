//! Property Table
//!
//! The closed set of formatting properties a settings tree can resolve, with the
//! value type and default of each. Every node type reads this table; adding a
//! property means adding a variant, a descriptor row and a `ResolvedSettings` field.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of properties in the table
pub const PROPERTY_COUNT: usize = 9;

/// Identity of a formatting property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    IndentWidth,
    IndentStyle,
    RightMarginPosition,
    ShowRightMargin,
    TabWidth,
    TrimTrailingWhitespace,
    InsertTrailingNewline,
    NewlineType,
    Encoding,
}

impl Property {
    /// Declaration order; stable for enumeration, unrelated to override priority.
    pub const ALL: [Property; PROPERTY_COUNT] = [
        Property::IndentWidth,
        Property::IndentStyle,
        Property::RightMarginPosition,
        Property::ShowRightMargin,
        Property::TabWidth,
        Property::TrimTrailingWhitespace,
        Property::InsertTrailingNewline,
        Property::NewlineType,
        Property::Encoding,
    ];

    /// Canonical kebab-case name
    pub fn name(self) -> &'static str {
        self.describe().name
    }

    /// Slot of this property in per-node storage
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn describe(self) -> &'static PropertyDescriptor {
        &PROPERTY_TABLE[self.index()]
    }

    pub fn value_type(self) -> ValueType {
        self.describe().value_type
    }

    /// Schema default for this property
    pub fn default_value(self) -> PropertyValue {
        self.describe().default.clone()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = SettingsError;

    /// Accepts canonical names and their snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-");
        Property::ALL
            .iter()
            .copied()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| SettingsError::InvalidProperty(s.to_string()))
    }
}

/// Semantic type of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Int,
    UInt,
    Bool,
    IndentStyle,
    NewlineType,
    Text,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Bool => "bool",
            ValueType::IndentStyle => "indent-style",
            ValueType::NewlineType => "newline-type",
            ValueType::Text => "text",
        };
        f.write_str(name)
    }
}

/// Whether indentation uses spaces or tab characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentStyle {
    #[default]
    Spaces,
    Tabs,
}

impl IndentStyle {
    /// Expand a "use spaces instead of tabs" flag.
    pub fn from_use_spaces(use_spaces: bool) -> Self {
        if use_spaces {
            IndentStyle::Spaces
        } else {
            IndentStyle::Tabs
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentStyle::Spaces => f.write_str("spaces"),
            IndentStyle::Tabs => f.write_str("tabs"),
        }
    }
}

impl FromStr for IndentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "space" | "spaces" => Ok(IndentStyle::Spaces),
            "tab" | "tabs" => Ok(IndentStyle::Tabs),
            other => Err(format!("unknown indent style: {}", other)),
        }
    }
}

/// Line terminator written at the end of each line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NewlineType {
    #[default]
    #[serde(rename = "lf")]
    Lf,
    #[serde(rename = "cr")]
    Cr,
    #[serde(rename = "cr-lf")]
    CrLf,
}

impl NewlineType {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineType::Lf => "\n",
            NewlineType::Cr => "\r",
            NewlineType::CrLf => "\r\n",
        }
    }
}

impl fmt::Display for NewlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewlineType::Lf => f.write_str("lf"),
            NewlineType::Cr => f.write_str("cr"),
            NewlineType::CrLf => f.write_str("cr-lf"),
        }
    }
}

impl FromStr for NewlineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lf" => Ok(NewlineType::Lf),
            "cr" => Ok(NewlineType::Cr),
            "crlf" | "cr-lf" => Ok(NewlineType::CrLf),
            other => Err(format!("unknown newline type: {}", other)),
        }
    }
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i32),
    UInt(u32),
    Bool(bool),
    IndentStyle(IndentStyle),
    NewlineType(NewlineType),
    Text(Option<String>),
}

impl PropertyValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            PropertyValue::Int(_) => ValueType::Int,
            PropertyValue::UInt(_) => ValueType::UInt,
            PropertyValue::Bool(_) => ValueType::Bool,
            PropertyValue::IndentStyle(_) => ValueType::IndentStyle,
            PropertyValue::NewlineType(_) => ValueType::NewlineType,
            PropertyValue::Text(_) => ValueType::Text,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            PropertyValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_indent_style(&self) -> Option<IndentStyle> {
        match self {
            PropertyValue::IndentStyle(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_newline_type(&self) -> Option<NewlineType> {
        match self {
            PropertyValue::NewlineType(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content; `None` for non-text values and for unset text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(v) => v.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::UInt(v) => write!(f, "{}", v),
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::IndentStyle(v) => write!(f, "{}", v),
            PropertyValue::NewlineType(v) => write!(f, "{}", v),
            PropertyValue::Text(Some(v)) => f.write_str(v),
            PropertyValue::Text(None) => f.write_str("(unset)"),
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::UInt(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<IndentStyle> for PropertyValue {
    fn from(v: IndentStyle) -> Self {
        PropertyValue::IndentStyle(v)
    }
}

impl From<NewlineType> for PropertyValue {
    fn from(v: NewlineType) -> Self {
        PropertyValue::NewlineType(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(Some(v.to_string()))
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(Some(v))
    }
}

impl From<Option<String>> for PropertyValue {
    fn from(v: Option<String>) -> Self {
        PropertyValue::Text(v)
    }
}

/// One row of the property table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub property: Property,
    pub name: &'static str,
    pub value_type: ValueType,
    pub default: PropertyValue,
}

static PROPERTY_TABLE: [PropertyDescriptor; PROPERTY_COUNT] = [
    PropertyDescriptor {
        property: Property::IndentWidth,
        name: "indent-width",
        value_type: ValueType::Int,
        // -1 means "follow tab width"
        default: PropertyValue::Int(-1),
    },
    PropertyDescriptor {
        property: Property::IndentStyle,
        name: "indent-style",
        value_type: ValueType::IndentStyle,
        default: PropertyValue::IndentStyle(IndentStyle::Spaces),
    },
    PropertyDescriptor {
        property: Property::RightMarginPosition,
        name: "right-margin-position",
        value_type: ValueType::UInt,
        default: PropertyValue::UInt(80),
    },
    PropertyDescriptor {
        property: Property::ShowRightMargin,
        name: "show-right-margin",
        value_type: ValueType::Bool,
        default: PropertyValue::Bool(false),
    },
    PropertyDescriptor {
        property: Property::TabWidth,
        name: "tab-width",
        value_type: ValueType::UInt,
        default: PropertyValue::UInt(8),
    },
    PropertyDescriptor {
        property: Property::TrimTrailingWhitespace,
        name: "trim-trailing-whitespace",
        value_type: ValueType::Bool,
        default: PropertyValue::Bool(true),
    },
    PropertyDescriptor {
        property: Property::InsertTrailingNewline,
        name: "insert-trailing-newline",
        value_type: ValueType::Bool,
        default: PropertyValue::Bool(true),
    },
    PropertyDescriptor {
        property: Property::NewlineType,
        name: "newline-type",
        value_type: ValueType::NewlineType,
        default: PropertyValue::NewlineType(NewlineType::Lf),
    },
    PropertyDescriptor {
        property: Property::Encoding,
        name: "encoding",
        value_type: ValueType::Text,
        default: PropertyValue::Text(None),
    },
];

/// Describe a property
pub fn describe(property: Property) -> &'static PropertyDescriptor {
    property.describe()
}

/// Describe a property by name, failing for names outside the table
pub fn describe_named(name: &str) -> Result<&'static PropertyDescriptor, SettingsError> {
    name.parse::<Property>().map(describe)
}

/// Every descriptor in declaration order
pub fn all_properties() -> &'static [PropertyDescriptor] {
    &PROPERTY_TABLE
}
