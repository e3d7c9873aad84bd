//! Default converter set, installed by
//! [`ConversionServiceBuilder::with_defaults`](crate::ConversionServiceBuilder::with_defaults).
//!
//! | converter                 | shape            | pair              |
//! |---------------------------|------------------|-------------------|
//! | [`StringToNumberFactory`] | factory          | `string -> number` |
//! | [`NumberToStringConverter`] | simple         | `number -> string` |
//! | [`NumberToNumberConverter`] | generic        | `number -> number` |
//! | [`StringToBoolConverter`] | simple           | `string -> bool`  |
//! | [`BoolToStringConverter`] | simple           | `bool -> string`  |
//! | [`StringToEnumFactory`]   | factory          | `string -> enum`  |
//! | [`EnumToStringConverter`] | simple           | `enum -> string`  |
//! | [`EnumToOrdinalConverter`] | generic, global | enum -> any integer |
//!
//! Blank strings convert to null. Numeric narrowing is checked: a value that
//! does not fit the target fails instead of wrapping.

use std::fmt;

use thiserror::Error;
use typeconv_core::{
    BoxError, ConvertiblePair, EnumConstant, EnumMember, RegistrationError, TypeDescriptor,
    TypeHash, Value, builtins,
};
use typeconv_registry::{ConditionalConverter, Converter, ConverterFactory, GenericConverter};

use crate::ConversionService;

/// Failures raised by the default converters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefaultConverterError {
    /// Text is not a number of the target type.
    #[error("cannot parse [{text}] as {target}")]
    InvalidNumber {
        /// Offending text.
        text: String,
        /// Target type name.
        target: String,
    },

    /// Number does not fit the target type.
    #[error("could not convert number [{value}] to target type [{target}]: overflow")]
    NumberOverflow {
        /// Offending number.
        value: String,
        /// Target type name.
        target: String,
    },

    /// Text is not a recognised boolean.
    #[error("invalid boolean value '{0}'")]
    InvalidBoolean(String),

    /// No enum member has this name.
    #[error("no enum constant {enum_type}.{name}")]
    UnknownEnumConstant {
        /// Enum type name.
        enum_type: String,
        /// Requested member name.
        name: String,
    },

    /// Target is not a numeric type.
    #[error("[{0}] is not a numeric type")]
    NotNumeric(String),

    /// The value's Rust payload is not what the converter expects.
    #[error("expected a {0} payload")]
    UnexpectedPayload(&'static str),
}

/// Register every default converter on `service`.
pub fn register_defaults(service: &ConversionService) -> Result<(), RegistrationError> {
    service.add_converter_factory(builtins::STRING, builtins::NUMBER, StringToNumberFactory)?;
    service.add_converter_for(builtins::NUMBER, builtins::STRING, NumberToStringConverter)?;
    service.add_generic_converter(NumberToNumberConverter)?;
    service.add_converter_for(builtins::STRING, builtins::BOOL, StringToBoolConverter)?;
    service.add_converter_for(builtins::BOOL, builtins::STRING, BoolToStringConverter)?;
    service.add_converter_factory(builtins::STRING, builtins::ENUM, StringToEnumFactory)?;
    service.add_converter_for(builtins::ENUM, builtins::STRING, EnumToStringConverter)?;
    service.add_generic_converter(EnumToOrdinalConverter)?;
    tracing::debug!("registered default converters");
    Ok(())
}

// ==========================================================================
// Numbers
// ==========================================================================

/// A numeric payload widened for range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i128),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

fn read_number(value: &Value) -> Option<Number> {
    macro_rules! read_int {
        ($($ty:ty),*) => {
            $(
                if let Some(n) = value.downcast_ref::<$ty>() {
                    return Some(Number::Int(i128::from(*n)));
                }
            )*
        };
    }
    read_int!(i8, i16, i32, i64, u8, u16, u32, u64);

    if let Some(n) = value.downcast_ref::<f32>() {
        return Some(Number::Float(f64::from(*n)));
    }
    value.downcast_ref::<f64>().map(|n| Number::Float(*n))
}

fn format_number(value: &Value) -> Option<String> {
    macro_rules! display {
        ($($ty:ty),*) => {
            $(
                if let Some(n) = value.downcast_ref::<$ty>() {
                    return Some(n.to_string());
                }
            )*
        };
    }
    display!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
    None
}

fn narrow<T>(number: Number, target: &str) -> Result<Value, DefaultConverterError>
where
    T: TryFrom<i128> + typeconv_core::Reflect,
{
    let overflow = || DefaultConverterError::NumberOverflow {
        value: number.to_string(),
        target: target.to_owned(),
    };
    let wide = match number {
        Number::Int(n) => n,
        Number::Float(n) if n.is_finite() => n.trunc() as i128,
        Number::Float(_) => return Err(overflow()),
    };
    T::try_from(wide).map(Value::new).map_err(|_| overflow())
}

/// Write `number` as a value of the numeric type `target`.
fn write_number(
    number: Number,
    target: TypeHash,
    target_name: &str,
) -> Result<Value, DefaultConverterError> {
    let as_f64 = match number {
        Number::Int(n) => n as f64,
        Number::Float(n) => n,
    };
    match target {
        builtins::INT8 => narrow::<i8>(number, target_name),
        builtins::INT16 => narrow::<i16>(number, target_name),
        builtins::INT32 => narrow::<i32>(number, target_name),
        builtins::INT64 => narrow::<i64>(number, target_name),
        builtins::UINT8 => narrow::<u8>(number, target_name),
        builtins::UINT16 => narrow::<u16>(number, target_name),
        builtins::UINT32 => narrow::<u32>(number, target_name),
        builtins::UINT64 => narrow::<u64>(number, target_name),
        builtins::FLOAT => {
            let narrowed = as_f64 as f32;
            if as_f64.is_finite() && !narrowed.is_finite() {
                return Err(DefaultConverterError::NumberOverflow {
                    value: number.to_string(),
                    target: target_name.to_owned(),
                });
            }
            Ok(Value::new(narrowed))
        }
        builtins::DOUBLE => Ok(Value::new(as_f64)),
        _ => Err(DefaultConverterError::NotNumeric(target_name.to_owned())),
    }
}

/// Parse an integer, accepting `0x`, `0X` and `#` hex prefixes after an
/// optional sign.
fn parse_integer(text: &str) -> Option<i128> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'));
    let magnitude = match hex {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            i128::from_str_radix(hex, 16).ok()?
        }
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse::<i128>().ok()?
        }
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn text_of(value: &Value) -> Result<&str, DefaultConverterError> {
    value
        .downcast_ref::<String>()
        .map(|s| s.trim())
        .ok_or(DefaultConverterError::UnexpectedPayload("string"))
}

/// `string -> number`: hands out a parser for each numeric target.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToNumberFactory;

impl ConverterFactory for StringToNumberFactory {
    fn get_converter(&self, target: &TypeDescriptor<'_>) -> Option<Box<dyn Converter>> {
        if !target.is_numeric() {
            return None;
        }
        Some(Box::new(StringToNumber {
            target: target.type_hash(),
            target_name: target.name().to_owned(),
        }))
    }
}

struct StringToNumber {
    target: TypeHash,
    target_name: String,
}

impl Converter for StringToNumber {
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let text = text_of(value)?;
        if text.is_empty() {
            return Ok(None);
        }
        let invalid = || DefaultConverterError::InvalidNumber {
            text: text.to_owned(),
            target: self.target_name.clone(),
        };
        let number = match self.target {
            builtins::FLOAT => return Ok(Some(Value::new(text.parse::<f32>().map_err(|_| invalid())?))),
            builtins::DOUBLE => return Ok(Some(Value::new(text.parse::<f64>().map_err(|_| invalid())?))),
            _ => Number::Int(parse_integer(text).ok_or_else(invalid)?),
        };
        Ok(Some(write_number(number, self.target, &self.target_name)?))
    }
}

/// `number -> string`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberToStringConverter;

impl Converter for NumberToStringConverter {
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let text = format_number(value).ok_or(DefaultConverterError::UnexpectedPayload("number"))?;
        Ok(Some(Value::new(text)))
    }
}

/// `number -> number` between distinct numeric types, with checked narrowing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberToNumberConverter;

impl ConditionalConverter for NumberToNumberConverter {
    fn matches(&self, source: &TypeDescriptor<'_>, target: &TypeDescriptor<'_>) -> bool {
        source.is_numeric() && target.is_numeric() && source != target
    }
}

impl GenericConverter for NumberToNumberConverter {
    fn convertible_types(&self) -> Option<Vec<ConvertiblePair>> {
        Some(vec![ConvertiblePair::new(builtins::NUMBER, builtins::NUMBER)])
    }

    fn convert(
        &self,
        value: Option<&Value>,
        _source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Result<Option<Value>, BoxError> {
        let Some(value) = value else {
            return Ok(None);
        };
        let number = read_number(value).ok_or(DefaultConverterError::UnexpectedPayload("number"))?;
        Ok(Some(write_number(number, target.type_hash(), target.name())?))
    }

    fn as_conditional(&self) -> Option<&dyn ConditionalConverter> {
        Some(self)
    }
}

// ==========================================================================
// Booleans
// ==========================================================================

/// `string -> bool`. Accepts `true/on/yes/1` and `false/off/no/0`, ignoring
/// case.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToBoolConverter;

impl Converter for StringToBoolConverter {
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let text = text_of(value)?;
        if text.is_empty() {
            return Ok(None);
        }
        let flag = match text.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => true,
            "false" | "off" | "no" | "0" => false,
            _ => return Err(DefaultConverterError::InvalidBoolean(text.to_owned()).into()),
        };
        Ok(Some(Value::new(flag)))
    }
}

/// `bool -> string`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolToStringConverter;

impl Converter for BoolToStringConverter {
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let flag = value
            .downcast_ref::<bool>()
            .ok_or(DefaultConverterError::UnexpectedPayload("bool"))?;
        Ok(Some(Value::new(flag.to_string())))
    }
}

// ==========================================================================
// Enums
// ==========================================================================

/// `string -> enum`: looks members up by name on the exact enum target.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToEnumFactory;

impl ConverterFactory for StringToEnumFactory {
    fn get_converter(&self, target: &TypeDescriptor<'_>) -> Option<Box<dyn Converter>> {
        if !target.is_enum() {
            return None;
        }
        Some(Box::new(StringToEnum {
            target: target.type_hash(),
            target_name: target.name().to_owned(),
            members: target.enum_members().to_vec(),
        }))
    }
}

struct StringToEnum {
    target: TypeHash,
    target_name: String,
    members: Vec<EnumMember>,
}

impl Converter for StringToEnum {
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let text = text_of(value)?;
        if text.is_empty() {
            return Ok(None);
        }
        let member = self
            .members
            .iter()
            .find(|m| m.name == text)
            .ok_or_else(|| DefaultConverterError::UnknownEnumConstant {
                enum_type: self.target_name.clone(),
                name: text.to_owned(),
            })?;
        Ok(Some(Value::with_type(
            self.target,
            EnumConstant::new(member.name.clone(), member.ordinal),
        )))
    }
}

/// `enum -> string`: the member name.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumToStringConverter;

impl Converter for EnumToStringConverter {
    fn convert(&self, value: &Value) -> Result<Option<Value>, BoxError> {
        let constant = value
            .downcast_ref::<EnumConstant>()
            .ok_or(DefaultConverterError::UnexpectedPayload("enum constant"))?;
        Ok(Some(Value::new(constant.name.clone())))
    }
}

/// Enum to any integer type: the member ordinal.
///
/// Registered without pairs; applies whenever the source is an enum and the
/// target an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumToOrdinalConverter;

impl ConditionalConverter for EnumToOrdinalConverter {
    fn matches(&self, source: &TypeDescriptor<'_>, target: &TypeDescriptor<'_>) -> bool {
        source.is_enum() && builtins::INTEGERS.contains(&target.type_hash())
    }
}

impl GenericConverter for EnumToOrdinalConverter {
    fn convertible_types(&self) -> Option<Vec<ConvertiblePair>> {
        None
    }

    fn convert(
        &self,
        value: Option<&Value>,
        _source: &TypeDescriptor<'_>,
        target: &TypeDescriptor<'_>,
    ) -> Result<Option<Value>, BoxError> {
        let Some(value) = value else {
            return Ok(None);
        };
        let constant = value
            .downcast_ref::<EnumConstant>()
            .ok_or(DefaultConverterError::UnexpectedPayload("enum constant"))?;
        let ordinal = Number::Int(i128::from(constant.ordinal));
        Ok(Some(write_number(ordinal, target.type_hash(), target.name())?))
    }

    fn as_conditional(&self) -> Option<&dyn ConditionalConverter> {
        Some(self)
    }
}
