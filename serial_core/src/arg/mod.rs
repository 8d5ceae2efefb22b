//! Argument model: typed values, per-argument constraints and the argument list
//! handed to command handlers.
//!
//! Everything here is `Copy` and const-constructible so constraint tables can live
//! in `static` command arenas.

pub mod parse;

use core::fmt;
use heapless::Vec;

/// Maximum number of arguments along one command path (all levels together).
pub const MAX_ARGS: usize = 16;

/// Expected type of a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgType {
    Int,
    Float,
    String,
}

impl ArgType {
    /// Name shown in signatures when the constraint has no display name.
    pub const fn name(self) -> &'static str {
        match self {
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::String => "string",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A coerced argument. String values borrow from the parsed line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value<'a> {
    #[default]
    Null,
    Int(i32),
    Float(f32),
    Str(&'a str),
}

impl<'a> Value<'a> {
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Inclusive numeric bounds of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Range {
    pub minimum: i32,
    pub maximum: i32,
}

impl Range {
    /// The whole `i32` domain; used when a constraint declares no range.
    pub const FULL: Range = Range::new(i32::MIN, i32::MAX);

    pub const fn new(minimum: i32, maximum: i32) -> Self {
        Self { minimum, maximum }
    }

    pub fn contains(&self, value: &Value<'_>) -> bool {
        match *value {
            Value::Int(v) => v >= self.minimum && v <= self.maximum,
            Value::Float(v) => v >= self.minimum as f32 && v <= self.maximum as f32,
            _ => true,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.minimum, self.maximum)
    }
}

/// Declared shape of one positional argument.
///
/// Built with const chaining so it can sit in a `static`:
/// ```ignore
/// const LEVEL: ArgConstraint = ArgConstraint::new(ArgType::Int).range(0, 255).named("level");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArgConstraint<'a> {
    pub arg_type: ArgType,
    pub range: Option<Range>,
    pub name: Option<&'a str>,
}

impl<'a> ArgConstraint<'a> {
    pub const fn new(arg_type: ArgType) -> Self {
        Self { arg_type, range: None, name: None }
    }

    pub const fn int() -> Self {
        Self::new(ArgType::Int)
    }

    pub const fn float() -> Self {
        Self::new(ArgType::Float)
    }

    pub const fn string() -> Self {
        Self::new(ArgType::String)
    }

    pub const fn range(mut self, minimum: i32, maximum: i32) -> Self {
        self.range = Some(Range::new(minimum, maximum));
        self
    }

    pub const fn named(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Display name, falling back to the type name.
    pub fn display_name(&self) -> &'a str {
        match self.name {
            Some(name) => name,
            None => self.arg_type.name(),
        }
    }

    /// Declared range, or the full `i32` range when none was given.
    pub fn bounds(&self) -> Range {
        self.range.unwrap_or(Range::FULL)
    }

    /// Range check after coercion. Strings and unranged constraints always pass.
    pub fn is_in_range(&self, value: &Value<'_>) -> bool {
        match self.range {
            Some(range) => range.contains(value),
            None => true,
        }
    }
}

/// Ordered argument list accumulated along a command path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args<'a> {
    values: Vec<Value<'a>, MAX_ARGS>,
}

impl<'a> Args<'a> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value; hands it back when the list is full.
    pub fn push(&mut self, value: Value<'a>) -> Result<(), Value<'a>> {
        self.values.push(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `idx`, or `Value::Null` past the end.
    pub fn get(&self, idx: usize) -> Value<'a> {
        self.values.get(idx).copied().unwrap_or(Value::Null)
    }

    pub fn int(&self, idx: usize) -> Option<i32> {
        self.get(idx).as_int()
    }

    pub fn float(&self, idx: usize) -> Option<f32> {
        self.get(idx).as_float()
    }

    pub fn string(&self, idx: usize) -> Option<&'a str> {
        self.get(idx).as_str()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value<'a>> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value<'a>] {
        &self.values
    }
}

impl<'a> core::ops::Index<usize> for Args<'a> {
    type Output = Value<'a>;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}

// ==================== TESTS =======================

#[cfg(test)]
mod arg_tests {
    use super::*;

    #[test]
    fn test_display_name_defaults_to_type_name() {
        assert_eq!(ArgConstraint::int().display_name(), "int");
        assert_eq!(ArgConstraint::float().display_name(), "float");
        assert_eq!(ArgConstraint::string().display_name(), "string");
        assert_eq!(ArgConstraint::int().named("pin").display_name(), "pin");
    }

    #[test]
    fn test_unranged_constraint_accepts_everything() {
        let c = ArgConstraint::int();
        assert!(c.is_in_range(&Value::Int(i32::MIN)));
        assert!(c.is_in_range(&Value::Int(i32::MAX)));
        assert_eq!(c.bounds(), Range::FULL);
    }

    #[test]
    fn test_range_is_inclusive() {
        let c = ArgConstraint::int().range(0, 10);
        assert!(c.is_in_range(&Value::Int(0)));
        assert!(c.is_in_range(&Value::Int(10)));
        assert!(!c.is_in_range(&Value::Int(-5)));
        assert!(!c.is_in_range(&Value::Int(11)));
    }

    #[test]
    fn test_float_range_uses_integer_bounds() {
        let c = ArgConstraint::float().range(-1, 1);
        assert!(c.is_in_range(&Value::Float(0.5)));
        assert!(c.is_in_range(&Value::Float(-1.0)));
        assert!(!c.is_in_range(&Value::Float(1.01)));
    }

    #[test]
    fn test_strings_ignore_ranges() {
        let c = ArgConstraint::string().range(0, 1);
        assert!(c.is_in_range(&Value::Str("anything")));
    }

    #[test]
    fn test_args_accessors() {
        let mut args = Args::new();
        args.push(Value::Int(7)).unwrap();
        args.push(Value::Float(1.5)).unwrap();
        args.push(Value::Str("abc")).unwrap();

        assert_eq!(args.len(), 3);
        assert_eq!(args.int(0), Some(7));
        assert_eq!(args.float(1), Some(1.5));
        assert_eq!(args.string(2), Some("abc"));
        assert_eq!(args.int(1), None);
        assert!(args.get(3).is_null());
        assert_eq!(args[2], Value::Str("abc"));
    }

    #[test]
    fn test_args_capacity() {
        let mut args = Args::new();
        for i in 0..MAX_ARGS {
            assert!(args.push(Value::Int(i as i32)).is_ok());
        }
        assert_eq!(args.push(Value::Int(99)), Err(Value::Int(99)));
        assert_eq!(args.len(), MAX_ARGS);
    }
}
