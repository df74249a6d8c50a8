use std::fmt;
use thiserror::Error;

/// Integer read from an operator-supplied token. Not checked against the
/// live window table; see [`crate::platform::WindowTable::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedHandle(usize);

impl ParsedHandle {
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParsedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandleParseError {
    #[error("no digits")]
    Empty,
    #[error("invalid digit for base {radix}")]
    InvalidDigit { radix: u32 },
    #[error("value does not fit a pointer-sized integer")]
    Overflow,
}

/// Base detection rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRule {
    /// Leading `0x` / `0X`, dropped before parsing.
    HexPrefix,
    /// Any of `a-f` / `A-F` anywhere in the token.
    HexLetters,
    /// Trailing `h`, dropped before parsing.
    HexSuffix,
    Decimal,
}

impl BaseRule {
    pub const fn radix(self) -> u32 {
        match self {
            BaseRule::Decimal => 10,
            BaseRule::HexPrefix | BaseRule::HexLetters | BaseRule::HexSuffix => 16,
        }
    }
}

/// Picks the base for an already whitespace-free token and returns the
/// digits that remain once any prefix or suffix is removed.
pub fn detect_base(cleaned: &str) -> (BaseRule, &str) {
    if let Some(prefix) = cleaned.get(..2) {
        if prefix.eq_ignore_ascii_case("0x") {
            return (BaseRule::HexPrefix, &cleaned[2..]);
        }
    }
    if cleaned.chars().any(|c| matches!(c, 'a'..='f' | 'A'..='F')) {
        return (BaseRule::HexLetters, cleaned);
    }
    if let Some(digits) = cleaned.strip_suffix('h') {
        return (BaseRule::HexSuffix, digits);
    }
    (BaseRule::Decimal, cleaned)
}

/// Parses a window handle typed by an operator.
///
/// Accepts `0x1234`, `1234h`, bare hex such as `1a2b` and plain decimal.
/// Whitespace anywhere in the token is ignored.
pub fn parse(text: &str) -> Result<ParsedHandle, HandleParseError> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (rule, digits) = detect_base(&cleaned);
    let radix = rule.radix();

    if digits.is_empty() {
        return Err(HandleParseError::Empty);
    }
    // from_str_radix tolerates a leading '+', a handle token does not
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(HandleParseError::InvalidDigit { radix });
    }
    usize::from_str_radix(digits, radix)
        .map(ParsedHandle)
        .map_err(|_| HandleParseError::Overflow)
}
