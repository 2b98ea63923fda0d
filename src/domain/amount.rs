use std::fmt;

/// Loan amounts and balances are plain floats, matching the decimal text
/// form the flat ledger files have always carried.
pub type Amount = f64;

/// Format an amount the way it is persisted and exported.
/// Integral values keep one decimal place ("100.0"), everything else uses
/// the shortest round-tripping form ("12.34").
pub fn format_amount(value: Amount) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Parse a decimal string into an amount.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    input
        .trim()
        .parse::<Amount>()
        .map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
