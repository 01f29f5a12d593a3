//! Lenient parsing of money amounts entered in forms.

/// Parse a dollar amount from user input.
///
/// Surrounding whitespace is ignored. Input that is not a finite number is
/// treated as zero and a warning is logged rather than returning an error,
/// so a mistyped amount never blocks the form submission.
pub fn parse_amount(raw_amount: &str) -> f64 {
    match raw_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        Ok(amount) => {
            tracing::warn!("amount {amount} is not finite, using 0.0 instead");
            0.0
        }
        Err(error) => {
            tracing::warn!("could not parse amount {raw_amount:?} ({error}), using 0.0 instead");
            0.0
        }
    }
}
