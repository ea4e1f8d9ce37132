//! Number formatting for display
//!
//! Presentation only: values are rounded here for the page and nowhere else.

/// Rounds half away from zero to `digits` fractional digits
///
/// A result of zero is always `+0.0`, so `-0.001` does not render as `-0.00`.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats `value` with `,` thousands separators and exactly `digits`
/// fractional digits, e.g. `with_separators(67000.123, 2) == "67,000.12"`
///
/// Non-finite values render as `"-"`.
pub fn with_separators(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let factor = 10f64.powi(digits as i32);
    let scaled = (value.abs() * factor).round();
    // Beyond u128 range there is nothing sensible to group.
    if scaled >= u128::MAX as f64 {
        return format!("{:.*}", digits as usize, value);
    }
    let scaled = scaled as u128;
    let divisor = 10u128.pow(digits);
    let whole = scaled / divisor;
    let fraction = scaled % divisor;

    let digits_str = whole.to_string();
    let mut grouped = String::with_capacity(digits_str.len() + digits_str.len() / 3);
    for (i, ch) in digits_str.chars().enumerate() {
        if i > 0 && (digits_str.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && scaled > 0 { "-" } else { "" };
    if digits == 0 {
        format!("{sign}{grouped}")
    } else {
        format!(
            "{sign}{grouped}.{fraction:0width$}",
            width = digits as usize
        )
    }
}
