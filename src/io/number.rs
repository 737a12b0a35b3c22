/// Significant decimal digits needed to round-trip any f64.
pub const SIGNIFICANT_DIGITS: usize = 17;

/// Format a double like C's `%.17g`.
/// param value: The value.
/// return: The text.
pub fn format_g17(value: f64) -> String {
  if value.is_nan() {
    return "nan".to_owned();
  }
  if value.is_infinite() {
    let text = if value > 0.0 { "inf" } else { "-inf" };
    return text.to_owned();
  }
  if value == 0.0 {
    let text = if value.is_sign_negative() { "-0" } else { "0" };
    return text.to_owned();
  }

  // The decimal exponent after rounding to 17 digits decides the notation.
  let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
  let (mantissa, exponent) = match scientific.split_once('e') {
    Some((mantissa, exponent)) => match exponent.parse::<i32>() {
      Ok(exponent) => (mantissa, exponent),
      Err(_) => return scientific,
    },
    None => return scientific,
  };

  if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
    format!(
      "{}e{}{:02}",
      trim_fraction(mantissa),
      if exponent < 0 { '-' } else { '+' },
      exponent.unsigned_abs())
  } else {
    let precision = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
    trim_fraction(&format!("{:.*}", precision, value)).to_owned()
  }
}

fn trim_fraction(text: &str) -> &str {
  if text.contains('.') {
    text.trim_end_matches('0').trim_end_matches('.')
  } else {
    text
  }
}
