//! Number rendering for report fields.

/// Significant digits for real-valued report fields.
const PRECISION: usize = 6;

/// Render `value` in general notation with six significant digits.
///
/// Fixed notation is used for decimal exponents in `-4..6`, scientific
/// notation (`1.23457e+06`) otherwise; trailing zeros are dropped.
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Round first so the exponent reflects carries (999999.7 -> 1e+06).
    let sci = format!("{:.*e}", PRECISION - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return value.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return value.to_string();
    };

    if exp < -4 || exp >= PRECISION as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_general(5.2), "5.2");
        assert_eq!(format_general(3.0), "3");
        assert_eq!(format_general(0.5), "0.5");
        assert_eq!(format_general(123.456789), "123.457");
        assert_eq!(format_general(100000.0), "100000");
        assert_eq!(format_general(0.0001), "0.0001");
        assert_eq!(format_general(-2.25), "-2.25");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(format_general(1234567.0), "1.23457e+06");
        assert_eq!(format_general(999999.7), "1e+06");
        assert_eq!(format_general(0.00001), "1e-05");
        assert_eq!(format_general(-0.000012345), "-1.2345e-05");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(-0.0), "0");
    }
}
