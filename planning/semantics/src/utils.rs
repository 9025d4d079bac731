use std::fmt::{Display, Error, Formatter};

/// Writes all elements of the iterator, separated by `sep`.
pub fn disp_iter<T: Display>(
    f: &mut Formatter<'_>,
    iterable: impl IntoIterator<Item = T>,
    sep: &str,
) -> Result<(), Error> {
    let mut i = iterable.into_iter();
    if let Some(first) = i.next() {
        write!(f, "{first}")?;
        for other in i {
            write!(f, "{sep}{other}")?;
        }
    }
    Ok(())
}

/// Formats a number rounded to `digits` decimal places.
///
/// Integer values are written without a decimal point and trailing zeros are dropped,
/// so that `7.0` is written `7` and `2.50` is written `2.5`.
pub fn format_number(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let factor = 10f64.powi(digits.min(i32::MAX as usize) as i32);
    let rounded = if factor.is_finite() {
        (value * factor).round() / factor
    } else {
        value
    };
    if rounded == 0.0 {
        // also catches -0.0
        "0".to_string()
    } else if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        let s = format!("{rounded:.digits$}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(format_number(7.0, 4), "7");
        assert_eq!(format_number(-3.0, 4), "-3");
        assert_eq!(format_number(2.5, 4), "2.5");
        assert_eq!(format_number(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_number(0.99999, 4), "1");
        assert_eq!(format_number(-0.00001, 4), "0");
        assert_eq!(format_number(12.3456789, 2), "12.35");
        assert_eq!(format_number(1e12, 4), "1000000000000");
    }
}
