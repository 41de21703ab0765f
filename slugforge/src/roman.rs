//! Roman numeral codec for the `1..=3999` range.

use crate::errors::{Result, SlugforgeError};
use crate::text;

const ROMAN_VALUES: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Caller guarantees `1 <= num <= 3999`.
pub(crate) fn encode_roman(mut num: u32) -> String {
    debug_assert!((1..=3999).contains(&num));
    let mut result = String::new();
    for &(value, symbol) in &ROMAN_VALUES {
        while num >= value {
            result.push_str(symbol);
            num -= value;
        }
    }
    result
}

/// Encodes a number in `1..=3999` as an upper-case Roman numeral.
pub fn to_roman(num: u32) -> Result<String> {
    if !(1..=3999).contains(&num) {
        return Err(SlugforgeError::invalid_argument(
            "num",
            "number must be between 1 and 3999",
        ));
    }
    Ok(encode_roman(num))
}

/// Encodes a number in `1..=3999` as a lower-case Roman numeral.
pub fn to_roman_lower(num: u32) -> Result<String> {
    Ok(text::to_lower(&to_roman(num)?))
}

fn digit_value(c: char) -> Option<u32> {
    match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

fn max_consecutive(c: char) -> Option<u32> {
    match c.to_ascii_uppercase() {
        'I' | 'X' | 'C' | 'M' => Some(3),
        _ => None,
    }
}

fn is_valid_subtraction(c: char, prev: char) -> bool {
    matches!(
        (c.to_ascii_uppercase(), prev.to_ascii_uppercase()),
        ('I', 'V' | 'X') | ('X', 'L' | 'C') | ('C', 'D' | 'M')
    )
}

/// Parses a Roman numeral, validating digit repetition and subtractive
/// combinations. The numeral must be either all lower case or all upper case.
pub fn parse_roman(roman: &str) -> Result<u32> {
    if text::to_lower(roman) != roman && text::to_upper(roman) != roman {
        return Err(SlugforgeError::invalid_argument(
            "roman",
            "Roman numeral must be either all lowercase or all uppercase",
        ));
    }

    let mut total: i64 = 0;
    let mut prev_value = 0u32;
    let mut prev_char = '\0';
    let mut consecutive = 1u32;
    let mut last_subtraction = false;

    for c in roman.chars().rev() {
        let value = digit_value(c).ok_or_else(|| {
            SlugforgeError::invalid_argument(
                "roman",
                format!("invalid Roman numeral character: {c}"),
            )
        })?;

        if c == prev_char {
            if last_subtraction {
                return Err(SlugforgeError::invalid_argument(
                    "roman",
                    format!("invalid subtractive combination: {c}{prev_char}"),
                ));
            }
            consecutive += 1;
            match max_consecutive(c) {
                Some(limit) if consecutive <= limit => {}
                _ => {
                    return Err(SlugforgeError::invalid_argument(
                        "roman",
                        format!("invalid consecutive characters: {c}{prev_char}"),
                    ))
                }
            }
        } else {
            consecutive = 1;
        }

        if value >= prev_value {
            total += i64::from(value);
            last_subtraction = false;
        } else {
            if last_subtraction || !is_valid_subtraction(c, prev_char) {
                return Err(SlugforgeError::invalid_argument(
                    "roman",
                    format!("invalid subtractive combination: {c}{prev_char}"),
                ));
            }
            if total % i64::from(prev_value) >= i64::from(value) {
                return Err(SlugforgeError::invalid_argument(
                    "roman",
                    format!("invalid subtractive combination: {c}{prev_char}"),
                ));
            }
            total -= i64::from(value);
            last_subtraction = true;
        }
        prev_value = value;
        prev_char = c;
    }

    Ok(total as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_range_round_trips() {
        for i in 1..=3999 {
            assert_eq!(parse_roman(&to_roman(i).unwrap()).unwrap(), i);
        }
    }

    #[test]
    fn lowercase_round_trips() {
        for i in 1..=3999 {
            let roman = to_roman_lower(i).unwrap();
            assert_eq!(parse_roman(&roman).unwrap(), i);
            assert_eq!(roman.to_uppercase(), to_roman(i).unwrap());
        }
    }

    #[test]
    fn out_of_range() {
        assert!(to_roman(0).is_err());
        assert!(to_roman(4000).is_err());
    }

    #[test]
    fn invalid_numerals() {
        assert!(parse_roman("XiX").is_err());
        assert!(parse_roman("IIII").is_err());
        assert!(parse_roman("IVI").is_err());
        assert!(parse_roman("IXC").is_err());
        assert!(parse_roman("XIXC").is_err());
        assert!(parse_roman("Q").is_err());
    }
}
