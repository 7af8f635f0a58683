//! Input masks applied as the operator types.

const MATRICULE_DIGITS: usize = 4;
const VEHICLE_DIGITS: usize = 4;

/// Coerce raw input to `LETTER-DDDD`.
///
/// The first ASCII letter becomes the prefix; only digits typed after it are
/// kept. Input without any letter yields an empty string.
pub fn matricule(raw: &str) -> String {
    let mut chars = raw.chars().skip_while(|c| !c.is_ascii_alphabetic());
    let Some(letter) = chars.next() else {
        return String::new();
    };

    let digits: String = chars
        .filter(char::is_ascii_digit)
        .take(MATRICULE_DIGITS)
        .collect();

    format!("{}-{}", letter.to_ascii_uppercase(), digits)
}

/// Keep at most four digits; a complete number always starts with `9`.
pub fn vehicle_number(raw: &str) -> String {
    let mut digits = digits_only(raw, VEHICLE_DIGITS);
    if digits.len() == VEHICLE_DIGITS {
        digits.replace_range(0..1, "9");
    }
    digits
}

pub fn digits_only(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(max_len)
        .collect()
}

/// Decimal reading such as a glucose level; `,` is accepted as separator.
pub fn decimal(raw: &str, max_len: usize) -> String {
    let mut seen_separator = false;
    raw.chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '.' | ',' if !seen_separator => {
                seen_separator = true;
                Some('.')
            }
            _ => None,
        })
        .take(max_len)
        .collect()
}

/// `MM/YY` mask; the slash is inserted once a third digit is typed.
pub fn expiration(raw: &str) -> String {
    let digits = digits_only(raw, 4);
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Submission-time check of an `MM/YY` value.
pub fn is_valid_expiration(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };

    let month_ok = matches!(month.parse::<u8>(), Ok(1..=12)) && month.len() == 2;
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}
