const COUNTRY_CODE: &str = "233";

/// Turn a customer phone number into the international form the messaging
/// provider expects: a leading `0` becomes the country code and the result is
/// always `+` prefixed. Nothing else is checked or rewritten.
pub fn to_international(phone: &str) -> String {
    let number = match phone.strip_prefix('0') {
        Some(rest) => format!("{}{}", COUNTRY_CODE, rest),
        None => phone.to_string(),
    };

    if number.starts_with('+') {
        number
    } else {
        format!("+{}", number)
    }
}
