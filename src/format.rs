/// Format a price as `$1,234.56`, negatives as `-$1,234.56`.
pub fn format_price(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    format!("{sign}${}.{frac}", group_thousands(whole))
}

/// Plain number with two decimals, used in table cells.
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
