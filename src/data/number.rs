use super::model::InvestmentValue;

// ---------------------------------------------------------------------------
// Human-number parsing
// ---------------------------------------------------------------------------

/// Parse amounts the way people type them: `"1.500"`, `"2,3k"`, `"1,5M"`,
/// `"R$ 500"`. Returns `None` when there are no digits at all.
///
/// `.` is read as a thousands separator and `,` as the decimal mark. The one
/// exception is a single `.` directly inside a suffixed amount with no comma
/// (`"1.5M"`), which is read as a decimal point unless exactly three digits
/// follow it (`"1.500k"` is still 1 500 000).
pub fn parse_human_number(input: &str) -> Option<i64> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if !compact.contains(',')
        && compact.matches('.').count() == 1
        && !dot_groups_thousands(&compact)
    {
        if let Some((value, Some(suffix))) = scan_amount(&compact) {
            return Some(scale(value, Some(suffix)));
        }
    }

    let cleaned = compact.replace('.', "").replace(',', ".");
    match scan_amount(&cleaned) {
        Some((value, suffix)) => Some(scale(value, suffix)),
        None => {
            let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
    }
}

/// Whether the only `.` is followed by exactly three digits.
fn dot_groups_thousands(s: &str) -> bool {
    s.split_once('.')
        .map(|(_, rest)| rest.chars().take_while(char::is_ascii_digit).count() == 3)
        .unwrap_or(false)
}

/// Find the first `digits(.digits)?` token and the magnitude letter right
/// after it, if any.
fn scan_amount(s: &str) -> Option<(f64, Option<char>)> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let value: f64 = s[start..end].parse().ok()?;
    let suffix = s[end..]
        .chars()
        .next()
        .filter(|c| matches!(c, 'k' | 'K' | 'm' | 'M' | 'b' | 'B'));
    Some((value, suffix))
}

fn scale(value: f64, suffix: Option<char>) -> i64 {
    let multiplier = match suffix.map(|c| c.to_ascii_uppercase()) {
        Some('K') => 1_000.0,
        Some('M') => 1_000_000.0,
        Some('B') => 1_000_000_000.0,
        _ => 1.0,
    };
    (value * multiplier).round() as i64
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Brazilian-real currency with no decimals: `R$ 1.200.000`.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-R$ {grouped}")
    } else {
        format!("R$ {grouped}")
    }
}

/// Text shown for an investment amount on cards and in comparisons.
///
/// Strings that already carry a currency marker are shown as-is.
pub fn format_investment(value: &InvestmentValue) -> String {
    match value {
        InvestmentValue::Number(n) if *n == 0.0 => "—".to_string(),
        InvestmentValue::Number(_) => match value.amount() {
            Some(amount) => format_currency(amount),
            None => value.to_string(),
        },
        InvestmentValue::Text(_) if value.is_unknown() => "—".to_string(),
        InvestmentValue::Text(s) => {
            if s.contains(['$', '€', '£', 'R']) {
                return s.clone();
            }
            match parse_human_number(s) {
                Some(amount) => format_currency(amount),
                None => s.clone(),
            }
        }
    }
}
