use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Format ISO datetime string to `YYYY-MM-DD HH:MM`
///
/// # Examples
/// ```
/// use dishdesk_core::utils::text::format_datetime;
/// assert_eq!(format_datetime("2024-03-01T18:42:10.000Z"), "2024-03-01 18:42");
/// assert_eq!(format_datetime("2024-03-01"), "2024-03-01");
/// ```
pub fn format_datetime(datetime: &str) -> String {
    match datetime.split_once('T') {
        Some((date, time)) => {
            let hhmm: String = time.chars().take(5).collect();
            format!("{} {}", date, hhmm)
        }
        None => datetime.to_string(),
    }
}

/// Format an amount with two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Truncate to a display width, ending with `...` when cut.
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let ellipsis_width = ELLIPSIS.width();
    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}
