pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_year(start_year: i32, month_index: u32) -> (u32, i32) {
    let month_in_year = month_index % 12;
    let year = start_year + (month_index / 12) as i32;
    (month_in_year, year)
}

pub fn month_label(start_year: i32, month_index: u32) -> String {
    let (month_in_year, year) = month_year(start_year, month_index);
    format!("{} {}", MONTH_NAMES[month_in_year as usize], year)
}

pub fn format_lifespan(first_month: Option<u32>, last_month: Option<u32>) -> String {
    match (first_month, last_month) {
        (Some(first), Some(last)) if last >= first => {
            format!("{:.1} years", (last - first) as f64 / 12.0)
        }
        _ => "–".to_owned(),
    }
}

pub fn short_title(title: &str) -> &str {
    let trimmed = title.trim();
    let trimmed = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    trimmed.strip_prefix("www.").unwrap_or(trimmed)
}
