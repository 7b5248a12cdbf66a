/// Seconds with one decimal, the way the timer is shown while playing
pub fn format_secs(secs: f64) -> String {
    format!("{secs:.1}s")
}

/// A backend statistic; zero means "no data yet"
pub fn format_stat(secs: f64) -> String {
    if secs > 0.0 {
        format!("{secs:.2}s")
    } else {
        "-".to_string()
    }
}

pub fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
