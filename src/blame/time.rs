//! Relative dates ("3 days ago") with fixed-size buckets, not calendar aware.

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;
const MONTH: i64 = 2_592_000;
const YEAR: i64 = 31_536_000;

pub fn relative_date(timestamp: i64, now: i64) -> String {
    let diff = now - timestamp;

    if diff < MINUTE {
        return "just now".to_string();
    }

    let (value, unit) = if diff < HOUR {
        (diff / MINUTE, "minute")
    } else if diff < DAY {
        (diff / HOUR, "hour")
    } else if diff < WEEK {
        (diff / DAY, "day")
    } else if diff < MONTH {
        (diff / WEEK, "week")
    } else if diff < YEAR {
        (diff / MONTH, "month")
    } else {
        (diff / YEAR, "year")
    };

    format!("{} {}{} ago", value, unit, if value == 1 { "" } else { "s" })
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
