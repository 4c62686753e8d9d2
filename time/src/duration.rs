use chrono::TimeDelta;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MIN: u64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MIN;

/// 有符号耗时的紧凑文本：`0s`、`420ns`、`850µs`、`150.5ms`、`1.5s`、`1m30s`、`2h0m5s`、`-2s`。
///
/// 纳秒数超出 i64 时退化为整秒
pub fn format_duration(d: TimeDelta) -> String {
    let Some(nanos) = d.num_nanoseconds() else {
        return format!("{}s", d.num_seconds());
    };
    if nanos == 0 {
        return "0s".to_string();
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let n = nanos.unsigned_abs();

    let body = if n < NANOS_PER_MICRO {
        format!("{}ns", n)
    } else if n < NANOS_PER_MILLI {
        format!("{}µs", fixed(n, NANOS_PER_MICRO, 3))
    } else if n < NANOS_PER_SEC {
        format!("{}ms", fixed(n, NANOS_PER_MILLI, 6))
    } else {
        let hours = n / NANOS_PER_HOUR;
        let minutes = (n % NANOS_PER_HOUR) / NANOS_PER_MIN;
        let seconds = fixed(n % NANOS_PER_MIN, NANOS_PER_SEC, 9);
        if hours > 0 {
            format!("{}h{}m{}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m{}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    };
    format!("{}{}", sign, body)
}

// value / unit，小数部分去掉末尾的0
fn fixed(value: u64, unit: u64, digits: usize) -> String {
    let int = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return int.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits);
    format!("{}.{}", int, frac.trim_end_matches('0'))
}
