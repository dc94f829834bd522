/// Get the current time in milliseconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Get the current time in milliseconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn timestamp_ms() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.timing().navigation_start() + perf.now())
        .unwrap_or(0.0) as u64
}

/// Split an epoch-millisecond timestamp into a UTC (year, month, day) triple.
///
/// Month and day are 1-based. Uses the civil-from-days conversion over the epoch
/// day count, valid for any date this application will ever stamp.
pub fn utc_date(timestamp_ms: u64) -> (i64, u32, u32) {
    let days = (timestamp_ms / 86_400_000) as i64;
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if month <= 2 { year + 1 } else { year }, month, day)
}
