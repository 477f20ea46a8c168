use std::time::{SystemTime, UNIX_EPOCH};

/// Current UNIX time in seconds. Cache expiry is absolute wall-clock time
/// because `time_to_die` travels between nodes.
pub fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
