//! Time helpers. All timestamps in the application are Unix milliseconds in JST.

use chrono::{DateTime, FixedOffset, Offset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    // JST is UTC+9
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as an RFC 3339 string in JST.
///
/// Out of range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(&jst())
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_jst_rfc3339() {
        // テスト項目: Unix タイムスタンプが JST の RFC 3339 文字列に変換される
        // given (前提条件):
        let timestamp = 0i64;

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, "1970-01-01T09:00:00+09:00");
    }

    #[test]
    fn test_get_jst_timestamp_is_recent() {
        // テスト項目: 現在時刻のタイムスタンプが取得できる
        // when (操作):
        let timestamp = get_jst_timestamp();

        // then (期待する結果): 2024-01-01 以降の値
        assert!(timestamp > 1_704_067_200_000);
    }
}
