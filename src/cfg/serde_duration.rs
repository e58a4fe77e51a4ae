use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

// 重新导出serde_with
pub use serde_with::{serde_as, DeserializeAs, SerializeAs};

/// Duration的人性化格式化器
///
/// 支持格式: "3s", "100ms", "2m", "1h", "1h30m45s", "250us"
pub struct HumanDur;

impl SerializeAs<Duration> for HumanDur {
    fn serialize_as<S>(source: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*source))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumanDur {
    fn deserialize_as<D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// 解析时间字符串: "1m30s" -> Duration
///
/// 由若干 `<数字><单位>` 片段组成，数字允许小数。
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(anyhow!("空字符串"));
    }

    let mut total = Duration::ZERO;
    let mut rest = s.as_str();
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(anyhow!("期望数字: {}", s));
        }
        let (num_str, after_num) = rest.split_at(num_len);
        let value: f64 = num_str
            .parse()
            .map_err(|_| anyhow!("无效数字: {}", num_str))?;

        let unit_len = after_num
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_num.len());
        if unit_len == 0 {
            return Err(anyhow!("缺少时间单位: {}", s));
        }
        let (unit, after_unit) = after_num.split_at(unit_len);

        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            "d" => 86400.0 * 1e9,
            _ => return Err(anyhow!("不支持的时间单位: {}", unit)),
        };
        total += Duration::from_nanos((value * nanos_per_unit).round() as u64);
        rest = after_unit;
    }

    Ok(total)
}

/// Duration格式化为字符串: Duration -> "1h30m45s"
///
/// 不足一秒的部分按最大的整除单位输出（ms / us / ns）。
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }

    let mut out = String::new();
    let mut secs = duration.as_secs();
    for (unit, size) in [("d", 86400), ("h", 3600), ("m", 60)] {
        if secs >= size {
            out.push_str(&format!("{}{}", secs / size, unit));
            secs %= size;
        }
    }

    let nanos = duration.subsec_nanos() as u64;
    if nanos == 0 {
        if secs > 0 {
            out.push_str(&format!("{}s", secs));
        }
    } else if nanos % 1_000_000 == 0 {
        out.push_str(&format!("{}ms", secs * 1000 + nanos / 1_000_000));
    } else if nanos % 1_000 == 0 {
        out.push_str(&format!("{}us", secs * 1_000_000 + nanos / 1_000));
    } else {
        out.push_str(&format!("{}ns", secs * 1_000_000_000 + nanos));
    }

    out
}
