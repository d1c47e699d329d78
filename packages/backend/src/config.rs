use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use wink_cursor_core::{CursorConfig, WinkConfig};

const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 300;
const DEFAULT_SESSION_CLEANUP_SCHEDULE: &str = "*/30 * * * * *";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Record pointer actions to the log only.
    Log,
    /// Move the real cursor (requires the `os-pointer` feature).
    Os,
}

impl FromStr for PointerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "log" | "none" | "dry-run" => Ok(Self::Log),
            "os" | "system" => Ok(Self::Os),
            other => Err(format!("unknown pointer device: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: String,
    pub pointer: PointerKind,
    /// Screen size override; `None` asks the pointer device.
    pub screen_size: Option<(u32, u32)>,
    pub wink: WinkConfig,
    pub cursor: CursorConfig,
    pub session_idle_timeout: Duration,
    pub session_cleanup_schedule: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).and_then(|value| value.trim().parse::<f64>().ok());
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
        };

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = lookup("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "./logs".to_string());

        let pointer = lookup("POINTER_DEVICE")
            .and_then(|value| value.parse::<PointerKind>().ok())
            .unwrap_or(PointerKind::Log);

        let screen_width = lookup("SCREEN_WIDTH").and_then(|v| v.parse::<u32>().ok());
        let screen_height = lookup("SCREEN_HEIGHT").and_then(|v| v.parse::<u32>().ok());
        let screen_size = match (screen_width, screen_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        };

        let wink_defaults = WinkConfig::default();
        let wink = WinkConfig {
            blink_threshold: parse("BLINK_THRESHOLD").unwrap_or(wink_defaults.blink_threshold),
            min_wink_duration: parse("MIN_WINK_DURATION_SECS").unwrap_or(wink_defaults.min_wink_duration),
            wink_cooldown: parse("WINK_COOLDOWN_SECS").unwrap_or(wink_defaults.wink_cooldown),
        };

        let cursor_defaults = CursorConfig::default();
        let (width, height) = screen_size.unwrap_or((cursor_defaults.screen_width, cursor_defaults.screen_height));
        let cursor = CursorConfig {
            screen_width: width,
            screen_height: height,
            click_cooldown: parse("CLICK_COOLDOWN_SECS").unwrap_or(cursor_defaults.click_cooldown),
            smoothing: parse("CURSOR_SMOOTHING").unwrap_or(cursor_defaults.smoothing),
            sensitivity: parse("CURSOR_SENSITIVITY").unwrap_or(cursor_defaults.sensitivity),
        }
        .sanitized();

        let session_idle_timeout = Duration::from_secs(
            lookup("SESSION_IDLE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
        );

        let session_cleanup_schedule = lookup("SESSION_CLEANUP_SCHEDULE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_CLEANUP_SCHEDULE.to_string());

        Self {
            host,
            port,
            log_level,
            file_logs: flag("ENABLE_FILE_LOGS"),
            log_dir,
            pointer,
            screen_size,
            wink,
            cursor,
            session_idle_timeout,
            session_cleanup_schedule,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
