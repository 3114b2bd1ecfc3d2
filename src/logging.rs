use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{SkuBenchError, SkuBenchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Off => "OFF",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    pub fn parse_level(s: &str) -> Option<LogLevel> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

/// Default level plus `target=level` overrides, longest matching prefix wins.
#[derive(Debug, Clone, PartialEq)]
pub struct LogFilter {
    pub default: LogLevel,
    pub rules: Vec<(String, LogLevel)>,
}

impl LogFilter {
    pub fn level_for_target(&self, target: &str) -> LogLevel {
        let mut best: Option<(usize, LogLevel)> = None;
        for (rule_target, level) in &self.rules {
            if rule_target.is_empty() {
                continue;
            }
            if target.starts_with(rule_target) {
                let len = rule_target.len();
                if best.map(|(best_len, _)| len > best_len).unwrap_or(true) {
                    best = Some((len, *level));
                }
            }
        }
        best.map(|(_, level)| level).unwrap_or(self.default)
    }
}

static LOG_FILTER: OnceLock<Mutex<LogFilter>> = OnceLock::new();

fn filter_state() -> &'static Mutex<LogFilter> {
    LOG_FILTER.get_or_init(|| {
        Mutex::new(LogFilter {
            default: LogLevel::Info,
            rules: Vec::new(),
        })
    })
}

/// Parse a filter spec such as `info,skubench::bench=debug`.
pub fn parse_filter(spec: &str) -> SkuBenchResult<LogFilter> {
    let mut default = None;
    let mut rules = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some((target, level_str)) = part.split_once('=') {
            let level = LogLevel::parse_level(level_str.trim()).ok_or_else(|| {
                SkuBenchError::LogFilter(format!("unknown log level '{}'", level_str.trim()))
            })?;
            rules.push((target.trim().to_string(), level));
        } else {
            let level = LogLevel::parse_level(part)
                .ok_or_else(|| SkuBenchError::LogFilter(format!("unknown log level '{}'", part)))?;
            default = Some(level);
        }
    }

    Ok(LogFilter {
        default: default.unwrap_or(LogLevel::Info),
        rules,
    })
}

pub fn set_filter(spec: &str) -> SkuBenchResult<()> {
    let filter = parse_filter(spec)?;
    let mut guard = filter_state()
        .lock()
        .map_err(|_| SkuBenchError::LogFilter("log filter lock poisoned".to_string()))?;
    *guard = filter;
    Ok(())
}

pub fn log_enabled(level: LogLevel, target: &str) -> bool {
    if level == LogLevel::Off {
        return false;
    }
    let filter = filter_state().lock().unwrap_or_else(|e| e.into_inner());
    let effective = filter.level_for_target(target);
    (level as u8) <= (effective as u8)
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub target: String,
    pub fields: Vec<(String, JsonValue)>,
}

#[derive(Debug)]
pub enum LogSink {
    Stderr,
    /// Truncated when first written to.
    File {
        path: String,
        file: Option<std::fs::File>,
    },
}

#[derive(Debug)]
pub struct LoggerCore {
    pub format: LogFormat,
    pub timestamps: bool,
    pub sinks: Vec<LogSink>,
}

impl LoggerCore {
    pub fn new() -> Self {
        LoggerCore {
            format: LogFormat::Text,
            timestamps: true,
            sinks: vec![LogSink::Stderr],
        }
    }

    pub fn log(&mut self, record: &LogRecord) {
        let formatted = self.format_record(record);
        for sink in &mut self.sinks {
            match sink {
                LogSink::Stderr => {
                    eprintln!("{}", formatted);
                }
                LogSink::File { path, file } => {
                    if file.is_none() {
                        match OpenOptions::new()
                            .create(true)
                            .write(true)
                            .truncate(true)
                            .open(path.as_str())
                        {
                            Ok(handle) => {
                                *file = Some(handle);
                            }
                            Err(err) => {
                                eprintln!("Warning: cannot open log file '{}': {}", path, err);
                            }
                        }
                    }
                    if let Some(handle) = file {
                        let _ = writeln!(handle, "{}", formatted);
                    }
                }
            }
        }
    }

    pub fn format_record(&self, record: &LogRecord) -> String {
        match self.format {
            LogFormat::Json => self.format_json(record),
            LogFormat::Compact => self.format_compact(record),
            LogFormat::Text => self.format_text(record),
        }
    }

    fn format_text(&self, record: &LogRecord) -> String {
        let mut parts = Vec::new();
        parts.push(format!("[{:5}]", record.level.name()));
        if self.timestamps {
            parts.push(timestamp_string());
        }
        if !record.target.is_empty() {
            parts.push(record.target.clone());
        }

        let mut msg = record.message.clone();
        if !record.fields.is_empty() {
            msg = format!("{} {}", msg, format_fields(&record.fields));
        }

        format!("{} | {}", parts.join(" "), msg)
    }

    fn format_compact(&self, record: &LogRecord) -> String {
        let mut msg = record.message.clone();
        if !record.fields.is_empty() {
            msg = format!("{} {}", msg, format_fields(&record.fields));
        }
        format!("[{}] {}", record.level.name(), msg)
    }

    fn format_json(&self, record: &LogRecord) -> String {
        let mut obj = Map::new();
        if self.timestamps {
            obj.insert("ts".to_string(), JsonValue::String(timestamp_string()));
        }
        obj.insert(
            "level".to_string(),
            JsonValue::String(record.level.name().to_string()),
        );
        obj.insert(
            "target".to_string(),
            JsonValue::String(record.target.clone()),
        );
        obj.insert("msg".to_string(), JsonValue::String(record.message.clone()));

        let mut fields = Map::new();
        for (k, v) in &record.fields {
            fields.insert(k.clone(), v.clone());
        }
        obj.insert("fields".to_string(), JsonValue::Object(fields));

        JsonValue::Object(obj).to_string()
    }
}

impl Default for LoggerCore {
    fn default() -> Self {
        Self::new()
    }
}

fn format_fields(fields: &[(String, JsonValue)]) -> String {
    fields
        .iter()
        .map(|(k, v)| match v {
            JsonValue::String(s) => format!("{}={}", k, s),
            other => format!("{}={}", k, other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static LOGGER: OnceLock<Mutex<LoggerCore>> = OnceLock::new();

fn logger() -> &'static Mutex<LoggerCore> {
    LOGGER.get_or_init(|| Mutex::new(LoggerCore::new()))
}

/// Replace the process-wide output format and sinks.
pub fn configure(format: LogFormat, sinks: Vec<LogSink>) {
    let mut core = logger().lock().unwrap_or_else(|e| e.into_inner());
    core.format = format;
    core.sinks = sinks;
}

pub fn log(level: LogLevel, target: &str, message: &str, fields: Vec<(String, JsonValue)>) {
    if !log_enabled(level, target) {
        return;
    }
    let record = LogRecord {
        level,
        message: message.to_string(),
        target: target.to_string(),
        fields,
    };
    let mut core = logger().lock().unwrap_or_else(|e| e.into_inner());
    core.log(&record);
}

pub fn error(target: &str, message: &str, fields: Vec<(String, JsonValue)>) {
    log(LogLevel::Error, target, message, fields);
}

pub fn warn(target: &str, message: &str, fields: Vec<(String, JsonValue)>) {
    log(LogLevel::Warn, target, message, fields);
}

pub fn info(target: &str, message: &str, fields: Vec<(String, JsonValue)>) {
    log(LogLevel::Info, target, message, fields);
}

pub fn debug(target: &str, message: &str, fields: Vec<(String, JsonValue)>) {
    log(LogLevel::Debug, target, message, fields);
}

/// Build a field list entry from anything `serde_json` can represent.
pub fn field(key: &str, value: impl Into<JsonValue>) -> (String, JsonValue) {
    (key.to_string(), value.into())
}

/// Round milliseconds for log fields so they stay readable.
pub fn ms_field(key: &str, ms: f64) -> (String, JsonValue) {
    (key.to_string(), json!((ms * 1000.0).round() / 1000.0))
}

pub fn timestamp_string() -> String {
    format!("{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
}
