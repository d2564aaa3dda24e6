//! Parsing and shaping of MySQL data source names.
//!
//! The accepted format is the one used by the Go MySQL driver:
//!
//! ```text
//! [username[:password]@][protocol[(address)]]/dbname[?param1=value1&paramN=valueN]
//! ```
//!
//! Durations in parameters use Go syntax (`5s`, `250ms`, `1m30s`).

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Connect timeout injected when the DSN does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_PORT: u16 = 3306;
const DEFAULT_TCP_ADDR: &str = "127.0.0.1:3306";
const DEFAULT_UNIX_ADDR: &str = "/tmp/mysql.sock";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DsnError {
    #[error("invalid DSN: missing the slash separating the database name")]
    MissingSlash,

    #[error("invalid DSN: network address not terminated (missing closing brace)")]
    UnterminatedAddress,

    #[error("invalid DSN: did you forget to escape a param value?")]
    UnescapedParam,

    #[error("default addr for network '{0}' unknown")]
    UnknownNetwork(String),

    #[error("invalid value '{value}' for DSN parameter '{key}': {reason}")]
    InvalidParam {
        key: String,
        value: String,
        reason: String,
    },
}

/// Structured connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    pub user: String,
    pub password: String,
    pub net: String,
    pub addr: String,
    pub db_name: String,
    pub timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    /// Parameters without special handling, kept verbatim.
    pub params: BTreeMap<String, String>,
}

impl Dsn {
    /// Parse a DSN and fill in the default network and address.
    pub fn parse(dsn: &str) -> Result<Self, DsnError> {
        let mut parsed = Dsn {
            user: String::new(),
            password: String::new(),
            net: String::new(),
            addr: String::new(),
            db_name: String::new(),
            timeout: None,
            read_timeout: None,
            write_timeout: None,
            params: BTreeMap::new(),
        };

        let Some(slash) = dsn.rfind('/') else {
            if dsn.is_empty() {
                parsed.normalize()?;
                return Ok(parsed);
            }
            return Err(DsnError::MissingSlash);
        };

        let (head, tail) = (&dsn[..slash], &dsn[slash + 1..]);

        // [username[:password]@][protocol[(address)]]
        let endpoint = match head.rfind('@') {
            Some(at) => {
                let credentials = &head[..at];
                match credentials.split_once(':') {
                    Some((user, password)) => {
                        parsed.user = user.to_string();
                        parsed.password = password.to_string();
                    }
                    None => parsed.user = credentials.to_string(),
                }
                &head[at + 1..]
            }
            None => head,
        };

        match endpoint.find('(') {
            Some(open) => {
                let Some(addr) = endpoint[open + 1..].strip_suffix(')') else {
                    if endpoint[open + 1..].contains(')') {
                        return Err(DsnError::UnescapedParam);
                    }
                    return Err(DsnError::UnterminatedAddress);
                };
                parsed.net = endpoint[..open].to_string();
                parsed.addr = addr.to_string();
            }
            None => parsed.net = endpoint.to_string(),
        }

        // dbname[?param1=value1&...]
        match tail.split_once('?') {
            Some((db_name, params)) => {
                parsed.db_name = db_name.to_string();
                parsed.parse_params(params)?;
            }
            None => parsed.db_name = tail.to_string(),
        }

        parsed.normalize()?;
        Ok(parsed)
    }

    fn parse_params(&mut self, params: &str) -> Result<(), DsnError> {
        for pair in params.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "timeout" => self.timeout = Some(parse_param_duration(key, value)?),
                "readTimeout" => self.read_timeout = Some(parse_param_duration(key, value)?),
                "writeTimeout" => self.write_timeout = Some(parse_param_duration(key, value)?),
                _ => {
                    self.params.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(())
    }

    fn normalize(&mut self) -> Result<(), DsnError> {
        if self.net.is_empty() {
            self.net = "tcp".to_string();
        }

        if self.addr.is_empty() {
            self.addr = match self.net.as_str() {
                "tcp" => DEFAULT_TCP_ADDR.to_string(),
                "unix" => DEFAULT_UNIX_ADDR.to_string(),
                other => return Err(DsnError::UnknownNetwork(other.to_string())),
            };
        } else if self.net == "tcp" {
            self.addr = ensure_port(&self.addr);
        }

        Ok(())
    }

    /// `net(addr)` without credentials, for logs and error messages.
    pub fn endpoint(&self) -> String {
        format!("{}({})", self.net, self.addr)
    }

    /// Split a tcp address into host and port.
    pub fn host_port(&self) -> (String, u16) {
        let (host, port) = match self.addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => match port.parse::<u16>() {
                Ok(port) => (host, port),
                Err(_) => (self.addr.as_str(), DEFAULT_PORT),
            },
            _ => (self.addr.as_str(), DEFAULT_PORT),
        };
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        (host.to_string(), port)
    }

    /// Set the connect timeout to [`DEFAULT_TIMEOUT`] when none is given.
    ///
    /// An explicit zero counts as unset.
    pub fn with_default_timeout(mut self) -> Self {
        if self.timeout.is_none_or(|t| t.is_zero()) {
            self.timeout = Some(DEFAULT_TIMEOUT);
        }
        self
    }
}

impl FromStr for Dsn {
    type Err = DsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dsn::parse(s)
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.user.is_empty() || !self.password.is_empty() {
            f.write_str(&self.user)?;
            if !self.password.is_empty() {
                write!(f, ":{}", self.password)?;
            }
            f.write_char('@')?;
        }

        if !self.net.is_empty() {
            f.write_str(&self.net)?;
            if !self.addr.is_empty() {
                write!(f, "({})", self.addr)?;
            }
        }

        write!(f, "/{}", self.db_name)?;

        let mut params: BTreeMap<&str, String> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        if let Some(t) = self.timeout {
            params.insert("timeout", format_duration(t));
        }
        if let Some(t) = self.read_timeout {
            params.insert("readTimeout", format_duration(t));
        }
        if let Some(t) = self.write_timeout {
            params.insert("writeTimeout", format_duration(t));
        }

        for (i, (key, value)) in params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Parse `dsn`, inject the default timeout if needed and serialize it back.
pub fn shape_dsn(dsn: &str) -> Result<String, DsnError> {
    Ok(Dsn::parse(dsn)?.with_default_timeout().to_string())
}

fn ensure_port(addr: &str) -> String {
    if let Some(rest) = addr.strip_prefix('[') {
        if rest.contains("]:") {
            return addr.to_string();
        }
        return format!("{}:{}", addr, DEFAULT_PORT);
    }
    match addr.matches(':').count() {
        0 => format!("{}:{}", addr, DEFAULT_PORT),
        1 => addr.to_string(),
        _ => format!("[{}]:{}", addr, DEFAULT_PORT),
    }
}

fn parse_param_duration(key: &str, value: &str) -> Result<Duration, DsnError> {
    parse_duration(value).map_err(|reason| DsnError::InvalidParam {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    })
}

const NANOS_PER_UNIT: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

/// Parse a Go duration string such as `1m30s` or `1.5s`.
///
/// Negative durations are rejected; a bare `0` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.strip_prefix('+').unwrap_or(input);
    if s.starts_with('-') {
        return Err("negative duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, after) = rest.split_at(number_len);
        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && frac.is_empty()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid duration '{}'", input));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, next) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err(format!("missing unit in duration '{}'", input));
        }
        let Some(&(_, scale)) = NANOS_PER_UNIT.iter().find(|(name, _)| *name == unit) else {
            return Err(format!("unknown unit '{}' in duration '{}'", unit, input));
        };

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| format!("invalid duration '{}'", input))?
        };
        let mut frac_nanos: u128 = 0;
        let mut divisor: u128 = 1;
        for digit in frac.bytes() {
            // Digits beyond nanosecond precision contribute nothing.
            if divisor >= 1_000_000_000_000_000_000 {
                break;
            }
            frac_nanos = frac_nanos * 10 + u128::from(digit - b'0');
            divisor *= 10;
        }

        total = whole
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac_nanos * scale / divisor))
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| format!("duration '{}' out of range", input))?;
        rest = next;
    }

    let secs = u64::try_from(total / 1_000_000_000)
        .map_err(|_| format!("duration '{}' out of range", input))?;
    Ok(Duration::new(secs, (total % 1_000_000_000) as u32))
}

/// Render a duration the way Go's `time.Duration` prints itself.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 1_000_000, 6));
    }

    let secs = d.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let sub_minute = u128::from(seconds) * 1_000_000_000 + u128::from(d.subsec_nanos());
    let _ = write!(out, "{}s", decimal(sub_minute, 1_000_000_000, 9));
    out
}

fn decimal(value: u128, unit: u128, digits: usize) -> String {
    let (whole, frac) = (value / unit, value % unit);
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
