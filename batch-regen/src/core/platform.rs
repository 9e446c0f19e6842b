//! Host platform identity and the skip gate.

use std::fmt;
use std::str::FromStr;

/// Operating system family, spelled the way `std::env::consts::OS` spells it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other(String),
}

impl Platform {
    /// Platform the binary is running on.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_os(s.trim()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when `host` appears in `skip_on`.
pub fn is_skipped(host: &Platform, skip_on: &[Platform]) -> bool {
    skip_on.iter().any(|p| p == host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!(" macos ".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!(
            "FreeBSD".parse::<Platform>().unwrap(),
            Platform::Other("freebsd".to_string())
        );
    }

    #[test]
    fn current_matches_std_consts() {
        assert_eq!(Platform::current().as_str(), std::env::consts::OS);
    }

    #[test]
    fn skip_only_listed_platforms() {
        let skip_on = vec![Platform::Windows];
        assert!(is_skipped(&Platform::Windows, &skip_on));
        assert!(!is_skipped(&Platform::Linux, &skip_on));
        assert!(!is_skipped(&Platform::Windows, &[]));
    }
}
