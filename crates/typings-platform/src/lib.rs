//! Mobile platforms typings can be generated for, and host support checks.

use std::fmt;
use std::str::FromStr;

/// A platform whose native APIs get TypeScript declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// All supported platforms, in the order they are listed to users.
    pub const ALL: [Platform; 2] = [Platform::Android, Platform::Ios];

    /// Lower-case name used on the command line and in output paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    /// Check that typings for this platform can be produced on the current host.
    ///
    /// iOS declarations come out of an Xcode build, so they need macOS.
    ///
    /// # Errors
    /// Returns `PlatformError::UnsupportedHost` when the host cannot build the platform.
    pub fn check_host(self) -> Result<(), PlatformError> {
        check_host_os(self, std::env::consts::OS)
    }
}

fn check_host_os(platform: Platform, os: &str) -> Result<(), PlatformError> {
    match (platform, os) {
        (Platform::Android, _) | (Platform::Ios, "macos") => Ok(()),
        (Platform::Ios, other) => Err(PlatformError::UnsupportedHost {
            platform: platform.as_str().to_owned(),
            os: other.to_owned(),
        }),
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            _ => Err(PlatformError::Unknown {
                name: s.to_owned(),
                available: Platform::ALL
                    .into_iter()
                    .map(Platform::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("unknown platform \"{name}\" — expected one of: {available}")]
    Unknown { name: String, available: String },

    #[error("{platform} typings cannot be generated on {os} — a macOS host is required")]
    UnsupportedHost { platform: String, os: String },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_known_platforms() {
        assert_eq!("android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
    }

    #[test]
    fn parse_unknown_lists_available() {
        let err = "windows".parse::<Platform>().unwrap_err().to_string();
        assert!(err.contains("windows"), "error was: {err}");
        assert!(err.contains("android, ios"), "error was: {err}");
    }

    #[test]
    fn display_round_trips() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn android_builds_anywhere() {
        assert!(check_host_os(Platform::Android, "linux").is_ok());
        assert!(check_host_os(Platform::Android, "windows").is_ok());
    }

    #[test]
    fn ios_needs_macos() {
        assert!(check_host_os(Platform::Ios, "macos").is_ok());
        let err = check_host_os(Platform::Ios, "linux").unwrap_err().to_string();
        assert!(err.contains("macOS host is required"), "error was: {err}");
    }

    proptest! {
        #[test]
        fn parse_never_panics(name in "\\PC{0,20}") {
            let _ = name.parse::<Platform>();
        }
    }
}
