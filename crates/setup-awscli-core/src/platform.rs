//! Host platform descriptor.
//!
//! AWS CLI v2 ships one Linux archive per CPU architecture. The vendor names
//! architectures after the kernel (`x86_64`, `aarch64`), while the hosted tool
//! cache keys directories by the runner's own names (`x64`, `arm64`), so an
//! [`Arch`] carries both labels.

use std::fmt;

use crate::SetupError;

/// Supported operating system families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux (glibc based runners)
    Linux,
}

impl Os {
    /// Parse an OS name as reported by the host.
    pub fn parse(s: &str) -> Result<Self, SetupError> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            _ => Err(SetupError::UnsupportedPlatform(s.to_string())),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
        }
    }
}

/// Supported CPU architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit x86
    X64,
    /// 64-bit ARM
    Arm64,
}

impl Arch {
    /// Parse an architecture name. Accepts both runner (`x64`, `arm64`) and
    /// Rust/kernel (`x86_64`, `aarch64`) spellings.
    pub fn parse(s: &str) -> Result<Self, SetupError> {
        match s.to_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Self::X64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(SetupError::UnsupportedArch(s.to_string())),
        }
    }

    /// Label used in the vendor's archive file names.
    pub fn vendor_label(&self) -> &'static str {
        match self {
            Self::X64 => "x86_64",
            Self::Arm64 => "aarch64",
        }
    }

    /// Label used for the tool-cache directory.
    pub fn cache_label(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_label())
    }
}

/// An (OS, architecture) pair known to have a published archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Validate a host-reported pair. The OS is checked first.
    pub fn parse(os: &str, arch: &str) -> Result<Self, SetupError> {
        let os = Os::parse(os)?;
        let arch = Arch::parse(arch)?;
        Ok(Self { os, arch })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.vendor_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arch_labels() {
        let x64 = Arch::parse("x64").unwrap();
        assert_eq!(x64.vendor_label(), "x86_64");
        assert_eq!(x64.cache_label(), "x64");

        let arm = Arch::parse("arm64").unwrap();
        assert_eq!(arm.vendor_label(), "aarch64");
        assert_eq!(arm.cache_label(), "arm64");
    }

    #[test]
    fn test_rust_arch_names_accepted() {
        assert_eq!(Arch::parse("x86_64").unwrap(), Arch::X64);
        assert_eq!(Arch::parse("aarch64").unwrap(), Arch::Arm64);
    }

    #[test]
    fn test_unsupported_os() {
        let err = Platform::parse("darwin", "x64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedPlatform(ref os) if os == "darwin"));
        assert_eq!(err.to_string(), "Unsupported platform: darwin");
    }

    #[test]
    fn test_unsupported_arch() {
        let err = Platform::parse("linux", "ia32").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedArch(ref a) if a == "ia32"));
    }

    #[test]
    fn test_os_checked_before_arch() {
        let err = Platform::parse("windows", "s390x").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedPlatform(_)));
    }

    #[test]
    fn test_display() {
        let p = Platform::parse("linux", "arm64").unwrap();
        assert_eq!(p.to_string(), "linux-aarch64");
    }
}
