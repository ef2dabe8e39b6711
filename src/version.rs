// Build information. Release builds set UPL_GIT_COMMIT and UPL_BUILD_DATE
// in the environment of `cargo build`; local builds fall back to "unknown".

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: &'static str,
    pub platform: String,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        commit: option_env!("UPL_GIT_COMMIT").unwrap_or("unknown"),
        date: option_env!("UPL_BUILD_DATE").unwrap_or("unknown"),
        platform: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
    }
}

impl BuildInfo {
    pub fn short(&self) -> String {
        format!("upl v{}", self.version)
    }

    /// Only builds stamped with a date count as releases.
    pub fn is_release(&self) -> bool {
        self.date != "unknown"
    }
}
