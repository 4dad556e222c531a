/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from; set `GIT_COMMIT` at build time.
pub const GIT_COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "",
};

/// Pre-release marker such as `dev`; empty for final releases.
pub const VERSION_PRERELEASE: &str = match option_env!("VERSION_PRERELEASE") {
    Some(pre) => pre,
    None => "",
};

pub fn human_readable() -> String {
    format_version(VERSION, VERSION_PRERELEASE, GIT_COMMIT)
}

fn format_version(version: &str, prerelease: &str, commit: &str) -> String {
    let mut out = format!("Version: {version}");
    if !prerelease.is_empty() {
        out.push('-');
        out.push_str(prerelease);
    }
    out.push_str(" Git Commit: ");
    out.push_str(commit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_prerelease() {
        let hr = format_version("0.1.0", "", "abc123+CHANGES");
        assert_eq!(hr, "Version: 0.1.0 Git Commit: abc123+CHANGES");
        assert!(!hr.contains("0.1.0-"));
    }

    #[test]
    fn with_prerelease() {
        assert_eq!(
            format_version("0.1.0", "DEV", "abc123"),
            "Version: 0.1.0-DEV Git Commit: abc123"
        );
    }

    #[test]
    fn reports_crate_version() {
        assert!(human_readable().starts_with(&format!("Version: {VERSION}")));
    }
}
