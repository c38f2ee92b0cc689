use std::process::Command;

/// Trimmed stdout of a git command, or `None` when git is unavailable.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `--version` text: the bare version for tagged clean checkouts, otherwise
/// the version with the commit it was built from.
fn long_version(version: &str) -> String {
    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
        return version.to_string();
    };
    let dirty = git(&["status", "--porcelain"]).is_some();
    let tagged = git(&["tag", "--points-at", "HEAD"])
        .is_some_and(|tags| tags.lines().any(|t| t.trim_start_matches('v') == version));
    if tagged && !dirty {
        return version.to_string();
    }

    let date = git(&["log", "-1", "--format=%cd", "--date=short"]).unwrap_or_default();
    let marker = if dirty { "+dirty" } else { "" };
    format!("{} ({}{} {})", version, hash, marker, date)
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!(
        "cargo:rustc-env=CAROUSEL_LONG_VERSION={}",
        long_version(env!("CARGO_PKG_VERSION"))
    );
}
