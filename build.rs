//! Build script for issue-labeler - embeds version information.
//!
//! `BUILD_INFO_HUMAN` is `{CARGO_PKG_VERSION} ({git describe}) {rustc --version}`.
//! Components that cannot be determined (no git checkout, e.g. when
//! building from a published crate) are left out.

use std::process::Command;

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    let build_info = [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_describe().map(|v| format!("({v})")),
        command_output("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={build_info}");
}

/// Runs `program` and returns its trimmed stdout if it succeeded.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_describe() -> Option<String> {
    command_output("git", &["describe", "--tags", "--always", "--dirty"])
}
