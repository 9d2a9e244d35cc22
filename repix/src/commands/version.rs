/// Get the version string for repix and librepix
pub fn get_version_string() -> String {
    format!(
        "repix {}\nlibrepix {}",
        env!("CARGO_PKG_VERSION"),
        librepix::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
