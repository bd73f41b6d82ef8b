//! Version command handler

/// Display version information
pub fn display_version() {
    println!("razor-settings {}", env!("CARGO_PKG_VERSION"));
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  Share directory: {}", razor_settings::config::paths::SHARE_DIR);
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
    println!("  Repository: {}", env!("CARGO_PKG_REPOSITORY"));
}
