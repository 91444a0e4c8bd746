/// Opening rendered reports in the default browser

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use log::info;

/// Platform command that opens a URL with the default handler
fn opener_command() -> Command {
    match std::env::consts::OS {
        "windows" => {
            let mut cmd = Command::new("cmd");
            cmd.args(["/c", "start"]);
            cmd
        }
        "macos" => Command::new("open"),
        // linux, freebsd, openbsd, netbsd
        _ => Command::new("xdg-open"),
    }
}

/// `file://` URL for a local path, made absolute against the working directory
pub fn file_url(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(path)
    };
    Ok(format!("file://{}", absolute.display()))
}

/// Open a local file in the default browser without waiting for it
pub fn open_in_browser(path: &Path) -> Result<String> {
    let url = file_url(path)?;
    let mut command = opener_command();

    info!("Opening {} with {:?}", url, command.get_program());
    command
        .arg(&url)
        .spawn()
        .with_context(|| format!("Failed to launch {:?}", command.get_program()))?;

    Ok(url)
}
