//! Opening preview URLs in the system browser

use std::process::{Command, Stdio};

use url::Url;

use lwcp_core::prelude::*;

/// Opener command and leading arguments for the current platform
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        // `start` is a cmd builtin; the empty string is the window title.
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Open `url` in the default browser.
///
/// The opener is spawned without waiting; the browser outlives this process.
pub fn open_browser(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::browser(format!("refusing to open {}", url)));
    }

    let (program, leading) = opener();
    info!("Opening {} with {}", url, program);

    Command::new(program)
        .args(leading)
        .arg(url.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::browser(format!("{}: {}", program, e)))?;

    Ok(())
}
