//! Dev server and browser collaborators backed by `lwcp-launcher`

use url::Url;

use lwcp_core::prelude::*;
use lwcp_launcher::{open_browser, DevServerProcess};

use super::{BrowserOpener, DevServer};

impl DevServer for DevServerProcess {
    async fn is_running(&self) -> bool {
        DevServerProcess::is_running(self).await
    }

    async fn start(&self) -> Result<()> {
        DevServerProcess::start(self).await
    }

    fn preview_url(&self, component: &str) -> Result<Url> {
        DevServerProcess::preview_url(self, component)
    }
}

/// Opens URLs with the platform's default browser
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &Url) -> Result<()> {
        open_browser(url)
    }
}
