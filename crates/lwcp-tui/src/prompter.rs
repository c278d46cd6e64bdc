//! [`Prompter`] backed by the terminal modals

use lwcp_app::Prompter;
use lwcp_core::prelude::*;
use lwcp_core::PlatformOption;

use crate::input::{read_input, InputResult};
use crate::picker::{pick_platform, PickResult};

/// Interactive prompter. Each prompt takes over the terminal on a blocking
/// thread and restores it before returning.
#[derive(Debug, Clone)]
pub struct TuiPrompter {
    title: String,
}

impl TuiPrompter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for TuiPrompter {
    fn default() -> Self {
        Self::new("LWC Preview")
    }
}

/// Run a modal on a blocking thread. A panicking modal is a terminal error.
async fn run_blocking<T, F>(what: &'static str, modal: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(modal).await.map_err(|e| {
        error!("{} task panicked: {}", what, e);
        Error::terminal(format!("{} task panicked: {}", what, e))
    })?;
    result.inspect_err(|e| error!("{} failed: {}", what, e))
}

impl Prompter for TuiPrompter {
    async fn pick(&self, placeholder: &str, options: &[PlatformOption]) -> Result<Option<usize>> {
        let title = self.title.clone();
        let placeholder = placeholder.to_string();
        let options = options.to_vec();

        let picked = run_blocking("Platform picker", move || {
            pick_platform(&title, &placeholder, &options)
        })
        .await?;

        Ok(match picked {
            PickResult::Picked(index) => Some(index),
            PickResult::Cancelled => None,
        })
    }

    async fn input(&self, placeholder: &str) -> Result<Option<String>> {
        let title = self.title.clone();
        let placeholder = placeholder.to_string();

        let submitted =
            run_blocking("Device prompt", move || read_input(&title, &placeholder)).await?;

        Ok(match submitted {
            InputResult::Submitted(value) => Some(value),
            InputResult::Cancelled => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pick_with_no_options_is_cancel() {
        let prompter = TuiPrompter::default();
        assert_eq!(prompter.pick("Select a platform", &[]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_modal_error_is_returned() {
        let result: Result<()> =
            run_blocking("Device prompt", || Err(Error::terminal("no tty"))).await;
        assert!(matches!(result, Err(Error::Terminal { message }) if message == "no tty"));
    }

    #[tokio::test]
    async fn test_modal_panic_is_terminal_error() {
        let result: Result<usize> = run_blocking("Platform picker", || panic!("draw failed")).await;
        match result {
            Err(Error::Terminal { message }) => assert!(message.contains("Platform picker")),
            other => panic!("expected a terminal error, got {:?}", other),
        }
    }
}
