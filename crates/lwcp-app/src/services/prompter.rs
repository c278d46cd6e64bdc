//! Non-interactive prompt answers
//!
//! [`PresetPrompter`] answers from command-line presets and falls back to an
//! inner prompter for anything not preset. Wrapping [`CancelPrompter`] gives a
//! fully non-interactive prompter for headless runs.

use lwcp_core::prelude::*;
use lwcp_core::{PlatformKind, PlatformOption};

use super::Prompter;

/// Cancels every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelPrompter;

impl Prompter for CancelPrompter {
    async fn pick(&self, placeholder: &str, _options: &[PlatformOption]) -> Result<Option<usize>> {
        debug!("No answer for prompt '{}', cancelling", placeholder);
        Ok(None)
    }

    async fn input(&self, placeholder: &str) -> Result<Option<String>> {
        debug!("No answer for prompt '{}', cancelling", placeholder);
        Ok(None)
    }
}

/// Answers prompts from presets, delegating the rest to `inner`
#[derive(Debug, Clone, Default)]
pub struct PresetPrompter<P> {
    platform: Option<PlatformKind>,
    target: Option<String>,
    inner: P,
}

impl<P> PresetPrompter<P> {
    pub fn new(inner: P) -> Self {
        Self {
            platform: None,
            target: None,
            inner,
        }
    }

    pub fn with_platform(mut self, platform: Option<PlatformKind>) -> Self {
        self.platform = platform;
        self
    }

    /// Preset device name. An empty string accepts the offered default.
    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.target = target;
        self
    }
}

impl<P: Prompter + Sync> Prompter for PresetPrompter<P> {
    async fn pick(&self, placeholder: &str, options: &[PlatformOption]) -> Result<Option<usize>> {
        if let Some(platform) = self.platform {
            let index = options.iter().position(|option| option.id == platform);
            if index.is_none() {
                warn!("Platform {} is not available, cancelling", platform);
            }
            return Ok(index);
        }
        self.inner.pick(placeholder, options).await
    }

    async fn input(&self, placeholder: &str) -> Result<Option<String>> {
        if let Some(target) = &self.target {
            return Ok(Some(target.clone()));
        }
        self.inner.input(placeholder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lwcp_core::{platform_catalog, Messages};

    #[tokio::test]
    async fn test_cancel_prompter() {
        let catalog = platform_catalog(&Messages::new(), true);
        assert_eq!(CancelPrompter.pick("p", &catalog).await.unwrap(), None);
        assert_eq!(CancelPrompter.input("p").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_preset_platform_and_target() {
        let catalog = platform_catalog(&Messages::new(), true);
        let prompter = PresetPrompter::new(CancelPrompter)
            .with_platform(Some(PlatformKind::Android))
            .with_target(Some(String::new()));

        assert_eq!(prompter.pick("p", &catalog).await.unwrap(), Some(2));
        assert_eq!(prompter.input("p").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_preset_platform_missing_from_catalog() {
        let mobile_only = platform_catalog(&Messages::new(), false);
        let prompter =
            PresetPrompter::new(CancelPrompter).with_platform(Some(PlatformKind::Desktop));
        assert_eq!(prompter.pick("p", &mobile_only).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_no_presets_delegates() {
        let catalog = platform_catalog(&Messages::new(), false);
        let prompter = PresetPrompter::new(CancelPrompter);
        assert_eq!(prompter.pick("p", &catalog).await.unwrap(), None);
        assert_eq!(prompter.input("p").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_preset_does_not_mask_inner_errors() {
        let catalog = platform_catalog(&Messages::new(), true);
        let prompter = PresetPrompter::new(crate::test_utils::ScriptedPrompter::failing())
            .with_platform(Some(PlatformKind::IOS));

        assert_eq!(prompter.pick("p", &catalog).await.unwrap(), Some(1));
        assert!(matches!(
            prompter.input("p").await,
            Err(Error::Terminal { .. })
        ));
    }
}
