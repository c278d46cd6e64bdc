//! Two-step platform and device selection
//!
//! ```text
//! ChoosingPlatform ──pick desktop──────────────────────────▶ Done(target "")
//!        │ pick mobile
//!        ▼
//! ChoosingDevice ──empty──▶ Done(provisional target)
//!        │       ──text───▶ Done(text), remembered
//!        └───────cancel───▶ Err(SelectionCancelled { platform: Some(..) })
//! ChoosingPlatform ──cancel──▶ Err(SelectionCancelled { platform: None })
//! ```
//!
//! A prompt that cannot be shown at all surfaces as its own error and is
//! never mistaken for a cancel.

use lwcp_core::prelude::*;
use lwcp_core::{MessageKey, Messages, PlatformOption};

use crate::device_memory::DeviceMemory;
use crate::services::Prompter;

/// Resolved platform and device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub platform: PlatformOption,
    /// Device name; empty for desktop
    pub target: String,
}

#[derive(Debug)]
enum SelectorState {
    ChoosingPlatform,
    ChoosingDevice {
        platform: PlatformOption,
        placeholder: String,
        provisional: String,
    },
    Done(Selection),
}

/// Drives the prompts for one invocation
pub struct PlatformSelector<'a, P> {
    prompter: &'a P,
    memory: &'a DeviceMemory,
    messages: &'a Messages,
    remember_device: bool,
}

impl<'a, P: Prompter> PlatformSelector<'a, P> {
    pub fn new(
        prompter: &'a P,
        memory: &'a DeviceMemory,
        messages: &'a Messages,
        remember_device: bool,
    ) -> Self {
        Self {
            prompter,
            memory,
            messages,
            remember_device,
        }
    }

    /// Returns [`Error::SelectionCancelled`] when the user backs out
    pub async fn select(&self, catalog: &[PlatformOption]) -> Result<Selection> {
        let mut state = SelectorState::ChoosingPlatform;
        loop {
            state = match state {
                SelectorState::ChoosingPlatform => self.choose_platform(catalog).await?,
                SelectorState::ChoosingDevice {
                    platform,
                    placeholder,
                    provisional,
                } => {
                    self.choose_device(platform, &placeholder, provisional)
                        .await?
                }
                SelectorState::Done(selection) => return Ok(selection),
            };
        }
    }

    async fn choose_platform(&self, catalog: &[PlatformOption]) -> Result<SelectorState> {
        let placeholder = self.messages.localize(MessageKey::PlatformSelection, &[]);
        let picked = self
            .prompter
            .pick(&placeholder, catalog)
            .await?
            .and_then(|index| catalog.get(index).cloned());

        let Some(platform) = picked else {
            debug!("Platform selection cancelled");
            return Err(Error::selection_cancelled(None));
        };

        if platform.id.is_desktop() {
            return Ok(SelectorState::Done(Selection {
                platform,
                target: String::new(),
            }));
        }

        let (placeholder, provisional) = self.device_prompt(&platform);
        Ok(SelectorState::ChoosingDevice {
            platform,
            placeholder,
            provisional,
        })
    }

    /// Prompt text and provisional target for the device step
    fn device_prompt(&self, platform: &PlatformOption) -> (String, String) {
        let remembered = if self.remember_device {
            self.memory.get(&platform.platform_name)
        } else {
            String::new()
        };

        match platform.id.target_remembered_key() {
            Some(key) if !remembered.is_empty() => {
                (self.messages.localize(key, &[remembered.as_str()]), remembered)
            }
            _ => {
                let placeholder = platform
                    .id
                    .target_default_key()
                    .map(|key| self.messages.localize(key, &[]))
                    .unwrap_or_default();
                (placeholder, platform.default_target_name.clone())
            }
        }
    }

    async fn choose_device(
        &self,
        platform: PlatformOption,
        placeholder: &str,
        provisional: String,
    ) -> Result<SelectorState> {
        let Some(input) = self.prompter.input(placeholder).await? else {
            debug!("Device selection cancelled for {}", platform.id);
            return Err(Error::selection_cancelled(Some(platform.id)));
        };

        let target = if input.is_empty() {
            provisional
        } else {
            if let Err(e) = self.memory.set(&platform.platform_name, &input) {
                warn!("Failed to remember device {}: {}", input, e);
            }
            input
        };

        Ok(SelectorState::Done(Selection { platform, target }))
    }
}
