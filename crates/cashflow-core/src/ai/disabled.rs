//! Generator used when AI features are switched off
//!
//! Stands in for a real backend so callers keep a single code path. Callers
//! check [`TextGenerator::is_enabled`] to answer with their own "disabled"
//! result instead of sending a prompt.

use async_trait::async_trait;

use crate::error::Result;

use super::TextGenerator;

/// The only text a disabled generator ever returns
pub const DISABLED_RESPONSE: &str = "AI insights are disabled";

/// Always answers with [`DISABLED_RESPONSE`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(DISABLED_RESPONSE.to_string())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "disabled"
    }

    fn host(&self) -> &str {
        ""
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
