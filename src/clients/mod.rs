use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AIError;

pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;

pub use mock::*;
#[cfg(feature = "openai")]
pub use openai::*;

/// Low-level language model client.
///
/// Implementors provide `ask_raw`, which executes a prompt and returns the raw
/// model text. Extracting structured data from that text is the caller's job.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}
