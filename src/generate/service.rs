use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use crate::assets::decode::decode_background;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::generate::generator::{CountdownGenerator, GeneratedGif};
use crate::generate::request::GenerationRequest;

/// Per-output-name write locks for the async API.
///
/// Generations sharing a name otherwise race on the same file. Passing the same `OutputLocks`
/// to [`CountdownGenerator::generate_async_locked`] makes them run one after another.
#[derive(Debug, Default)]
pub struct OutputLocks {
    by_name: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl OutputLocks {
    /// Empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.by_name.lock().unwrap_or_else(|p| p.into_inner());
        map.entry(name.to_owned()).or_default().clone()
    }

    /// Drops the entry for `name` once no generation holds or waits on it.
    fn release(&self, name: &str) {
        let mut map = self.by_name.lock().unwrap_or_else(|p| p.into_inner());
        if map.get(name).is_some_and(|m| Arc::strong_count(m) == 1) {
            map.remove(name);
        }
    }

    /// Number of names with a generation running or queued.
    pub fn len(&self) -> usize {
        self.by_name.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Whether no generation is running or queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CountdownGenerator {
    /// Async [`generate`](Self::generate).
    ///
    /// The background image is read with `tokio::fs`; decoding, rendering and encoding run on
    /// the blocking pool. Must be called from within a Tokio runtime.
    pub async fn generate_async(&self, request: GenerationRequest) -> CountdownResult<GeneratedGif> {
        self.generate_async_inner(request, None).await
    }

    /// [`generate_async`](Self::generate_async), serialized against other calls using the same
    /// `locks` and output name.
    pub async fn generate_async_locked(
        &self,
        request: GenerationRequest,
        locks: &OutputLocks,
    ) -> CountdownResult<GeneratedGif> {
        self.generate_async_inner(request, Some(locks)).await
    }

    #[tracing::instrument(skip_all, fields(name = request.name.as_deref().unwrap_or("default")))]
    async fn generate_async_inner(
        &self,
        request: GenerationRequest,
        locks: Option<&OutputLocks>,
    ) -> CountdownResult<GeneratedGif> {
        let config = request.resolve()?;
        let bg_bytes = match &config.background_image {
            Some(path) => Some(tokio::fs::read(path).await.map_err(|e| {
                CountdownError::asset(format!("read background image '{}': {e}", path.display()))
            })?),
            None => None,
        };

        let name = config.name.clone();
        let guard = match locks {
            Some(locks) => Some(locks.lock_for(&name).lock_owned().await),
            None => None,
        };

        let this = self.clone();
        let out = tokio::task::spawn_blocking(move || -> CountdownResult<GeneratedGif> {
            let background = bg_bytes
                .map(|bytes| decode_background(&bytes, config.canvas))
                .transpose()?;
            this.write_gif(&config, background.as_ref())
        })
        .await
        .map_err(|e| CountdownError::Other(anyhow!("generation task failed: {e}")));

        drop(guard);
        if let Some(locks) = locks {
            locks.release(&name);
        }
        out?
    }
}
