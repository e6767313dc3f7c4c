use std::time::Duration;

use futures::SinkExt;
use futures::channel::mpsc;
use sha2::{Digest, Sha256};

/// An RGBA bitmap read from the system clipboard.
#[derive(Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for ClipboardImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl ClipboardImage {
    /// SHA-256 over the dimensions and pixel data.
    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = Sha256::new();
        hasher.update((self.width as u64).to_le_bytes());
        hasher.update((self.height as u64).to_le_bytes());
        hasher.update(&self.rgba);
        hasher.finalize().into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[source] arboard::Error),
    #[error("failed to read clipboard image: {0}")]
    Read(#[source] arboard::Error),
}

/// Detects when the clipboard starts holding an image it has not seen before.
#[derive(Default)]
pub struct ClipboardWatcher {
    clipboard: Option<arboard::Clipboard>,
    last_hash: Option<ContentHash>,
}

/// SHA-256 content digest of a [`ClipboardImage`].
pub type ContentHash = [u8; 32];

impl ClipboardWatcher {
    /// A watcher that treats content hashing to `last_hash` as already seen.
    pub fn with_last_hash(last_hash: Option<ContentHash>) -> Self {
        Self {
            clipboard: None,
            last_hash,
        }
    }

    /// Remember `image` and report whether its content differs from the last one seen.
    pub fn observe(&mut self, image: &ClipboardImage) -> bool {
        let hash = image.content_hash();
        if self.last_hash == Some(hash) {
            return false;
        }
        self.last_hash = Some(hash);
        true
    }

    /// Read the clipboard once. Returns the image only when it is new.
    pub fn poll(&mut self) -> Result<Option<ClipboardImage>, ClipboardError> {
        if self.clipboard.is_none() {
            self.clipboard = Some(arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?);
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return Ok(None);
        };

        match clipboard.get_image() {
            Ok(data) => {
                let image = ClipboardImage {
                    width: data.width,
                    height: data.height,
                    rgba: data.bytes.into_owned(),
                };
                Ok(self.observe(&image).then_some(image))
            }
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => {
                // Reconnect on the next poll.
                self.clipboard = None;
                Err(ClipboardError::Read(e))
            }
        }
    }
}

/// Poll the clipboard on a dedicated thread and forward new images to `output`.
///
/// Content matching `last_hash` is not reported again. Runs for as long as
/// the receiving side is alive.
pub async fn watch(
    interval: Duration,
    last_hash: Option<ContentHash>,
    mut output: mpsc::Sender<ClipboardImage>,
) {
    let (tx, mut rx) = tokio::sync::mpsc::channel(1);

    let spawned = std::thread::Builder::new()
        .name("clipboard-watcher".into())
        .spawn(move || poll_loop(interval, last_hash, tx));

    match spawned {
        Ok(_) => {
            while let Some(image) = rx.recv().await {
                if output.send(image).await.is_err() {
                    break;
                }
            }
        }
        Err(e) => log::error!("Failed to start clipboard watcher: {}", e),
    }

    std::future::pending::<()>().await;
}

fn poll_loop(
    interval: Duration,
    last_hash: Option<ContentHash>,
    tx: tokio::sync::mpsc::Sender<ClipboardImage>,
) {
    log::info!("Watching clipboard every {} ms", interval.as_millis());
    let mut watcher = ClipboardWatcher::with_last_hash(last_hash);

    while !tx.is_closed() {
        match watcher.poll() {
            Ok(Some(image)) => {
                log::info!("New clipboard image {}x{}", image.width, image.height);
                if tx.blocking_send(image).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("Clipboard poll failed: {}", e),
        }
        std::thread::sleep(interval);
    }

    log::debug!("Clipboard watcher stopped");
}
