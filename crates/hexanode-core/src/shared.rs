// ── Shared device tree handle ──
//
// Serializes access for hosts that serve concurrent callers. Mutation and
// saving stay separate steps, exactly as on a bare `DeviceTree`.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::error::CoreError;
use crate::persist::{encode, staging_path};
use crate::tree::DeviceTree;

/// Cloneable handle to one process-wide [`DeviceTree`].
#[derive(Debug, Clone, Default)]
pub struct SharedDeviceTree {
    inner: Arc<RwLock<DeviceTree>>,
    // Held across encode, write and rename so saves land in order.
    save_lock: Arc<Mutex<()>>,
}

impl SharedDeviceTree {
    pub fn new(tree: DeviceTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run `f` with shared access.
    pub async fn read<R>(&self, f: impl FnOnce(&DeviceTree) -> R) -> R {
        let guard = self.inner.read().await;
        f(&*guard)
    }

    /// Run `f` with exclusive access. Writers are served one at a time.
    pub async fn write<R>(&self, f: impl FnOnce(&mut DeviceTree) -> R) -> R {
        let mut guard = self.inner.write().await;
        f(&mut *guard)
    }

    /// Persist the current view set to `path`.
    ///
    /// Saves run one at a time, so the last save to finish wrote the newest
    /// snapshot. The document is encoded under the read lock; file I/O
    /// happens after it is released, so readers and writers are not blocked
    /// by the disk.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let _saving = self.save_lock.lock().await;
        let (doc, views) = {
            let guard = self.inner.read().await;
            (encode(&guard)?, guard.view_count())
        };

        let io_err = |source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let staging = staging_path(path);
        tokio::fs::write(&staging, doc).await.map_err(io_err)?;
        if let Err(source) = tokio::fs::rename(&staging, path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(io_err(source));
        }

        info!(path = %path.display(), views, "device tree saved");
        Ok(())
    }

    /// Take the tree back out, if this is the last handle.
    pub fn try_into_inner(self) -> Result<DeviceTree, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self {
                inner,
                save_lock: self.save_lock,
            })
    }
}
