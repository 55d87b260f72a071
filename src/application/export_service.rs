//! Export actions: save selected quotes into a hook folder or fetch them as a ZIP.
//!
//! Both actions share one payload builder so they always agree on filenames.
//! Each has its own busy flag; the two may run at the same time, but neither
//! can be re-entered while it is in flight.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{
    prepare_export, AppError, DownloadRequest, ExportConfig, QuoteItem, Result, SaveRequest,
    SaveResponse, Setup, SoundFolder,
};
use crate::infrastructure::archive;

use super::banner::{BannerMessage, ResultBanner};
use super::selection::Selection;

const SAVE_FAILED: &str = "Save failed";
const DOWNLOAD_FAILED: &str = "Batch download failed. Make sure the backend server is running.";

/// Backend capable of storing and packaging export batches.
pub trait QuoteBackend: Send + Sync {
    /// Sync the batch into the named hook folder.
    fn save_to_sounds(
        &self,
        request: &SaveRequest,
    ) -> impl Future<Output = Result<SaveResponse>> + Send;

    /// Package the batch as a ZIP and return its bytes.
    fn download_batch(
        &self,
        request: &DownloadRequest,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Result of a finished batch download.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Where the archive was written.
    pub path: PathBuf,
    /// Archive size in bytes.
    pub size_bytes: usize,
    /// Number of files inside, if the archive could be read.
    pub entries: Option<usize>,
}

/// Totals of a whole-setup sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub saved: usize,
    pub skipped: usize,
    pub deleted: usize,
    /// Hooks that were sent to the backend.
    pub hooks_synced: usize,
}

/// Clears a busy flag when dropped, whatever the outcome.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool, action: &'static str) -> Result<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(AppError::Busy { action });
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Drives the save and download actions for the current selection.
pub struct ExportController<B> {
    backend: B,
    selection: Mutex<Selection>,
    folder: Mutex<SoundFolder>,
    zip_name: String,
    is_saving: AtomicBool,
    is_downloading: AtomicBool,
    banner: ResultBanner,
}

impl<B: QuoteBackend> ExportController<B> {
    /// Create a controller with an empty selection.
    #[must_use]
    pub fn new(backend: B, config: &ExportConfig) -> Self {
        Self {
            backend,
            selection: Mutex::new(Selection::new()),
            folder: Mutex::new(config.default_folder),
            zip_name: config.zip_name.clone(),
            is_saving: AtomicBool::new(false),
            is_downloading: AtomicBool::new(false),
            banner: ResultBanner::new(config.banner_duration()),
        }
    }

    /// Replace the current selection.
    pub fn set_selection(&self, selection: Selection) {
        *lock(&self.selection) = selection;
    }

    /// Snapshot of the current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        lock(&self.selection).clone()
    }

    /// Drop every selected quote.
    pub fn clear_selection(&self) {
        lock(&self.selection).clear();
    }

    /// Choose the hook folder for `save_to_sounds`.
    pub fn set_folder(&self, folder: SoundFolder) {
        *lock(&self.folder) = folder;
    }

    /// Hook folder `save_to_sounds` targets.
    #[must_use]
    pub fn folder(&self) -> SoundFolder {
        *lock(&self.folder)
    }

    /// Whether a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.is_saving.load(Ordering::Acquire)
    }

    /// Whether a download is in flight.
    #[must_use]
    pub fn is_downloading(&self) -> bool {
        self.is_downloading.load(Ordering::Acquire)
    }

    /// Banner describing the latest outcome.
    #[must_use]
    pub const fn banner(&self) -> &ResultBanner {
        &self.banner
    }

    /// Save the selection into the chosen hook folder.
    ///
    /// On success the selection is cleared. On failure it is left as is.
    ///
    /// # Errors
    /// Returns `Busy` if a save is already running, `Validation` for an empty
    /// selection, or the backend error.
    pub async fn save_to_sounds(&self) -> Result<SaveResponse> {
        let _guard = BusyGuard::acquire(&self.is_saving, "Save")?;
        self.banner.clear();

        let items = self.selected_items()?;
        let folder = self.folder();

        match self.post_save(&items, folder).await {
            Ok(response) => {
                self.clear_selection();
                self.banner.show(BannerMessage::Success(format!(
                    "Saved {} {} to {folder}.",
                    response.saved,
                    plural(response.saved, "file")
                )));
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, "Save error");
                self.banner.show(BannerMessage::Error(format!(
                    "{SAVE_FAILED}: {}",
                    e.user_message(SAVE_FAILED)
                )));
                Err(e)
            }
        }
    }

    /// Download the selection as a ZIP into `dest_dir`.
    ///
    /// # Errors
    /// Returns `Busy` if a download is already running, `Validation` for an
    /// empty selection, the backend error, or an IO error writing the file.
    pub async fn download_batch(&self, dest_dir: &Path) -> Result<DownloadOutcome> {
        let _guard = BusyGuard::acquire(&self.is_downloading, "Download")?;
        self.banner.clear();

        let items = self.selected_items()?;

        match self.fetch_zip(&items, dest_dir).await {
            Ok(outcome) => {
                self.clear_selection();
                self.banner.show(BannerMessage::Success("Batch ZIP downloaded.".into()));
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "Batch download error");
                self.banner.show(BannerMessage::Error(DOWNLOAD_FAILED.into()));
                Err(e)
            }
        }
    }

    /// Sync every folder hook of `setup` into its sound folder.
    ///
    /// Hooks whose names are not sound folders are skipped. Stops at the
    /// first failing hook.
    ///
    /// # Errors
    /// Returns `Busy` if a save is running, `Validation` if the setup has no
    /// sounds, or the backend error.
    pub async fn sync_setup(&self, setup: &Setup) -> Result<SyncSummary> {
        let _guard = BusyGuard::acquire(&self.is_saving, "Save")?;
        self.banner.clear();

        if setup.total_sounds() == 0 {
            return Err(AppError::validation(format!(
                "Setup '{}' has no sounds",
                setup.list.name
            )));
        }

        let mut summary = SyncSummary::default();
        for hook in &setup.hooks {
            let Some(folder) = hook.folder() else {
                tracing::warn!(hook = %hook.name, "Skipping hook without a sound folder");
                continue;
            };
            if hook.recommendations.is_empty() {
                continue;
            }

            match self.post_save(&hook.items(), folder).await {
                Ok(response) => {
                    summary.saved += response.saved;
                    summary.skipped += response.skipped;
                    summary.deleted += response.deleted;
                    summary.hooks_synced += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, hook = %hook.name, "Setup sync error");
                    self.banner.show(BannerMessage::Error(format!(
                        "Error: {}",
                        e.user_message(SAVE_FAILED)
                    )));
                    return Err(e);
                }
            }
        }

        self.banner.show(BannerMessage::Success(format!(
            "Synced: {} new, {} existing, {} removed",
            summary.saved, summary.skipped, summary.deleted
        )));

        Ok(summary)
    }

    /// Download every sound of `setup` as one ZIP into `dest_dir`.
    ///
    /// # Errors
    /// Returns `Busy` if a download is running, `Validation` if the setup has
    /// no sounds, the backend error, or an IO error.
    pub async fn download_setup(&self, setup: &Setup, dest_dir: &Path) -> Result<DownloadOutcome> {
        let _guard = BusyGuard::acquire(&self.is_downloading, "Download")?;
        self.banner.clear();

        let items = setup.all_items();
        if items.is_empty() {
            return Err(AppError::validation(format!(
                "Setup '{}' has no sounds",
                setup.list.name
            )));
        }

        match self.fetch_zip(&items, dest_dir).await {
            Ok(outcome) => {
                self.banner.show(BannerMessage::Success("Batch ZIP downloaded.".into()));
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "Setup download error");
                self.banner.show(BannerMessage::Error(DOWNLOAD_FAILED.into()));
                Err(e)
            }
        }
    }

    fn selected_items(&self) -> Result<Vec<QuoteItem>> {
        let selection = lock(&self.selection);
        if selection.is_empty() {
            return Err(AppError::validation("No quotes selected"));
        }
        Ok(selection.items().to_vec())
    }

    async fn post_save(&self, items: &[QuoteItem], folder: SoundFolder) -> Result<SaveResponse> {
        let request = SaveRequest {
            quotes: prepare_export(items),
            folder,
        };
        tracing::info!(count = request.quotes.len(), %folder, "Saving quotes to sound folder");

        let response = self.backend.save_to_sounds(&request).await?;
        tracing::info!(
            saved = response.saved,
            target_dir = %response.target_dir,
            "Save completed"
        );
        Ok(response)
    }

    async fn fetch_zip(&self, items: &[QuoteItem], dest_dir: &Path) -> Result<DownloadOutcome> {
        let request = DownloadRequest {
            quotes: prepare_export(items),
        };
        tracing::info!(count = request.quotes.len(), "Requesting batch ZIP");

        let bytes = self.backend.download_batch(&request).await?;

        std::fs::create_dir_all(dest_dir).map_err(|e| {
            AppError::io(format!("Failed to create {}", dest_dir.display()), e)
        })?;
        let path = dest_dir.join(&self.zip_name);
        std::fs::write(&path, &bytes)
            .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

        let entries = archive::count_entries(&bytes);
        if entries.is_none() {
            tracing::warn!(path = %path.display(), "Downloaded file is not a readable ZIP");
        }

        Ok(DownloadOutcome {
            path,
            size_bytes: bytes.len(),
            entries,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `"file"` or `"files"` depending on `count`.
pub(crate) fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
