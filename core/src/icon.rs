// core/src/icon.rs
//
// Icon representation plus its on-disk materialization. Shells consume the
// icon as a file path, so bitmap icons get written to a temporary PNG the
// store owns and removes; path icons stay owned by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};

use crate::error::IconError;

/// The tray icon as authored by application code.
#[derive(Clone)]
pub enum Icon {
    /// An existing image file. The store never deletes it.
    Path(PathBuf),
    /// An in-memory bitmap. The store serializes it to a temp file it owns.
    Bitmap(RgbaImage),
}

impl std::fmt::Debug for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Icon::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Icon::Bitmap(img) => f
                .debug_struct("Bitmap")
                .field("width", &img.width())
                .field("height", &img.height())
                .finish(),
        }
    }
}

impl From<PathBuf> for Icon {
    fn from(path: PathBuf) -> Self {
        Icon::Path(path)
    }
}

impl From<RgbaImage> for Icon {
    fn from(image: RgbaImage) -> Self {
        Icon::Bitmap(image)
    }
}

/// Tracks the currently materialized icon file for one tray instance.
///
/// At most one removable (store-owned) file exists at a time; it is removed
/// before a replacement is written and when the store is dropped.
#[derive(Debug, Default)]
pub struct IconStore {
    path: Option<PathBuf>,
    removable: bool,
}

impl IconStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the current icon file, if one is materialized.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Materialize `icon` and return the file path a shell can display.
    ///
    /// Any previous store-owned temp file is removed first; removal failures
    /// never fail the replacement.
    pub fn materialize(&mut self, icon: &Icon) -> Result<&Path, IconError> {
        self.clear();

        let (path, removable) = match icon {
            Icon::Path(path) => (std::path::absolute(path)?, false),
            Icon::Bitmap(image) => {
                let tmp = tempfile::Builder::new()
                    .prefix("trayshell-icon-")
                    .suffix(".png")
                    .tempfile()?;
                let path = tmp.into_temp_path().keep()?;
                image.save_with_format(&path, image::ImageFormat::Png)?;
                debug!("wrote bitmap icon to {}", path.display());
                (path, true)
            }
        };

        self.removable = removable;
        Ok(self.path.insert(path).as_path())
    }

    /// Remove the current icon file if the store owns it. Best effort:
    /// a file that is already gone or undeletable is only logged.
    pub fn clear(&mut self) {
        if let Some(path) = self.path.take() {
            if self.removable {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("could not remove icon file {}: {}", path.display(), e);
                }
            }
        }
        self.removable = false;
    }
}

impl Drop for IconStore {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(8, 8, image::Rgba(color))
    }

    #[test]
    fn bitmap_replacement_removes_previous_file() {
        let mut store = IconStore::new();
        let first = store
            .materialize(&Icon::Bitmap(bitmap([255, 0, 0, 255])))
            .unwrap()
            .to_path_buf();
        assert!(first.exists());

        let second = store
            .materialize(&Icon::Bitmap(bitmap([0, 0, 255, 255])))
            .unwrap()
            .to_path_buf();
        assert!(second.exists());
        assert!(!first.exists(), "previous temp file must be gone");
        assert_ne!(first, second);
    }

    #[test]
    fn path_icon_creates_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let icon_file = dir.path().join("icon.png");
        bitmap([1, 2, 3, 255]).save(&icon_file).unwrap();
        let before: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();

        let mut store = IconStore::new();
        let resolved = store
            .materialize(&Icon::Path(icon_file.clone()))
            .unwrap()
            .to_path_buf();
        assert!(resolved.is_absolute());
        assert_eq!(store.path(), Some(resolved.as_path()));

        let after: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(before.len(), after.len());

        // Clearing a path icon must not delete the caller's file.
        store.clear();
        assert!(icon_file.exists());
    }

    #[test]
    fn drop_removes_owned_file() {
        let path = {
            let mut store = IconStore::new();
            store
                .materialize(&Icon::Bitmap(bitmap([0, 255, 0, 255])))
                .unwrap()
                .to_path_buf()
        };
        assert!(!path.exists(), "drop must remove the owned temp file");
    }

    #[test]
    fn clear_on_empty_store_is_harmless() {
        let mut store = IconStore::new();
        store.clear();
        store.clear();
        assert!(store.path().is_none());
    }
}
