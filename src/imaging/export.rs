use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::info;

use super::fits::write_fits;
use crate::error::{LauncherError, Result};
use crate::host::HostImage;

/// A host image written to a temporary FITS file.
///
/// The file and its directory are removed when this value is dropped, so it
/// must outlive the runtime process reading it.
pub struct ExportedImage {
    dir: TempDir,
    path: PathBuf,
}

impl ExportedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Write the host image to `<tempdir>/<name>.fit`.
///
/// The channel splitting needs colour data, so images with fewer than three
/// channels are rejected.
pub fn export_image(image: &HostImage) -> Result<ExportedImage> {
    if image.channels < 3 {
        return Err(LauncherError::Image(format!(
            "duosplit needs a colour image, but '{}' has {} channel(s)",
            image.name, image.channels
        )));
    }

    let dir = tempfile::Builder::new().prefix("duosplit-").tempdir()?;
    let path = dir.path().join(format!("{}.fit", sanitize_file_stem(&image.name)));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    write_fits(&mut writer, image)?;

    info!(
        "Exported {}x{} image to {:?}",
        image.width, image.height, path
    );
    Ok(ExportedImage { dir, path })
}

/// Keep file names portable: anything outside `[A-Za-z0-9._-]` becomes `_`.
fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(name: &str) -> HostImage {
        HostImage {
            name: name.to_string(),
            width: 4,
            height: 4,
            channels: 3,
            data: vec![0.5; 48],
        }
    }

    #[test]
    fn test_export_writes_fits_file() {
        let exported = export_image(&rgb("m42")).unwrap();
        assert!(exported.path().exists());
        assert_eq!(exported.path().file_name().unwrap(), "m42.fit");
        let bytes = std::fs::read(exported.path()).unwrap();
        assert!(bytes.starts_with(b"SIMPLE  ="));
    }

    #[test]
    fn test_export_removed_on_drop() {
        let exported = export_image(&rgb("m42")).unwrap();
        let dir = exported.dir().to_path_buf();
        drop(exported);
        assert!(!dir.exists());
    }

    #[test]
    fn test_mono_rejected() {
        let image = HostImage {
            name: "lum".to_string(),
            width: 2,
            height: 2,
            channels: 1,
            data: vec![0.0; 4],
        };
        assert!(matches!(export_image(&image), Err(LauncherError::Image(_))));
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("NGC 7000/stack"), "NGC_7000_stack");
        assert_eq!(sanitize_file_stem("..."), "image");
        assert_eq!(sanitize_file_stem("m31_r-1.5"), "m31_r-1.5");
    }
}
