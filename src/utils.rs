use std::path::{Path, PathBuf};

/// Image extensions shown by the browser. Matching is case-sensitive:
/// `photo.JPG` is not listed.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Check if a file name has one of the browsable image extensions.
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Keep only image names, preserving the incoming order.
pub fn filter_images<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names.into_iter().filter(|n| is_image_name(n)).collect()
}

/// List the image files directly inside `dir`, in the order the filesystem
/// returns them. A missing or unreadable directory yields an empty list.
pub async fn list_images(dir: &Path) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                // The tag tool is handed the exact path, so a lossy name would not resolve.
                Err(raw) => {
                    tracing::debug!(dir = %dir.display(), name = ?raw, "skipping name that is not UTF-8");
                }
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "directory listing interrupted");
                break;
            }
        }
    }

    filter_images(names)
}

/// Expand tilde (~) in path
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filter_is_case_sensitive_and_keeps_order() {
        let mixed = names(&["a.png", "b.txt", "c.JPG", "d.jpeg"]);
        assert_eq!(filter_images(mixed), names(&["a.png", "d.jpeg"]));

        let reversed = names(&["z.jpg", "notes.md", "a.png"]);
        assert_eq!(filter_images(reversed), names(&["z.jpg", "a.png"]));
    }

    #[test]
    fn names_without_a_real_extension_are_skipped() {
        assert!(!is_image_name("png"));
        assert!(!is_image_name(".png"));
        assert!(!is_image_name("jpgfile"));
        assert!(!is_image_name("photo.png.bak"));
        assert!(is_image_name("archive.tar.jpeg"));
    }

    #[tokio::test]
    async fn list_images_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.txt", "c.JPG", "d.jpeg"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let mut listed = list_images(dir.path()).await;
        listed.sort();
        assert_eq!(listed, names(&["a.png", "d.jpeg"]));
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let listed = list_images(&dir.path().join("gone")).await;
        assert!(listed.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.png"), b"").unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.png")), b"").unwrap();

        assert_eq!(list_images(dir.path()).await, names(&["ok.png"]));
    }

    #[test]
    fn expand_tilde_leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("/tmp/pics"), PathBuf::from("/tmp/pics"));
        assert_eq!(expand_tilde("pics/~x"), PathBuf::from("pics/~x"));
    }
}
