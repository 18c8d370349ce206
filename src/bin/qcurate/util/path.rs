use std::path::Path;

/// Final path component for display, or the whole path when there is none.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_file_name() {
        assert_eq!(file_label(Path::new("data/run1/assay.csv")), "assay.csv");
        assert_eq!(file_label(Path::new("/")), "/");
    }
}
