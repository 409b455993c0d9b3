// アップロードされたファイルと、そのファイル名に関するルール

const FALLBACK_STEM: &str = "image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    /// True when the name has an extension and it is in `allowed_extensions`
    /// (case-insensitive).
    pub fn is_allowed(&self, allowed_extensions: &[String]) -> bool {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) => allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Sanitized name, or `image` when nothing printable survives.
    pub fn safe_name(&self) -> String {
        let safe = sanitize_file_name(&self.file_name);
        if safe.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            safe
        }
    }

    /// Sanitized name without its last extension, never empty.
    pub fn output_stem(&self) -> String {
        let safe = self.safe_name();
        let stem = match safe.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => safe.as_str(),
        };
        if stem.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            stem.to_string()
        }
    }
}

/// Reduces a client-supplied name to a flat ASCII name that is safe to put
/// in a header or an archive. Can return an empty string.
pub fn sanitize_file_name(name: &str) -> String {
    let flattened: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["webp".to_string(), "png".to_string(), "jpg".to_string(), "jpeg".to_string()]
    }

    #[test]
    fn test_is_allowed_checks_last_extension_case_insensitively() {
        assert!(UploadedFile::new("photo.JPG", vec![]).is_allowed(&allowed()));
        assert!(UploadedFile::new("archive.tar.png", vec![]).is_allowed(&allowed()));
        assert!(!UploadedFile::new("photo.png.exe", vec![]).is_allowed(&allowed()));
        assert!(!UploadedFile::new("photo", vec![]).is_allowed(&allowed()));
        assert!(!UploadedFile::new("", vec![]).is_allowed(&allowed()));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My cool photo.jpg"), "My_cool_photo.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\pic.png"), "C_Users_me_pic.png");
        assert_eq!(sanitize_file_name("café.png"), "caf.png");
        assert_eq!(sanitize_file_name("_.hidden."), "hidden");
        assert_eq!(sanitize_file_name("写真"), "");
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(UploadedFile::new("holiday.png", vec![]).output_stem(), "holiday");
        assert_eq!(UploadedFile::new("a.b.webp", vec![]).output_stem(), "a.b");
        assert_eq!(UploadedFile::new("写真.png", vec![]).output_stem(), "png");
        assert_eq!(UploadedFile::new("写真", vec![]).output_stem(), "image");
    }

    #[test]
    fn test_safe_name_never_empty() {
        assert_eq!(UploadedFile::new("写真", vec![]).safe_name(), "image");
        assert_eq!(UploadedFile::new("../", vec![]).safe_name(), "image");
        assert_eq!(UploadedFile::new("ok.png", vec![]).safe_name(), "ok.png");
    }
}
