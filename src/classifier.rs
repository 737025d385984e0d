use crate::summary::IgnoreReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accept,
    Reject(IgnoreReason),
}

/// Accept names ending in a configured extension, in either its
/// all-uppercase or all-lowercase spelling. The first match wins.
pub fn classify(name: &str, valid_extensions: &[String]) -> Classification {
    let accepted = valid_extensions
        .iter()
        .filter(|ext| !ext.is_empty())
        .any(|ext| {
            name.ends_with(ext.to_ascii_uppercase().as_str())
                || name.ends_with(ext.to_ascii_lowercase().as_str())
        });

    if accepted {
        Classification::Accept
    } else {
        Classification::Reject(IgnoreReason::Extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["mp4".into(), "lrv".into(), "THM".into()]
    }

    #[test]
    fn test_accepts_either_case() {
        let exts = extensions();
        assert_eq!(classify("GX010001.MP4", &exts), Classification::Accept);
        assert_eq!(classify("GX010001.mp4", &exts), Classification::Accept);
        assert_eq!(classify("GL010001.LRV", &exts), Classification::Accept);
        assert_eq!(classify("GX010001.thm", &exts), Classification::Accept);
    }

    #[test]
    fn test_mixed_case_is_rejected() {
        // only the all-upper and all-lower spellings are tried
        assert_eq!(
            classify("GX010001.Mp4", &extensions()),
            Classification::Reject(IgnoreReason::Extension)
        );
    }

    #[test]
    fn test_rejects_other_extensions() {
        let exts = extensions();
        assert_eq!(
            classify("readme.txt", &exts),
            Classification::Reject(IgnoreReason::Extension)
        );
        assert_eq!(
            classify("GX010001.MP4.bak", &exts),
            Classification::Reject(IgnoreReason::Extension)
        );
        assert_eq!(
            classify("noextension", &exts),
            Classification::Reject(IgnoreReason::Extension)
        );
    }

    #[test]
    fn test_empty_extension_does_not_match_everything() {
        let exts = vec![String::new(), "mp4".into()];
        assert_eq!(
            classify("readme.txt", &exts),
            Classification::Reject(IgnoreReason::Extension)
        );
        assert_eq!(classify("a.mp4", &exts), Classification::Accept);
    }
}
