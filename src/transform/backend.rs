//! Transform trait and shared types.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Transform of {path} failed: {message}")]
    Failed { path: String, message: String },
}

/// A source-to-source code transform.
pub trait Transform {
    /// Transform `source`. `virtual_path` names the file in diagnostics; it
    /// need not exist.
    fn transform(
        &self,
        source: &str,
        virtual_path: &Path,
        minify: bool,
    ) -> Result<String, TransformError>;
}

/// Returns the source as-is, with a trailing newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Transform for Passthrough {
    fn transform(&self, source: &str, _: &Path, _: bool) -> Result<String, TransformError> {
        let mut out = source.to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call; fails when the source contains `fail_on`.
    #[derive(Default)]
    pub struct MockTransform {
        pub calls: Mutex<Vec<RecordedCall>>,
        pub fail_on: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub path: String,
        pub minify: bool,
    }

    impl MockTransform {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(marker: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(marker.to_string()),
            }
        }

        pub fn get_calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transform for MockTransform {
        fn transform(
            &self,
            source: &str,
            virtual_path: &Path,
            minify: bool,
        ) -> Result<String, TransformError> {
            let path = virtual_path.to_string_lossy().to_string();
            self.calls.lock().unwrap().push(RecordedCall {
                path: path.clone(),
                minify,
            });
            match &self.fail_on {
                Some(marker) if source.contains(marker.as_str()) => Err(TransformError::Failed {
                    path,
                    message: format!("mock failure on {marker}"),
                }),
                _ => Ok(source.to_string()),
            }
        }
    }

    #[test]
    fn passthrough_appends_newline_once() {
        let p = Passthrough;
        assert_eq!(p.transform("a;", Path::new("x.js"), true).unwrap(), "a;\n");
        assert_eq!(p.transform("a;\n", Path::new("x.js"), false).unwrap(), "a;\n");
    }

    #[test]
    fn mock_records_calls() {
        let mock = MockTransform::new();
        mock.transform("a", Path::new("/load.js"), false).unwrap();
        assert_eq!(
            mock.get_calls(),
            vec![RecordedCall {
                path: "/load.js".into(),
                minify: false
            }]
        );
    }

    #[test]
    fn mock_fails_on_marker() {
        let mock = MockTransform::failing_on("BROKEN");
        let err = mock.transform("x BROKEN y", Path::new("g.js"), true).unwrap_err();
        assert!(err.to_string().contains("g.js"));
    }
}
