//! [`Transform`] backed by the `esbuild` command line tool.
//!
//! Source goes in on stdin, transformed code comes back on stdout:
//!
//! ```text
//! esbuild --loader=js --sourcefile=<virtual path> [--minify]
//! ```

use super::backend::{Transform, TransformError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct Esbuild {
    binary: PathBuf,
}

impl Esbuild {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn args(virtual_path: &Path, minify: bool) -> Vec<String> {
        let mut args = vec![
            "--loader=js".to_string(),
            format!("--sourcefile={}", virtual_path.display()),
        ];
        if minify {
            args.push("--minify".to_string());
        }
        args
    }
}

impl Default for Esbuild {
    fn default() -> Self {
        Self::new("esbuild")
    }
}

impl Transform for Esbuild {
    fn transform(
        &self,
        source: &str,
        virtual_path: &Path,
        minify: bool,
    ) -> Result<String, TransformError> {
        let mut child = Command::new(&self.binary)
            .args(Self::args(virtual_path, minify))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Dropping stdin closes the pipe so esbuild sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(TransformError::Failed {
                path: virtual_path.display().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
