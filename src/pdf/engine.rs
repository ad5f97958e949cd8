//! Typst rendering engine.
//!
//! Writes Typst source into a scratch directory, runs the compiler there and
//! reads back the PDF. The directory is removed when the render finishes.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

use super::GeneratorError;

const SOURCE_FILE: &str = "kwitansi.typ";
const OUTPUT_FILE: &str = "kwitansi.pdf";

#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    typst_bin: String,
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl TypstRenderEngine {
    pub fn new(typst_bin: impl Into<String>) -> Self {
        Self {
            typst_bin: typst_bin.into(),
        }
    }

    /// Compile a complete Typst source string to PDF bytes.
    pub fn render(&self, typst_source: &str) -> Result<Vec<u8>, GeneratorError> {
        let temp_dir = tempdir().map_err(GeneratorError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILE);

        fs::write(&typ_path, typst_source).map_err(GeneratorError::WriteTypst)?;

        self.compile(temp_dir.path())
    }

    fn compile(&self, work_dir: &Path) -> Result<Vec<u8>, GeneratorError> {
        let output_path = work_dir.join(OUTPUT_FILE);

        let status = Command::new(&self.typst_bin)
            .arg("compile")
            .arg(work_dir.join(SOURCE_FILE))
            .arg(&output_path)
            .current_dir(work_dir)
            .status()
            .map_err(GeneratorError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            log::error!("{} exited with status {}", self.typst_bin, code);
            return Err(GeneratorError::TypstExit(code));
        }

        fs::read(&output_path).map_err(GeneratorError::ReadPdf)
    }
}
