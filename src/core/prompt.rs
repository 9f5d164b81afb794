use crate::utils::error::{ForgeError, Result};
use std::path::PathBuf;

pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// 前言 + 各設計文件內容（以分隔線串接）
pub fn build_prompt(prefix: &str, design_files: &[PathBuf]) -> Result<String> {
    let mut parts = Vec::with_capacity(design_files.len());
    for file in design_files {
        if !file.exists() {
            return Err(ForgeError::MissingInput {
                path: file.display().to_string(),
            });
        }
        parts.push(std::fs::read_to_string(file)?);
    }

    let prompt = format!("{}{}", prefix, parts.join(DOCUMENT_SEPARATOR));
    tracing::info!("📝 Prompt length: {} chars", prompt.chars().count());
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_joins_documents_with_separator() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("high_level_design.md");
        let b = dir.path().join("component_arrangement.md");
        std::fs::write(&a, "# Design").unwrap();
        std::fs::write(&b, "# Arrangement").unwrap();

        let prompt = build_prompt("Here:\n\n", &[a, b]).unwrap();

        assert_eq!(prompt, "Here:\n\n# Design\n\n---\n\n# Arrangement");
    }

    #[test]
    fn test_missing_design_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("high_level_design.md");

        let err = build_prompt("x", &[missing]).unwrap_err();

        assert!(matches!(err, ForgeError::MissingInput { .. }));
    }
}
