use super::write_plan;
use crate::adapters::chromium::ChromiumPage;
use crate::app::products::ChatIllustrationSpec;
use crate::config::toml_config::ForgeConfig;
use crate::core::profile::remove_stale_locks;
use crate::core::prompt::build_prompt;
use crate::core::session::ChatSession;
use crate::domain::model::{Artifact, ArtifactKind};
use crate::domain::ports::{BrowserPage, Job, PendingFile, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 透過聊天網頁取得一張插圖
pub struct IllustrationJob<S: Storage> {
    storage: S,
    config: ForgeConfig,
    spec: ChatIllustrationSpec,
    use_reference: bool,
}

impl<S: Storage> IllustrationJob<S> {
    pub fn new(storage: S, config: ForgeConfig, spec: ChatIllustrationSpec) -> Self {
        Self {
            storage,
            config,
            spec,
            use_reference: true,
        }
    }

    pub fn without_reference(mut self) -> Self {
        self.use_reference = false;
        self
    }

    pub fn design_paths(&self) -> Vec<PathBuf> {
        self.spec
            .design_files
            .iter()
            .map(|f| self.config.assets_path(f))
            .collect()
    }

    /// 參考圖不存在時只警告，提示照樣送出
    pub fn reference_path(&self) -> Option<PathBuf> {
        if !self.use_reference {
            return None;
        }
        let relative = self.spec.reference_image.as_ref()?;
        let path = Path::new(&self.config.output.dir).join(relative);
        if path.is_file() {
            Some(path)
        } else {
            tracing::warn!("⚠️ Reference image not found, sending prompt without it: {}", path.display());
            None
        }
    }
}

#[async_trait]
impl<S: Storage> Job for IllustrationJob<S> {
    fn name(&self) -> String {
        format!("illustration {}", self.spec.output_file)
    }

    async fn prepare(&self) -> Result<Vec<PendingFile>> {
        // 先讀設計文件，缺檔時不必開瀏覽器
        let prompt = build_prompt(self.spec.prompt_prefix, &self.design_paths())?;
        let reference = self.reference_path();

        remove_stale_locks(&self.config.browser.profile_path())?;
        let page = ChromiumPage::launch(&self.config.browser).await?;

        let result = ChatSession::new(&page, &self.config)
            .run(&prompt, reference.as_deref())
            .await;

        if let Err(e) = page.close().await {
            tracing::warn!("⚠️ Browser did not close cleanly: {}", e);
        }

        let data = result?;
        tracing::info!("✅ Image received ({} bytes)", data.len());
        Ok(vec![PendingFile::new(
            self.spec.output_file.clone(),
            ArtifactKind::Image,
            data,
        )])
    }

    async fn publish(&self, plan: Vec<PendingFile>) -> Result<Vec<Artifact>> {
        write_plan(&self.storage, plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use crate::utils::error::ForgeError;
    use tempfile::TempDir;

    fn job(dir: &TempDir, reference: Option<&str>) -> IllustrationJob<LocalStorage> {
        let mut config = ForgeConfig::default();
        config.output.dir = dir.path().join("out").to_string_lossy().to_string();
        config.output.assets_dir = dir.path().join("assets").to_string_lossy().to_string();
        let spec = ChatIllustrationSpec {
            prompt_prefix: "draw this:\n\n",
            design_files: vec!["p/design.md".to_string()],
            reference_image: reference.map(str::to_string),
            output_file: "p/out.png".to_string(),
        };
        IllustrationJob::new(LocalStorage::new(config.output.dir.clone()), config, spec)
    }

    #[test]
    fn test_design_paths_resolve_under_assets_dir() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, None);
        assert_eq!(job.design_paths(), vec![dir.path().join("assets").join("p/design.md")]);
    }

    #[test]
    fn test_missing_reference_is_skipped() {
        let dir = TempDir::new().unwrap();
        assert!(job(&dir, Some("p/ref.png")).reference_path().is_none());

        std::fs::create_dir_all(dir.path().join("out/p")).unwrap();
        std::fs::write(dir.path().join("out/p/ref.png"), b"png").unwrap();
        let present = job(&dir, Some("p/ref.png"));
        assert_eq!(present.reference_path(), Some(dir.path().join("out").join("p/ref.png")));
        assert!(present.without_reference().reference_path().is_none());
    }

    #[tokio::test]
    async fn test_missing_design_file_fails_before_launching_browser() {
        let dir = TempDir::new().unwrap();
        let err = job(&dir, None).prepare().await.unwrap_err();
        assert!(matches!(err, ForgeError::MissingInput { .. }));
    }
}
