use crate::utils::error::Result;
use std::path::Path;

pub const STALE_LOCKS: [&str; 3] = ["SingletonLock", "SingletonCookie", "SingletonSocket"];

/// 移除上次異常結束留下的 Chrome 鎖檔，回傳被移除的名稱
///
/// `SingletonLock` 是指向不存在目標的 symlink，所以用 `symlink_metadata` 判斷存在。
pub fn remove_stale_locks(profile_dir: &Path) -> Result<Vec<&'static str>> {
    let mut removed = Vec::new();
    for name in STALE_LOCKS {
        let lock_path = profile_dir.join(name);
        if std::fs::symlink_metadata(&lock_path).is_ok() {
            std::fs::remove_file(&lock_path)?;
            tracing::info!("🧹 Removed stale lock: {}", name);
            removed.push(name);
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_present_locks_only() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("SingletonCookie"), b"x").unwrap();
        std::fs::write(dir.path().join("Preferences"), b"{}").unwrap();

        let removed = remove_stale_locks(dir.path()).unwrap();

        assert_eq!(removed, vec!["SingletonCookie"]);
        assert!(!dir.path().join("SingletonCookie").exists());
        assert!(dir.path().join("Preferences").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_removes_dangling_symlink_lock() {
        let dir = TempDir::new().unwrap();
        let lock = dir.path().join("SingletonLock");
        std::os::unix::fs::symlink("host-12345", &lock).unwrap();
        assert!(!lock.exists());

        let removed = remove_stale_locks(dir.path()).unwrap();

        assert_eq!(removed, vec!["SingletonLock"]);
        assert!(std::fs::symlink_metadata(&lock).is_err());
    }

    #[test]
    fn test_missing_profile_dir_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let removed = remove_stale_locks(&dir.path().join("does-not-exist")).unwrap();
        assert!(removed.is_empty());
    }
}
