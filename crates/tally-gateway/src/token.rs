use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;

/// The opaque upstream credential, persisted as a single plain-text file.
/// The token value itself is never logged.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The stored token, trimmed. None when the file is absent, unreadable
    /// or blank.
    pub fn load(&self) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "token file unreadable");
                return None;
            }
        };
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        Some(token.to_string())
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> TokenStore {
        let path = std::env::temp_dir().join(format!(
            "tally-token-{}-{}.txt",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        TokenStore::new(path)
    }

    #[test]
    fn missing_file_is_none() {
        assert!(temp_store("absent").load().is_none());
    }

    #[test]
    fn save_then_load_trims_whitespace() {
        let store = temp_store("roundtrip");
        store.save("  secret-token\n").unwrap();
        assert_eq!(store.load().as_deref(), Some("secret-token"));
        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn blank_file_is_none() {
        let store = temp_store("blank");
        store.save("   \n").unwrap();
        assert!(store.load().is_none());
        let _ = fs::remove_file(&store.path);
    }
}
