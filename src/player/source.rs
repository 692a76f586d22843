use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::PlayerSource;
use crate::utils::VideoPlayerError;

/// Read-only store of assets shipped with the application
pub trait AssetBundle: Send + Sync {
    /// Raw bytes of the named asset, `None` when it is not bundled
    fn load(&self, name: &str) -> Option<Vec<u8>>;
}

/// Bundle backed by a plain directory, one file per asset name
#[derive(Debug, Clone)]
pub struct DirectoryAssetBundle {
    root: PathBuf,
}

impl DirectoryAssetBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetBundle for DirectoryAssetBundle {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("Asset {:?} not readable: {}", path, e);
                None
            }
        }
    }
}

/// Turns a `PlayerSource` into something the engine can open
pub trait SourceResolver: Send + Sync {
    fn resolve(&self, source: &PlayerSource) -> Result<Url, VideoPlayerError>;
}

/// Resolves external URLs directly and local assets through an on-disk cache.
///
/// A local source is copied from the bundle into `cache_dir/<filename>.<type>`
/// the first time it is requested. Later resolutions return the cached file
/// without touching the bundle again.
pub struct AssetSourceResolver {
    assets: Arc<dyn AssetBundle>,
    cache_dir: PathBuf,
}

impl AssetSourceResolver {
    pub fn new(assets: Arc<dyn AssetBundle>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cached_path(&self, filename: &str, file_type: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", filename, file_type))
    }

    fn local_file(&self, filename: &str, file_type: &str) -> Result<Option<PathBuf>> {
        let path = self.cached_path(filename, file_type);
        if path.exists() {
            debug!("Asset cache hit for {:?}", path);
            return Ok(Some(path));
        }

        let Some(bytes) = self.assets.load(filename) else {
            return Ok(None);
        };

        fs::create_dir_all(&self.cache_dir).context("Failed to create asset cache directory")?;
        // Only complete files may appear under the final name
        let partial = path.with_extension(format!("{}.partial", file_type));
        if let Err(e) = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, &path)) {
            let _ = fs::remove_file(&partial);
            return Err(e).context("Failed to write cached asset");
        }
        info!("Cached bundled asset {} at {:?}", filename, path);
        Ok(Some(path))
    }
}

impl SourceResolver for AssetSourceResolver {
    fn resolve(&self, source: &PlayerSource) -> Result<Url, VideoPlayerError> {
        let not_found = || VideoPlayerError::SourceNotFound(source.describe());

        match source {
            PlayerSource::Local {
                filename,
                file_type,
            } => {
                let path = match self.local_file(filename, file_type) {
                    Ok(Some(path)) => path,
                    Ok(None) => {
                        warn!("Bundled asset {} is missing", source.describe());
                        return Err(not_found());
                    }
                    Err(e) => {
                        warn!("Failed to cache {}: {:#}", source.describe(), e);
                        return Err(not_found());
                    }
                };
                let path = path.canonicalize().unwrap_or(path);
                Url::from_file_path(&path).map_err(|_| not_found())
            }
            PlayerSource::External { url } => Url::parse(url).map_err(|e| {
                warn!("Invalid external URL {:?}: {}", url, e);
                not_found()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Bundle that counts how often it is read
    struct CountingBundle {
        reads: Mutex<u32>,
    }

    impl AssetBundle for CountingBundle {
        fn load(&self, name: &str) -> Option<Vec<u8>> {
            *self.reads.lock().unwrap() += 1;
            (name == "intro").then(|| b"video-bytes".to_vec())
        }
    }

    fn resolver(dir: &TempDir) -> (Arc<CountingBundle>, AssetSourceResolver) {
        let bundle = Arc::new(CountingBundle {
            reads: Mutex::new(0),
        });
        let resolver = AssetSourceResolver::new(bundle.clone(), dir.path().join("cache"));
        (bundle, resolver)
    }

    #[test]
    fn test_local_source_is_cached_once() {
        let dir = TempDir::new().unwrap();
        let (bundle, resolver) = resolver(&dir);
        let source = PlayerSource::local("intro", "mp4");

        let first = resolver.resolve(&source).unwrap();
        let second = resolver.resolve(&source).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.scheme(), "file");
        assert!(first.path().ends_with("intro.mp4"));
        assert_eq!(*bundle.reads.lock().unwrap(), 1);

        let cached = dir.path().join("cache").join("intro.mp4");
        assert_eq!(fs::read(cached).unwrap(), b"video-bytes");
    }

    #[test]
    fn test_failed_cache_write_is_not_a_cache_hit() {
        let dir = TempDir::new().unwrap();
        let (bundle, resolver) = resolver(&dir);
        let source = PlayerSource::local("intro", "mp4");
        let cache = dir.path().join("cache");

        // A directory in the way makes the write fail
        let blocker = cache.join("intro.mp4.partial");
        fs::create_dir_all(&blocker).unwrap();
        assert!(resolver.resolve(&source).is_err());
        assert!(!cache.join("intro.mp4").exists());

        fs::remove_dir(&blocker).unwrap();
        let url = resolver.resolve(&source).unwrap();
        assert!(url.path().ends_with("intro.mp4"));
        assert_eq!(*bundle.reads.lock().unwrap(), 2, "retried after the failure");
        assert_eq!(fs::read(cache.join("intro.mp4")).unwrap(), b"video-bytes");
        assert!(!blocker.exists());
    }

    #[test]
    fn test_missing_local_asset() {
        let dir = TempDir::new().unwrap();
        let (_, resolver) = resolver(&dir);

        let result = resolver.resolve(&PlayerSource::local("missing", "mp4"));
        assert_eq!(
            result,
            Err(VideoPlayerError::SourceNotFound("missing.mp4".to_string()))
        );
    }

    #[test]
    fn test_external_urls() {
        let dir = TempDir::new().unwrap();
        let (bundle, resolver) = resolver(&dir);

        let url = resolver
            .resolve(&PlayerSource::external("https://cdn.example.com/clip.m3u8"))
            .unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));

        assert!(resolver.resolve(&PlayerSource::external("")).is_err());
        assert!(resolver.resolve(&PlayerSource::external("not a url")).is_err());
        assert_eq!(*bundle.reads.lock().unwrap(), 0);
    }

    #[test]
    fn test_directory_bundle() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("clip"), b"abc").unwrap();
        let bundle = DirectoryAssetBundle::new(dir.path());

        assert_eq!(bundle.load("clip"), Some(b"abc".to_vec()));
        assert_eq!(bundle.load("other"), None);
    }
}
