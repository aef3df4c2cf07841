use crate::errors::ConfigError;
use mirrordna_canonical::{digest_value, digests_match, ChecksumError, DigestAlg, Timestamp};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

const CHECKSUM_SUFFIX: &str = ".checksum";
const NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]*$";

/// Contents of a `<name>.checksum.json` sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChecksum {
    /// Hash algorithm name (always `sha256` when written by this store).
    pub algorithm: String,
    /// Hex digest of the configuration's canonical form.
    pub hash: String,
    /// Caller-supplied configuration version.
    pub version: String,
    /// When the checksum was written.
    pub created_at: String,
}

/// Summary of one stored configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigListing {
    /// Path of the configuration file.
    pub file: PathBuf,
    /// Whether a checksum sidecar exists.
    pub has_checksum: bool,
    /// Version from the sidecar.
    pub version: Option<String>,
    /// Creation time from the sidecar.
    pub created_at: Option<String>,
}

/// Options for [`ChecksummedConfigStore::load_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Verify the configuration against its checksum (default: true).
    pub verify: bool,
    /// Serve from and populate the cache (default: true).
    pub use_cache: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verify: true,
            use_cache: true,
        }
    }
}

/// The default store location, `~/.mirrordna/config`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".mirrordna").join("config"))
        .ok_or(ConfigError::NoHomeDir)
}

/// Directory of checksummed JSON configurations with a read-through cache.
///
/// The cache belongs to this instance only. Operations that touch it take
/// `&mut self`; share a store across threads only behind external locking.
#[derive(Debug)]
pub struct ChecksummedConfigStore {
    dir: PathBuf,
    cache: HashMap<String, Value>,
    allowed: Option<BTreeSet<String>>,
}

impl ChecksummedConfigStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ConfigError::from_io(&dir, e))?;
        Ok(Self {
            dir,
            cache: HashMap::new(),
            allowed: None,
        })
    }

    /// Opens the store at [`default_config_dir`].
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(default_config_dir()?)
    }

    /// Restricts loading to the given names and forces verification on.
    pub fn with_allowed_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// The store's root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the configuration file for `name`.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Path of the checksum sidecar for `name`.
    pub fn checksum_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", name, CHECKSUM_SUFFIX))
    }

    /// Writes a configuration and its checksum sidecar, overwriting both.
    pub fn save_config(
        &mut self,
        name: &str,
        config: &Value,
        version: &str,
    ) -> Result<ConfigChecksum, ConfigError> {
        validate_name(name)?;
        let checksum = ConfigChecksum {
            algorithm: DigestAlg::Sha256.as_str().to_string(),
            hash: digest_value(config)
                .map_err(ChecksumError::from)?
                .to_string(),
            version: version.to_string(),
            created_at: Timestamp::now().to_string(),
        };

        write_json(&self.config_path(name), config)?;
        write_json(&self.checksum_path(name), &checksum)?;
        self.cache.remove(name);
        tracing::debug!(name, hash = %checksum.hash, version, "saved config");
        Ok(checksum)
    }

    /// Loads a configuration.
    ///
    /// With `use_cache`, a cached value is returned without touching disk and a
    /// successful load is cached; without it, any cached entry for `name` is
    /// evicted. With `verify` (always on for allow-listed stores), a missing
    /// sidecar is [`ConfigError::NotFound`] and a mismatch is
    /// [`ConfigError::Integrity`].
    pub fn load_config(&mut self, name: &str, options: LoadOptions) -> Result<Value, ConfigError> {
        validate_name(name)?;
        let verify = self.check_allowed(name)? || options.verify;

        if options.use_cache {
            if let Some(config) = self.cache.get(name) {
                tracing::debug!(name, "config cache hit");
                return Ok(config.clone());
            }
        } else {
            self.cache.remove(name);
        }

        let config = self.read_config(name, verify)?;
        if options.use_cache {
            self.cache.insert(name.to_string(), config.clone());
        }
        Ok(config)
    }

    /// Reads the checksum sidecar for `name`, if present.
    pub fn checksum_info(&self, name: &str) -> Result<Option<ConfigChecksum>, ConfigError> {
        validate_name(name)?;
        let path = self.checksum_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| ConfigError::Parse { path, source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::from_io(path, e)),
        }
    }

    /// Returns true if `name` loads and verifies. Never reads from or writes to the cache.
    pub fn verify_integrity(&self, name: &str) -> bool {
        let result = validate_name(name)
            .and_then(|_| self.check_allowed(name))
            .and_then(|_| self.read_config(name, true));
        match result {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(name, error = %err, "config integrity check failed");
                false
            }
        }
    }

    /// Lists stored configurations (sidecars excluded), keyed by name.
    pub fn list_configs(&self) -> Result<BTreeMap<String, ConfigListing>, ConfigError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| ConfigError::from_io(&self.dir, e))?;
        let mut configs = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::from_io(&self.dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if name.ends_with(CHECKSUM_SUFFIX) || validate_name(name).is_err() {
                continue;
            }

            let checksum = self.checksum_info(name)?;
            configs.insert(
                name.to_string(),
                ConfigListing {
                    file: path.clone(),
                    has_checksum: checksum.is_some(),
                    version: checksum.as_ref().map(|c| c.version.clone()),
                    created_at: checksum.map(|c| c.created_at),
                },
            );
        }
        Ok(configs)
    }

    /// Drops one cached entry, or the whole cache when `name` is `None`.
    pub fn clear_cache(&mut self, name: Option<&str>) {
        match name {
            Some(name) => {
                self.cache.remove(name);
            }
            None => self.cache.clear(),
        }
    }

    /// Whether `name` is currently cached.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    // Returns whether verification is forced.
    fn check_allowed(&self, name: &str) -> Result<bool, ConfigError> {
        match &self.allowed {
            Some(allowed) if !allowed.contains(name) => Err(ConfigError::NotAllowed(name.to_string())),
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    fn read_config(&self, name: &str, verify: bool) -> Result<Value, ConfigError> {
        let path = self.config_path(name);
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::from_io(&path, e))?;
        let config: Value =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;

        if verify {
            let checksum = self
                .checksum_info(name)?
                .ok_or_else(|| ConfigError::NotFound(self.checksum_path(name)))?;
            if checksum.algorithm != DigestAlg::Sha256.as_str() {
                return Err(ConfigError::UnsupportedAlgorithm(checksum.algorithm));
            }
            let actual = digest_value(&config).map_err(ChecksumError::from)?;
            if !digests_match(actual.as_str(), &checksum.hash) {
                tracing::warn!(name, expected = %checksum.hash, actual = %actual, "config checksum mismatch");
                return Err(ConfigError::Integrity {
                    name: name.to_string(),
                    expected: checksum.hash,
                    actual: actual.to_string(),
                });
            }
        }
        tracing::debug!(name, verify, "loaded config");
        Ok(config)
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    let re = Regex::new(NAME_PATTERN).expect("invalid regex");
    if !re.is_match(name) || name.ends_with(CHECKSUM_SUFFIX) {
        return Err(ConfigError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|e| ConfigError::from_io(path, e))
}
