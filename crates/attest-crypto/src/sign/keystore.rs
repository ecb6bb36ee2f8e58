use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::errors::CryptoError;

use super::policy::KeyPolicy;

#[derive(Clone)]
pub struct SigningKeyMaterial {
    pub kid: u64,
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
    pub policy: KeyPolicy,
}

#[derive(Clone)]
pub struct VerifyKeyMaterial {
    pub kid: u64,
    pub verifying_key: VerifyingKey,
    pub policy: KeyPolicy,
}

/// Holds zero or more `kid -> VerifyingKey` entries plus exactly one active
/// signing kid. Rotation appends a new kid and flips the active pointer
/// under a write lock; retired kids stay valid for verification until
/// explicitly marked `compromised`.
pub trait KeyTable: Clone + Send + Sync {
    fn current_signing_key(&self) -> Result<SigningKeyMaterial, CryptoError>;
    fn key_for_verification(&self, kid: u64) -> Result<VerifyKeyMaterial, CryptoError>;
    fn current_kid(&self) -> u64;
    fn rotate(&self) -> Result<u64, CryptoError>;
    fn retire(&self, kid: u64);
    fn mark_compromised(&self, kid: u64);
}

#[derive(Clone)]
pub struct MemoryKeyTable {
    state: Arc<RwLock<KeyTableState>>,
}

impl MemoryKeyTable {
    pub fn generate() -> Self {
        let (kid, entry) = generate_entry(1);
        let mut keys = HashMap::new();
        keys.insert(kid, entry);
        MemoryKeyTable {
            state: Arc::new(RwLock::new(KeyTableState {
                keys,
                current: kid,
                next_kid: kid + 1,
            })),
        }
    }

    /// Loads a fixed keypair (production mode: `ED25519_SK_B64`/`ED25519_VK_B64`).
    /// The loaded key becomes `kid = 1`; rotation still allocates fresh kids on top.
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        let kid = 1;
        let entry = KeyEntry {
            secret: Zeroizing::new(signing_key.to_bytes()),
            verifying_key,
            policy: KeyPolicy::new(kid, now_ms()),
        };
        let mut keys = HashMap::new();
        keys.insert(kid, entry);
        MemoryKeyTable {
            state: Arc::new(RwLock::new(KeyTableState {
                keys,
                current: kid,
                next_kid: kid + 1,
            })),
        }
    }

    /// Startup key lifecycle: load 32 raw signing-key bytes from `path`. If
    /// the file is absent and `allow_generate` is set (development mode
    /// only), a fresh key is generated and persisted to `path` with file
    /// mode `0600`. In any other mode a missing file is `CONFIG_MISSING`.
    pub fn load_or_generate(path: &Path, allow_generate: bool) -> Result<Self, CryptoError> {
        match std::fs::read(path) {
            Ok(bytes) => {
                let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
                    CryptoError::config_missing(&format!(
                        "signing key file {} must contain exactly 32 bytes",
                        path.display()
                    ))
                })?;
                let signing_key = SigningKey::from_bytes(&bytes);
                Ok(Self::from_signing_key(signing_key))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if !allow_generate {
                    return Err(CryptoError::config_missing(&format!(
                        "signing key file {} is missing and ENV does not permit ephemeral key generation",
                        path.display()
                    )));
                }
                let mut rng = OsRng;
                let signing_key = SigningKey::generate(&mut rng);
                persist_key_file(path, &signing_key.to_bytes())?;
                Ok(Self::from_signing_key(signing_key))
            }
            Err(err) => Err(CryptoError::keystore_unavailable(&format!(
                "failed to read signing key file {}: {err}",
                path.display()
            ))),
        }
    }

    fn entry(&self, kid: u64) -> Option<KeyEntry> {
        self.state
            .read()
            .ok()
            .and_then(|guard| guard.keys.get(&kid).cloned())
    }
}

impl KeyTable for MemoryKeyTable {
    fn current_signing_key(&self) -> Result<SigningKeyMaterial, CryptoError> {
        let entry = {
            let guard = self
                .state
                .read()
                .map_err(|_| CryptoError::keystore_unavailable("keystore lock poisoned"))?;
            let current = guard.current;
            guard.keys.get(&current).cloned().map(|e| (current, e))
        }
        .ok_or_else(|| CryptoError::keystore_unavailable("current signing key missing"))?;

        let (kid, KeyEntry {
            secret,
            verifying_key,
            policy,
        }) = entry;
        policy.is_active()?;
        let signing_key = SigningKey::from_bytes(&secret);
        Ok(SigningKeyMaterial {
            kid,
            signing_key,
            verifying_key,
            policy,
        })
    }

    fn current_kid(&self) -> u64 {
        self.state.read().expect("keystore lock poisoned").current
    }

    fn key_for_verification(&self, kid: u64) -> Result<VerifyKeyMaterial, CryptoError> {
        let entry = self
            .entry(kid)
            .ok_or_else(|| CryptoError::keystore_forbidden(&format!("kid {kid} not found")))?;
        let KeyEntry {
            secret: _,
            verifying_key,
            policy,
        } = entry;
        policy.is_active()?;
        Ok(VerifyKeyMaterial {
            kid,
            verifying_key,
            policy,
        })
    }

    fn rotate(&self) -> Result<u64, CryptoError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| CryptoError::keystore_unavailable("keystore lock poisoned"))?;
        let (kid, entry) = generate_entry(guard.next_kid);
        guard.keys.insert(kid, entry);
        guard.current = kid;
        guard.next_kid = kid + 1;
        Ok(kid)
    }

    fn retire(&self, kid: u64) {
        if let Ok(mut guard) = self.state.write() {
            if let Some(entry) = guard.keys.get_mut(&kid) {
                entry.policy.revoked = true;
            }
        }
    }

    fn mark_compromised(&self, kid: u64) {
        if let Ok(mut guard) = self.state.write() {
            if let Some(entry) = guard.keys.get_mut(&kid) {
                entry.policy.compromised = true;
            }
        }
    }
}

#[derive(Clone)]
struct KeyEntry {
    secret: Zeroizing<[u8; 32]>,
    verifying_key: VerifyingKey,
    policy: KeyPolicy,
}

struct KeyTableState {
    keys: HashMap<u64, KeyEntry>,
    current: u64,
    next_kid: u64,
}

fn generate_entry(kid: u64) -> (u64, KeyEntry) {
    let mut rng = OsRng;
    let signing = SigningKey::generate(&mut rng);
    let verifying = signing.verifying_key();
    let secret = Zeroizing::new(signing.to_bytes());
    (
        kid,
        KeyEntry {
            secret,
            verifying_key: verifying,
            policy: KeyPolicy::new(kid, now_ms()),
        },
    )
}

/// Writes a fresh signing key to `path` with mode `0600`, via a temp-file
/// + rename so a crash mid-write never leaves a partial key on disk.
fn persist_key_file(path: &Path, bytes: &[u8; 32]) -> Result<(), CryptoError> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                CryptoError::keystore_unavailable(&format!("failed to create key directory: {err}"))
            })?;
        }
    }

    let mut temp_path = path.to_path_buf();
    let mut file_name = temp_path.file_name().unwrap_or_default().to_os_string();
    file_name.push(".tmp");
    temp_path.set_file_name(file_name);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&temp_path)
            .map_err(|err| CryptoError::keystore_unavailable(&format!("failed to open key file: {err}")))?;
        file.write_all(bytes)
            .map_err(|err| CryptoError::keystore_unavailable(&format!("failed to write key file: {err}")))?;
        file.sync_all().ok();
    }
    #[cfg(not(unix))]
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|err| CryptoError::keystore_unavailable(&format!("failed to open key file: {err}")))?;
        file.write_all(bytes)
            .map_err(|err| CryptoError::keystore_unavailable(&format!("failed to write key file: {err}")))?;
    }

    std::fs::rename(&temp_path, path)
        .map_err(|err| CryptoError::keystore_unavailable(&format!("failed to persist key file: {err}")))?;
    Ok(())
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as i64
}
