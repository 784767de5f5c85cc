//! Client identity — the anonymous user id the service keys workspaces on.
//!
//! Reads/writes ~/.config/gridlink/identity.json (0600 on Unix). The id has
//! the same shape the web page stored in browser localStorage
//! (`user_<unix-millis>_<9 base-36 chars>`): generated once, reused forever.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Locally persisted identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

/// Returns the path to the identity file.
pub fn identity_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("gridlink/identity.json"))
}

/// Load the saved identity from disk.
/// Returns None if nothing is saved or the file is invalid.
pub fn load_identity() -> Option<Identity> {
    let path = identity_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save the identity to disk.
/// Creates the parent directory if it doesn't exist. Sets 0600 on Unix.
pub fn save_identity(identity: &Identity) -> Result<(), String> {
    let path = identity_file_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(identity)
        .map_err(|e| format!("Failed to serialize identity: {}", e))?;

    std::fs::write(&path, &contents).map_err(|e| format!("Failed to write identity file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Load the saved identity, generating and persisting one on first run.
pub fn load_or_create_identity() -> Result<Identity, String> {
    if let Some(identity) = load_identity() {
        return Ok(identity);
    }
    let identity = Identity {
        user_id: generate_user_id(),
    };
    save_identity(&identity)?;
    Ok(identity)
}

/// `user_<unix-millis>_<9 base-36 chars>`.
fn generate_user_id() -> String {
    format!("user_{}_{}", chrono::Utc::now().timestamp_millis(), base36_suffix(9))
}

fn base36_suffix(len: usize) -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_user_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "user");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_user_id(), generate_user_id());
    }

    #[test]
    fn test_identity_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        // Write and read manually since save_identity uses the real config path
        let identity = Identity {
            user_id: "user_1700000000000_k3j9x1mzq".into(),
        };
        let json = serde_json::to_string_pretty(&identity).unwrap();
        std::fs::write(&path, &json).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: Identity = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded.user_id, "user_1700000000000_k3j9x1mzq");
    }

    #[test]
    fn test_identity_file_path_exists() {
        let path = identity_file_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("gridlink"));
        assert!(path.to_string_lossy().contains("identity.json"));
    }
}
