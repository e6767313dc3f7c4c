use std::collections::HashMap;

const SERVICE_NAME: &str = "glean";
const KEYRING_SERVER: &str = "chat-completions";

/// Environment override, checked before the keyring.
pub const API_KEY_ENV: &str = "GLEAN_API_KEY";

fn key_attributes() -> HashMap<&'static str, &'static str> {
    HashMap::from([("service", SERVICE_NAME), ("server", KEYRING_SERVER)])
}

async fn open_keyring() -> Result<oo7::Keyring, String> {
    oo7::Keyring::new()
        .await
        .map_err(|e| format!("Failed to connect to keyring: {}", e))
}

/// Store the chat-completion API key, replacing any previous one.
pub async fn store_api_key(key: &str) -> Result<(), String> {
    open_keyring()
        .await?
        .create_item("Glean API Key", &key_attributes(), key.trim().as_bytes(), true)
        .await
        .map_err(|e| format!("Failed to store API key: {}", e))
}

/// The stored API key, if there is a non-empty one.
pub async fn load_api_key() -> Result<Option<String>, String> {
    let keyring = open_keyring().await?;
    let items = keyring
        .search_items(&key_attributes())
        .await
        .map_err(|e| format!("Failed to search keyring: {}", e))?;

    let Some(item) = items.first() else {
        return Ok(None);
    };
    let secret = item
        .secret()
        .await
        .map_err(|e| format!("Failed to read secret: {}", e))?;
    let key = std::str::from_utf8(&secret)
        .map_err(|e| format!("API key in keyring is not UTF-8: {}", e))?
        .trim()
        .to_string();

    Ok(Some(key).filter(|k| !k.is_empty()))
}

/// The key to use for a request: `GLEAN_API_KEY` if set, else the keyring.
///
/// Keyring failures are logged and treated as "no key".
pub async fn resolve_api_key() -> Option<String> {
    if let Some(key) = env_api_key() {
        return Some(key);
    }
    match load_api_key().await {
        Ok(key) => key,
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_filed_under_service_and_server() {
        let attrs = key_attributes();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["service"], "glean");
        assert_eq!(attrs["server"], "chat-completions");
    }
}
