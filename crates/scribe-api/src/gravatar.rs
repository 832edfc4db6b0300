use sha2::{Digest, Sha256};

const SIZE: u32 = 100;
const RATING: &str = "g";
const DEFAULT_IMAGE: &str = "retro";

/// Avatar for a commenter. Gravatar accepts SHA-256 hashes of the trimmed,
/// lowercased address.
pub fn avatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s={}&d={}&r={}",
        hex::encode(digest),
        SIZE,
        DEFAULT_IMAGE,
        RATING
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_normalized_before_hashing() {
        assert_eq!(avatar_url("  Marco@Example.COM "), avatar_url("marco@example.com"));
    }

    #[test]
    fn url_carries_hash_and_options() {
        let url = avatar_url("marco@example.com");
        let hash = url
            .strip_prefix("https://www.gravatar.com/avatar/")
            .and_then(|rest| rest.split('?').next())
            .unwrap();
        assert_eq!(hash.len(), 64);
        assert!(url.ends_with("?s=100&d=retro&r=g"));
    }
}
