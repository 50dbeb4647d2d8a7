// Gravatar URL construction. Nothing is fetched; the URL is only built.

use md5::{Digest, Md5};

use crate::config::AvatarConfig;

const GRAVATAR_BASE: &str = "//www.gravatar.com/avatar";

/// Builds the avatar URL for `email`.
///
/// Gravatar keys images by the MD5 of the trimmed, lower-cased address, so
/// the same email always maps to the same protocol-relative URL.
pub fn gravatar_url(email: &str, options: &AvatarConfig) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Md5::digest(normalized.as_bytes());

    format!(
        "{}/{:x}?s={}&r={}&d={}",
        GRAVATAR_BASE, digest, options.size, options.rating, options.default_image
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_size_rating_and_default() {
        let url = gravatar_url("ann@x.com", &AvatarConfig::default());
        assert!(url.starts_with("//www.gravatar.com/avatar/"));
        assert!(url.ends_with("?s=200&r=pg&d=mm"));
    }

    #[test]
    fn known_address_maps_to_known_url() {
        assert_eq!(
            gravatar_url("ann@x.com", &AvatarConfig::default()),
            "//www.gravatar.com/avatar/0530e08f7da74c378704ddaaf7adca72?s=200&r=pg&d=mm"
        );
    }

    #[test]
    fn hash_is_hex_md5_of_normalized_email() {
        let url = gravatar_url("  Ann@X.com ", &AvatarConfig::default());
        let hash = url
            .trim_start_matches("//www.gravatar.com/avatar/")
            .split('?')
            .next()
            .unwrap();

        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(url, gravatar_url("ann@x.com", &AvatarConfig::default()));
    }

    #[test]
    fn different_emails_get_different_urls() {
        let options = AvatarConfig::default();
        assert_ne!(gravatar_url("a@x.com", &options), gravatar_url("b@x.com", &options));
    }

    #[test]
    fn respects_custom_options() {
        let options = AvatarConfig {
            size: 80,
            rating: "g".to_string(),
            default_image: "identicon".to_string(),
        };
        assert!(gravatar_url("a@x.com", &options).ends_with("?s=80&r=g&d=identicon"));
    }
}
