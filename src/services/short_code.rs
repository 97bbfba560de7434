use crate::error::{AppError, AppResult};
use crate::models::{NewUrl, UrlEntry};
use crate::store::UrlStore;

/// Character set for generating short codes.
const ALPHABET_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Top-level path segments a short code must never shadow.
pub const RESERVED_CODES: &[&str] = &[
    "login", "register", "profile", "urls", "logs", "status", "_health",
];

/// Longest path segment the redirect route will look up.
const MAX_CODE_LENGTH: usize = 32;

/// Produces short codes and allocates them against a [`UrlStore`].
#[derive(Debug, Clone, Copy)]
pub struct ShortCodeGenerator {
    length: usize,
    max_attempts: u32,
}

impl ShortCodeGenerator {
    pub fn new(length: usize, max_attempts: u32) -> Self {
        Self {
            length,
            max_attempts,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// A fresh candidate. Nothing is checked or written.
    pub fn generate(&self) -> String {
        let length = self.length;
        nanoid::nanoid!(length, ALPHABET_CHARS)
    }

    pub fn is_reserved(code: &str) -> bool {
        RESERVED_CODES.contains(&code)
    }

    /// Whether `code` could have come out of the alphabet at all.
    pub fn is_well_formed(code: &str) -> bool {
        (1..=MAX_CODE_LENGTH).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Insert `original_url` under a newly allocated short code.
    ///
    /// Every candidate is checked against reserved route segments and the
    /// store (active and inactive rows alike) before insert. A unique
    /// constraint violation on insert means a concurrent request took the
    /// code first; that attempt counts as a collision.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShortCodeGenerationFailed` once `max_attempts`
    /// candidates have collided. Store errors are returned as-is.
    pub async fn create_url(
        &self,
        store: &dyn UrlStore,
        original_url: String,
        user_id: Option<i64>,
    ) -> AppResult<UrlEntry> {
        for attempt in 1..=self.max_attempts {
            let code = self.generate();

            if Self::is_reserved(&code) || store.short_code_exists(&code).await? {
                tracing::debug!(attempt, short_code = %code, "Short code collision");
                continue;
            }

            let new_url = NewUrl {
                short_code: code,
                original_url: original_url.clone(),
                user_id,
            };

            match store.insert_url(new_url).await {
                Ok(entry) => return Ok(entry),
                Err(AppError::ShortCodeExists(code)) => {
                    tracing::warn!(attempt, short_code = %code, "Short code taken concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            length = self.length,
            "Exhausted short code attempts"
        );
        Err(AppError::ShortCodeGenerationFailed {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockUrlStore;
    use chrono::Utc;
    use mockall::Sequence;
    use std::collections::HashSet;

    fn stored(new_url: NewUrl) -> UrlEntry {
        UrlEntry {
            id: 1,
            short_code: new_url.short_code,
            original_url: new_url.original_url,
            user_id: new_url.user_id,
            click_count: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_alphabet_chars_const() {
        assert_eq!(ALPHABET_CHARS.len(), 62);
        let unique: HashSet<_> = ALPHABET_CHARS.iter().collect();
        assert_eq!(unique.len(), ALPHABET_CHARS.len());
    }

    #[test]
    fn test_generated_codes_distinct_and_well_formed() {
        let generator = ShortCodeGenerator::new(6, 10);
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(codes.len(), 1000);
        for code in &codes {
            assert_eq!(code.chars().count(), 6);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_reserved_codes() {
        assert!(ShortCodeGenerator::is_reserved("login"));
        assert!(ShortCodeGenerator::is_reserved("_health"));
        assert!(!ShortCodeGenerator::is_reserved("Login"));
    }

    #[test]
    fn test_well_formed_codes() {
        assert!(ShortCodeGenerator::is_well_formed("aB3xY9"));
        assert!(ShortCodeGenerator::is_well_formed(&"a".repeat(32)));
        assert!(!ShortCodeGenerator::is_well_formed(""));
        assert!(!ShortCodeGenerator::is_well_formed(&"a".repeat(33)));
        assert!(!ShortCodeGenerator::is_well_formed("abc-12"));
        assert!(!ShortCodeGenerator::is_well_formed("ab%20c"));
        assert!(!ShortCodeGenerator::is_well_formed("caf\u{e9}"));
    }

    #[tokio::test]
    async fn test_create_url_on_empty_store() {
        let mut store = MockUrlStore::new();
        store.expect_short_code_exists().times(1).returning(|_| Ok(false));
        store
            .expect_insert_url()
            .times(1)
            .returning(|new_url| Ok(stored(new_url)));

        let entry = ShortCodeGenerator::new(8, 10)
            .create_url(&store, "https://example.com".to_string(), Some(7))
            .await
            .unwrap();

        assert_eq!(entry.short_code.len(), 8);
        assert_eq!(entry.user_id, Some(7));
        assert_eq!(entry.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_colliding_candidate_is_discarded() {
        let mut store = MockUrlStore::new();
        let mut seq = Sequence::new();
        let taken = std::sync::Arc::new(std::sync::Mutex::new(String::new()));

        let first = taken.clone();
        store
            .expect_short_code_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |code| {
                *first.lock().unwrap() = code.to_string();
                Ok(true)
            });
        store
            .expect_short_code_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        store
            .expect_insert_url()
            .times(1)
            .returning(|new_url| Ok(stored(new_url)));

        let entry = ShortCodeGenerator::new(6, 10)
            .create_url(&store, "https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_ne!(entry.short_code, *taken.lock().unwrap());
    }

    #[tokio::test]
    async fn test_insert_conflict_is_retried() {
        let mut store = MockUrlStore::new();
        let mut seq = Sequence::new();
        store.expect_short_code_exists().times(2).returning(|_| Ok(false));
        store
            .expect_insert_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_url| Err(AppError::ShortCodeExists(new_url.short_code)));
        store
            .expect_insert_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_url| Ok(stored(new_url)));

        let entry = ShortCodeGenerator::new(6, 10)
            .create_url(&store, "https://example.com".to_string(), None)
            .await;

        assert!(entry.is_ok());
    }

    #[tokio::test]
    async fn test_exhaustion_fails_closed() {
        let mut store = MockUrlStore::new();
        store.expect_short_code_exists().times(3).returning(|_| Ok(true));
        store.expect_insert_url().never();

        let err = ShortCodeGenerator::new(6, 3)
            .create_url(&store, "https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ShortCodeGenerationFailed { attempts: 3 }));
    }

    /// Every single-character code except `free`, as held by inactive rows.
    fn held_by_inactive_rows(free: Option<char>) -> HashSet<String> {
        ALPHABET_CHARS
            .iter()
            .filter(|c| Some(**c) != free)
            .map(|c| c.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_inactive_codes_are_never_reissued() {
        let held = held_by_inactive_rows(Some('Z'));
        let mut store = MockUrlStore::new();
        store
            .expect_short_code_exists()
            .returning(move |code| Ok(held.contains(code)));
        store
            .expect_insert_url()
            .times(1)
            .returning(|new_url| Ok(stored(new_url)));

        let entry = ShortCodeGenerator::new(1, 2000)
            .create_url(&store, "https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(entry.short_code, "Z");
    }

    #[tokio::test]
    async fn test_code_space_held_by_inactive_rows_is_exhausted() {
        let held = held_by_inactive_rows(None);
        let mut store = MockUrlStore::new();
        store
            .expect_short_code_exists()
            .times(50)
            .returning(move |code| Ok(held.contains(code)));
        store.expect_insert_url().never();

        let err = ShortCodeGenerator::new(1, 50)
            .create_url(&store, "https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ShortCodeGenerationFailed { attempts: 50 }));
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut store = MockUrlStore::new();
        store
            .expect_short_code_exists()
            .times(1)
            .returning(|_| Err(AppError::Internal("down".to_string())));
        store.expect_insert_url().never();

        let err = ShortCodeGenerator::new(6, 10)
            .create_url(&store, "https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}
