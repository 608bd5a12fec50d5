use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use mog_types::Token;

use crate::error::{RegistryError, Result};

/// Issues session tokens and remembers every token ever issued.
///
/// Tokens are retired, not recycled: a released pipeline's token stays in
/// the issued set so no later pipeline can collide with it. The set grows
/// by one entry per pipeline for the life of the process.
#[derive(Debug, Default)]
pub struct TokenStore {
    issued: Mutex<HashSet<Token>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn issued(&self) -> MutexGuard<'_, HashSet<Token>> {
        self.issued.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn issue_token(&self) -> Result<Token> {
        let token = Token::generate();
        if !self.issued().insert(token.clone()) {
            return Err(RegistryError::Internal(format!("token collision: {token:?}")));
        }
        Ok(token)
    }

    /// Take back a token whose pipeline was never created.
    ///
    /// Only valid before the token has been handed to a client.
    pub fn withdraw(&self, token: &Token) -> bool {
        self.issued().remove(token)
    }

    pub fn was_issued(&self, token: &Token) -> bool {
        self.issued().contains(token)
    }

    pub fn issued_count(&self) -> usize {
        self.issued().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_distinct_tokens() {
        let store = TokenStore::new();
        let a = store.issue_token().unwrap();
        let b = store.issue_token().unwrap();
        assert_ne!(a, b);
        assert!(store.was_issued(&a));
        assert!(store.was_issued(&b));
        assert_eq!(store.issued_count(), 2);
    }

    #[test]
    fn foreign_token_not_issued() {
        let store = TokenStore::new();
        assert!(!store.was_issued(&Token::from_raw("nope")));
    }

    #[test]
    fn withdrawn_token_is_forgotten() {
        let store = TokenStore::new();
        let a = store.issue_token().unwrap();
        assert!(store.withdraw(&a));
        assert!(!store.was_issued(&a));
        assert!(!store.withdraw(&a));
        assert_eq!(store.issued_count(), 0);
    }
}
