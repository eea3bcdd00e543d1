use crate::api::types::TokenId;
use crate::progression::TokenKind;

use super::token::Token;

/// Flat-Vec storage for the live token set. The cardinality is small and
/// fixed per session, and iteration order is insertion order — hit-test
/// tie-breaking depends on that staying stable, so removal never swaps.
pub struct TokenField {
    tokens: Vec<Token>,
}

impl TokenField {
    pub fn new() -> Self {
        Self {
            tokens: Vec::with_capacity(8),
        }
    }

    /// Add a token to the field.
    pub fn insert(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Remove a token by id, preserving the order of the rest.
    pub fn remove(&mut self, id: TokenId) -> Option<Token> {
        let idx = self.tokens.iter().position(|t| t.id == id)?;
        Some(self.tokens.remove(idx))
    }

    /// Swap the token with `id` for `fresh`, in place, keeping its slot in
    /// iteration order. Returns the replaced token, or None if `id` is not
    /// live.
    pub fn replace(&mut self, id: TokenId, fresh: Token) -> Option<Token> {
        let idx = self.tokens.iter().position(|t| t.id == id)?;
        Some(std::mem::replace(&mut self.tokens[idx], fresh))
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.tokens.iter_mut()
    }

    /// Kinds currently visible, for spawn-time exclusion.
    pub fn kinds_in_play(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

impl Default for TokenField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Color;

    fn token(id: u32, kind: TokenKind) -> Token {
        Token::new(TokenId(id), kind, Color::rgb(1, 2, 3))
    }

    #[test]
    fn insert_and_get() {
        let mut field = TokenField::new();
        field.insert(token(1, TokenKind::Fish));
        assert!(field.contains(TokenId(1)));
        assert_eq!(field.get(TokenId(1)).unwrap().kind, TokenKind::Fish);
    }

    #[test]
    fn remove_preserves_order() {
        let mut field = TokenField::new();
        field.insert(token(1, TokenKind::Fish));
        field.insert(token(2, TokenKind::Star));
        field.insert(token(3, TokenKind::Paw));
        field.remove(TokenId(2));
        let ids: Vec<u32> = field.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn replace_keeps_slot() {
        let mut field = TokenField::new();
        field.insert(token(1, TokenKind::Fish));
        field.insert(token(2, TokenKind::Star));
        field.insert(token(3, TokenKind::Paw));
        let old = field.replace(TokenId(2), token(9, TokenKind::Leaf)).unwrap();
        assert_eq!(old.id, TokenId(2));
        let ids: Vec<u32> = field.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 9, 3]);
    }

    #[test]
    fn replace_unknown_id_is_none() {
        let mut field = TokenField::new();
        field.insert(token(1, TokenKind::Fish));
        assert!(field.replace(TokenId(42), token(9, TokenKind::Leaf)).is_none());
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn kinds_in_play_lists_visible_kinds() {
        let mut field = TokenField::new();
        field.insert(token(1, TokenKind::Fish));
        field.insert(token(2, TokenKind::Star));
        let kinds = field.kinds_in_play();
        assert!(kinds.contains(&TokenKind::Fish));
        assert!(kinds.contains(&TokenKind::Star));
    }
}
