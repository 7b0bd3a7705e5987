//! Nickname validation utilities.
//!
//! Nicknames match `^[A-Za-z\[\]\\`_^{|}][A-Za-z0-9\[\]\\`_^{|}-]{0,50}$`: a
//! restricted first character followed by up to 50 more characters that may
//! also include digits and a hyphen.

/// Extension trait for checking if a string is a valid IRC nickname.
pub trait NickExt {
    /// Check if this string is a valid IRC nickname.
    ///
    /// ```
    /// use slirc_proto::NickExt;
    ///
    /// assert!("nick".is_valid_nick());
    /// assert!("Nick123".is_valid_nick());
    /// assert!("[cool]".is_valid_nick());
    /// assert!("_under_".is_valid_nick());
    ///
    /// assert!(!"123nick".is_valid_nick());
    /// assert!(!"".is_valid_nick());
    /// assert!(!"nick name".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;
}

/// Maximum nickname length (1 leading character plus up to 50 more).
pub const MAX_NICK_LEN: usize = 51;

/// The punctuation characters allowed anywhere in a nickname: `[ ] \ ` _ ^ { | }`.
#[inline]
fn is_special(c: char) -> bool {
    matches!(
        c,
        '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}'
    )
}

#[inline]
fn is_rest_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special(c) || c == '-'
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        if self.is_empty() || self.len() > MAX_NICK_LEN {
            return false;
        }
        let mut chars = self.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || is_special(c) => {}
            _ => return false,
        }
        chars.all(is_rest_char)
    }
}

impl NickExt for String {
    fn is_valid_nick(&self) -> bool {
        self.as_str().is_valid_nick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_nicks() {
        assert!("nick".is_valid_nick());
        assert!("Nick".is_valid_nick());
        assert!("nick123".is_valid_nick());
        assert!("nick-name".is_valid_nick());
        assert!("[nick]".is_valid_nick());
        assert!("nick\\test".is_valid_nick());
        assert!("_nick_".is_valid_nick());
        assert!("^nick^".is_valid_nick());
        assert!("{nick|}".is_valid_nick());
        assert!("`nick`".is_valid_nick());
    }

    #[test]
    fn invalid_nicks() {
        assert!(!"".is_valid_nick());
        assert!(!"123nick".is_valid_nick());
        assert!(!"nick name".is_valid_nick());
        assert!(!"-nick".is_valid_nick());
        assert!(!"nick@host".is_valid_nick());
        assert!(!"nick!user".is_valid_nick());
    }

    #[test]
    fn length_limit() {
        let max_nick = "a".repeat(51);
        assert!(max_nick.is_valid_nick());
        let too_long = "a".repeat(52);
        assert!(!too_long.is_valid_nick());
    }
}
