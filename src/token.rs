//! Tokens naming the dependencies held by an injector chain.

use std::borrow::Cow;
use std::fmt;

/// Display name of [`TARGET_TOKEN`].
pub const TARGET_TOKEN_NAME: &str = "$target";
/// Display name of [`INJECTOR_TOKEN`].
pub const INJECTOR_TOKEN_NAME: &str = "$injector";

/// Identifier of a dependency.
///
/// Most tokens are plain names. Two reserved tokens are understood by the
/// injection invoker instead of being looked up in the chain:
///
/// - [`Token::Target`] supplies the class or function that required the
///   current one (absent at the top level).
/// - [`Token::Injector`] supplies the injector performing the injection.
///
/// # Examples
///
/// ```rust
/// use chain_di::{Token, INJECTOR_TOKEN, TARGET_TOKEN};
///
/// const LOGGER: Token = Token::new("logger");
///
/// assert_eq!(LOGGER.name(), "logger");
/// assert_eq!(Token::from("logger"), LOGGER);
/// assert_eq!(Token::from("$injector"), INJECTOR_TOKEN);
/// assert_eq!(TARGET_TOKEN.to_string(), "$target");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    /// A user-defined dependency name.
    Named(Cow<'static, str>),
    /// The class or function currently being injected into.
    Target,
    /// The injector performing the injection.
    Injector,
}

/// Reserved token resolving to the enclosing target.
pub const TARGET_TOKEN: Token = Token::Target;
/// Reserved token resolving to the injector itself.
pub const INJECTOR_TOKEN: Token = Token::Injector;

impl Token {
    /// Creates a named token. Usable in `const` position.
    pub const fn new(name: &'static str) -> Self {
        Token::Named(Cow::Borrowed(name))
    }

    /// Returns the name used in messages.
    pub fn name(&self) -> &str {
        match self {
            Token::Named(name) => name,
            Token::Target => TARGET_TOKEN_NAME,
            Token::Injector => INJECTOR_TOKEN_NAME,
        }
    }

    /// Whether the token is one of the two reserved tokens.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Token::Named(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn from_name(name: Cow<'static, str>) -> Token {
    match name.as_ref() {
        TARGET_TOKEN_NAME => Token::Target,
        INJECTOR_TOKEN_NAME => Token::Injector,
        _ => Token::Named(name),
    }
}

impl From<&'static str> for Token {
    fn from(name: &'static str) -> Self {
        from_name(Cow::Borrowed(name))
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        from_name(Cow::Owned(name))
    }
}

impl From<&Token> for Token {
    fn from(token: &Token) -> Self {
        token.clone()
    }
}
