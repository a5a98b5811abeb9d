//! Resolves an injectable's declared tokens and calls it.

use crate::error::{DiError, DiResult};
use crate::injectable::{Argument, Arguments, Injectable, TargetRef};
use crate::token::Token;

use super::Injector;

/// Invokes `injectable` with arguments resolved against `injector`.
///
/// `enclosing` is what `TARGET_TOKEN` yields: the injectable that required this
/// one, or `None` for a top-level injection. Any failure is reported as an
/// injection error naming `injectable`.
pub(super) fn invoke<T>(injector: &Injector, injectable: &Injectable<T>, enclosing: Option<&TargetRef>) -> DiResult<T> {
    build(injector, injectable, enclosing).map_err(|e| DiError::injection(injectable.name().to_owned(), e))
}

fn build<T>(injector: &Injector, injectable: &Injectable<T>, enclosing: Option<&TargetRef>) -> DiResult<T> {
    let tokens = injectable.tokens();
    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        let value = match token {
            Token::Target => Argument::Target(enclosing.cloned()),
            Token::Injector => Argument::Injector(injector.clone()),
            Token::Named(_) => Argument::Value(injector.resolve_internal(token, Some(injectable.target()))?),
        };
        values.push(value);
    }
    let mut args = Arguments::new(injectable.shared_tokens(), values);
    injectable.call(&mut args)
}
