//! Token fusion passes.
//!
//! The lexer emits every punctuation byte as its own token, so the two
//! multi-character operators arrive in pieces: `-` `>` for the arrow and
//! `.` `.` `.` for the spread. Two rewriting passes fuse them back
//! together. Arrow fusion runs first, spread fusion second; a fused token
//! keeps the first component's position. Any `.` not part of a spread is
//! left alone, since it also serves as the statement terminator.

use crate::token::Token;

/// Runs both fusion passes in their fixed order.
#[must_use]
pub fn fuse(tokens: Vec<Token>) -> Vec<Token> {
    fuse_spreads(fuse_arrows(tokens))
}

/// Replaces every `-` immediately followed by `>` with a single `->`.
#[must_use]
pub fn fuse_arrows(tokens: Vec<Token>) -> Vec<Token> {
    let mut fused = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if token.is("-") {
            if let Some(next) = iter.next_if(|next| next.is(">")) {
                fused.push(Token::new("->", token.span.to(next.span)));
                continue;
            }
        }
        fused.push(token);
    }
    fused
}

/// Replaces every run of three consecutive `.` with a single `...`.
#[must_use]
pub fn fuse_spreads(tokens: Vec<Token>) -> Vec<Token> {
    let mut fused = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is(".")
            && tokens.get(i + 1).is_some_and(|t| t.is("."))
            && tokens.get(i + 2).is_some_and(|t| t.is("."))
        {
            let span = tokens[i].span.to(tokens[i + 2].span);
            fused.push(Token::new("...", span));
            i += 3;
        } else {
            fused.push(tokens[i].clone());
            i += 1;
        }
    }
    fused
}
