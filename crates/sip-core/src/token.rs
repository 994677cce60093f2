// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RFC 3261 token grammar shared by generic token-list headers.
//!
//! ```text
//! token      =  1*(alphanum / "-" / "." / "!" / "%" / "*"
//!               / "_" / "+" / "`" / "'" / "~" )
//! LWS        =  [*WSP CRLF] 1*WSP
//! token-list =  [LWS] token *(LWS token) [LWS] [CRLF]
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::{opt, recognize},
    multi::{many1_count, separated_list1},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Returns `true` for bytes allowed inside an RFC 3261 token.
pub fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~'
        )
}

/// Returns `true` for SP and HTAB.
pub fn is_wsp(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Returns `true` when `value` is a single non-empty token.
pub fn is_token(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(is_token_byte)
}

fn token(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(is_token_byte)(input)
}

/// Linear white space: WSP runs, each optionally introduced by a CRLF fold.
fn lws(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(many1_count(alt((
        take_while1(is_wsp),
        recognize(pair(tag("\r\n"), take_while1(is_wsp))),
    ))))(input)
}

/// Parses a whitespace separated token list.
///
/// Returns the unconsumed remainder together with the tokens; callers decide
/// whether a non-empty remainder is an error.
pub fn token_list(input: &[u8]) -> IResult<&[u8], Vec<&[u8]>> {
    let (rest, (tokens, _, _)) = tuple((
        preceded(opt(lws), separated_list1(lws, token)),
        opt(lws),
        opt(tag("\r\n")),
    ))(input)?;
    Ok((rest, tokens))
}

/// Offset of the first byte that breaks the token-list grammar.
///
/// Returns `None` when the whole input is a well-formed token list. Text
/// after an unfolded CRLF is reported at the CRLF, since the terminator is
/// what ends the list early.
pub fn first_invalid_offset(input: &[u8]) -> Option<usize> {
    match token_list(input) {
        Ok((rest, _)) if rest.is_empty() => None,
        Ok((rest, _)) => {
            let parsed = &input[..input.len() - rest.len()];
            if parsed.ends_with(b"\r\n") {
                Some(parsed.len() - 2)
            } else {
                Some(parsed.len())
            }
        }
        Err(_) => Some(leading_lws_len(input)),
    }
}

fn leading_lws_len(input: &[u8]) -> usize {
    lws(input).map(|(rest, _)| input.len() - rest.len()).unwrap_or(0)
}
