//! Declaration value rewriting
//!
//! Finds `svg("name")` / `svg("name", "params")` calls in one CSS
//! declaration value and swaps each for its data URI, left to right. The
//! name is an asset name optionally followed by whitespace-separated sprite
//! ids: `svg("sheet home", "[fill]:red")`.

use std::fmt;
use std::ops::Range;
use std::time::Instant;

use logos::Logos;
use tracing::{debug, warn};

use crate::cache::AssetCache;
use crate::config::Config;
use crate::error::AssetError;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum Token {
    #[regex(r"[A-Za-z_][A-Za-z0-9_-]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""[^"]+""#, |lex| unquote(lex.slice()))]
    #[regex(r"'[^']+'", |lex| unquote(lex.slice()))]
    Quoted(String),

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(",")]
    Comma,
}

fn unquote(quoted: &str) -> String {
    quoted[1..quoted.len() - 1].to_string()
}

/// One call found in a declaration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Byte range of the whole call
    pub span: Range<usize>,
    pub name: String,
    pub params: Option<String>,
}

impl Invocation {
    /// Asset name and the sprite id path that follows it
    pub fn target(&self) -> (&str, Vec<&str>) {
        let mut words = self.name.split_whitespace();
        let asset = words.next().unwrap_or_default();
        (asset, words.collect())
    }
}

/// A failure reported instead of raised in silent mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub name: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simple-svg: {}: {}", self.name, self.message)
    }
}

/// Result of rewriting a declaration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub value: String,
    pub warnings: Vec<Warning>,
}

/// Find every `func(...)` call in a declaration value
pub fn find_invocations(value: &str, func: &str) -> Vec<Invocation> {
    let tokens: Vec<(Option<Token>, Range<usize>)> = Token::lexer(value)
        .spanned()
        .map(|(token, span)| (token.ok(), span))
        .collect();

    let mut found = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match match_call(&tokens[i..], func) {
            Some((invocation, consumed)) => {
                found.push(invocation);
                i += consumed;
            }
            None => i += 1,
        }
    }
    found
}

/// `func ( "name" [ , "params" ] )` at the head of `tokens`
fn match_call(tokens: &[(Option<Token>, Range<usize>)], func: &str) -> Option<(Invocation, usize)> {
    let token = |i: usize| tokens.get(i).and_then(|(token, _)| token.as_ref());

    match token(0)? {
        Token::Ident(ident) if ident == func => {}
        _ => return None,
    }
    if token(1)? != &Token::ParenOpen {
        return None;
    }
    let Token::Quoted(name) = token(2)? else {
        return None;
    };

    let (params, close) = match token(3)? {
        Token::ParenClose => (None, 3),
        Token::Comma => match (token(4)?, token(5)?) {
            (Token::Quoted(params), Token::ParenClose) => (Some(params.clone()), 5),
            _ => return None,
        },
        _ => return None,
    };

    let span = tokens[0].1.start..tokens[close].1.end;
    Some((
        Invocation {
            span,
            name: name.clone(),
            params,
        },
        close + 1,
    ))
}

/// Render one invocation through the cache
pub fn render_invocation(invocation: &Invocation, cache: &mut AssetCache) -> Result<String, AssetError> {
    let (name, ids) = invocation.target();
    let asset = cache.get(name)?;
    let target = asset.resolve(ids.as_slice())?;
    target.render(invocation.params.as_deref().unwrap_or_default())
}

/// Replace every invocation in `value` with its data URI
///
/// In silent mode a failing call is left as written and reported as a
/// [`Warning`]; otherwise the first failure is returned.
pub fn rewrite_value(value: &str, cache: &mut AssetCache, config: &Config) -> Result<Rewrite, AssetError> {
    let mut rewritten = String::with_capacity(value.len());
    let mut warnings = Vec::new();
    let mut last = 0;

    for invocation in find_invocations(value, &config.func) {
        let started = Instant::now();
        rewritten.push_str(&value[last..invocation.span.start]);

        match render_invocation(&invocation, cache) {
            Ok(uri) => rewritten.push_str(&uri),
            Err(err) if config.is_silent() => {
                warn!(name = %invocation.name, %err, "leaving SVG call unresolved");
                warnings.push(Warning {
                    name: invocation.name.clone(),
                    message: err.to_string(),
                });
                rewritten.push_str(&value[invocation.span.clone()]);
            }
            Err(err) => return Err(err),
        }

        if config.debug {
            debug!(name = %invocation.name, elapsed = ?started.elapsed(), "render svg");
        }
        last = invocation.span.end;
    }
    rewritten.push_str(&value[last..]);

    Ok(Rewrite {
        value: rewritten,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetOptions;
    use crate::error::NotFoundError;
    use pretty_assertions::assert_eq;

    fn cache_with(name: &str, markup: &str) -> AssetCache {
        let mut cache = AssetCache::new(AssetOptions::new());
        cache.insert_markup(name, markup).unwrap();
        cache
    }

    #[test]
    fn test_find_single_and_double_quoted() {
        let value = r#"url(a.png), svg("icon"), svg('sheet home', '[fill]:red')"#;
        let found = find_invocations(value, "svg");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "icon");
        assert_eq!(found[0].params, None);
        assert_eq!(&value[found[0].span.clone()], r#"svg("icon")"#);
        assert_eq!(found[1].params.as_deref(), Some("[fill]:red"));
        assert_eq!(found[1].target(), ("sheet", vec!["home"]));
    }

    #[test]
    fn test_find_respects_function_name() {
        assert!(find_invocations(r#"svg("a")"#, "icon").is_empty());
        assert_eq!(find_invocations(r#"icon( "a" , "b" )"#, "icon").len(), 1);
    }

    #[test]
    fn test_incomplete_calls_are_ignored() {
        assert!(find_invocations(r#"svg("a""#, "svg").is_empty());
        assert!(find_invocations(r#"svg(a)"#, "svg").is_empty());
        assert!(find_invocations(r#"svg("a", b)"#, "svg").is_empty());
    }

    #[test]
    fn test_empty_quoted_arguments_are_ignored() {
        assert!(find_invocations(r#"svg("a", "")"#, "svg").is_empty());
        assert!(find_invocations(r#"svg('')"#, "svg").is_empty());

        let mut cache = cache_with("a", "<svg/>");
        let value = r#"svg("a", "") center"#;
        let rewrite = rewrite_value(value, &mut cache, &Config::new()).unwrap();
        assert_eq!(rewrite.value, value);
        assert!(rewrite.warnings.is_empty());
    }

    #[test]
    fn test_rewrite_value_left_to_right() {
        let mut cache = cache_with("dot", r#"<svg width="1"><circle fill="red"/></svg>"#);
        let value = r#"svg("dot") no-repeat, svg("dot", "[fill]:blue")"#;

        let rewrite = rewrite_value(value, &mut cache, &Config::new()).unwrap();
        let red = cache.get("dot").unwrap().render("").unwrap();
        let blue = cache.get("dot").unwrap().render("[fill]:blue").unwrap();

        assert_eq!(rewrite.value, format!("{red} no-repeat, {blue}"));
        assert!(rewrite.warnings.is_empty());
    }

    #[test]
    fn test_rewrite_resolves_sprites() {
        let mut cache = cache_with("sheet", r#"<svg><symbol id="home" fill="red"/></svg>"#);
        let rewrite = rewrite_value(r#"svg("sheet home")"#, &mut cache, &Config::new()).unwrap();

        let expected = cache.get("sheet").unwrap().resolve(&["home"]).unwrap().render("").unwrap();
        assert_eq!(rewrite.value, expected);
    }

    #[test]
    fn test_silent_mode_warns_and_keeps_call() {
        let mut cache = AssetCache::new(AssetOptions::new());
        let value = r#"svg("ghost") center"#;

        let rewrite = rewrite_value(value, &mut cache, &Config::new()).unwrap();
        assert_eq!(rewrite.value, value);
        assert_eq!(rewrite.warnings.len(), 1);
        assert_eq!(rewrite.warnings[0].name, "ghost");
    }

    #[test]
    fn test_loud_mode_raises() {
        let mut cache = cache_with("sheet", "<svg/>");
        let config = Config::new().with_debug(true);

        let err = rewrite_value(r#"svg("sheet missing")"#, &mut cache, &config).unwrap_err();
        assert!(matches!(
            err,
            AssetError::NotFound(NotFoundError::Sprite { ref id }) if id == "missing"
        ));
    }
}
