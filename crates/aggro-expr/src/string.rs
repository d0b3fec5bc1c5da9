//! String expressions.

use crate::expr::{Expr, Named};

pub fn concat<I, E>(parts: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$concat", parts)
}

pub fn split(input: impl Into<Expr>, delimiter: impl Into<Expr>) -> Expr {
    Expr::binary("$split", input, delimiter)
}

pub fn to_lower(input: impl Into<Expr>) -> Expr {
    Expr::unary("$toLower", input)
}

pub fn to_upper(input: impl Into<Expr>) -> Expr {
    Expr::unary("$toUpper", input)
}

pub fn str_len_cp(input: impl Into<Expr>) -> Expr {
    Expr::unary("$strLenCP", input)
}

pub fn substr_cp(input: impl Into<Expr>, start: impl Into<Expr>, length: impl Into<Expr>) -> Expr {
    Expr::list("$substrCP", [input.into(), start.into(), length.into()])
}

/// Case-insensitive comparison.
pub fn strcasecmp(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$strcasecmp", left, right)
}

pub fn replace_one(
    input: impl Into<Expr>,
    find: impl Into<Expr>,
    replacement: impl Into<Expr>,
) -> Expr {
    replace("$replaceOne", input, find, replacement)
}

pub fn replace_all(
    input: impl Into<Expr>,
    find: impl Into<Expr>,
    replacement: impl Into<Expr>,
) -> Expr {
    replace("$replaceAll", input, find, replacement)
}

fn replace(
    name: &'static str,
    input: impl Into<Expr>,
    find: impl Into<Expr>,
    replacement: impl Into<Expr>,
) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("find", find)
        .arg("replacement", replacement)
        .build(name)
}

/// `$trim` / `$ltrim` / `$rtrim` with optional `chars`.
#[derive(Debug, Clone)]
pub struct Trim {
    name: &'static str,
    input: Expr,
    chars: Option<Expr>,
}

pub fn trim(input: impl Into<Expr>) -> Trim {
    Trim::new("$trim", input)
}

pub fn ltrim(input: impl Into<Expr>) -> Trim {
    Trim::new("$ltrim", input)
}

pub fn rtrim(input: impl Into<Expr>) -> Trim {
    Trim::new("$rtrim", input)
}

impl Trim {
    fn new(name: &'static str, input: impl Into<Expr>) -> Self {
        Self {
            name,
            input: input.into(),
            chars: None,
        }
    }

    pub fn chars(mut self, chars: impl Into<Expr>) -> Self {
        self.chars = Some(chars.into());
        self
    }
}

impl From<Trim> for Expr {
    fn from(t: Trim) -> Self {
        Named::new()
            .arg("input", t.input)
            .opt("chars", t.chars)
            .build(t.name)
    }
}

/// `$regexMatch` / `$regexFind` / `$regexFindAll` with optional `options`.
#[derive(Debug, Clone)]
pub struct RegexExpr {
    name: &'static str,
    input: Expr,
    regex: Expr,
    options: Option<Expr>,
}

pub fn regex_match(input: impl Into<Expr>, regex: impl Into<Expr>) -> RegexExpr {
    RegexExpr::new("$regexMatch", input, regex)
}

pub fn regex_find(input: impl Into<Expr>, regex: impl Into<Expr>) -> RegexExpr {
    RegexExpr::new("$regexFind", input, regex)
}

pub fn regex_find_all(input: impl Into<Expr>, regex: impl Into<Expr>) -> RegexExpr {
    RegexExpr::new("$regexFindAll", input, regex)
}

impl RegexExpr {
    fn new(name: &'static str, input: impl Into<Expr>, regex: impl Into<Expr>) -> Self {
        Self {
            name,
            input: input.into(),
            regex: regex.into(),
            options: None,
        }
    }

    /// Flags such as `"i"`, `"m"`, `"x"`, `"s"`.
    pub fn options(mut self, options: impl Into<Expr>) -> Self {
        self.options = Some(options.into());
        self
    }
}

impl From<RegexExpr> for Expr {
    fn from(r: RegexExpr) -> Self {
        Named::new()
            .arg("input", r.input)
            .arg("regex", r.regex)
            .opt("options", r.options)
            .build(r.name)
    }
}
