//! Version requirements used to filter the release index.
//!
//! The grammar follows Elixir's `Version.Requirement` syntax, with the
//! Cargo shorthands `^` and `~` accepted as well:
//!
//! - `~> 1.12` means `>= 1.12.0 and < 2.0.0-0`
//! - `~> 1.12.1` means `>= 1.12.1 and < 1.13.0-0`
//! - `>= 1.10.0 and < 1.13.0 or == 1.14.0`
//! - `^1.12`, `~1.12.1`, `>=1.0.0, <2.0.0`
//!
//! Pre-release handling is not baked into the requirement; callers choose
//! per match whether pre-releases may satisfy it. When they are disallowed,
//! a pre-release can still satisfy an alternative that names a pre-release
//! operand itself, so `== 1.13.0-rc.0` keeps matching `1.13.0-rc.0`.

use crate::error::{ReleaseIndexError, Result};
use semver::Version;
use std::fmt;
use std::str::FromStr;

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!', '~', '^'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Exact,
    NotEqual,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    /// Strictly below every build of the given `major.minor.patch`,
    /// including its pre-releases (the `< X.Y.Z-0` upper bound).
    Below,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, v: &Version) -> bool {
        let c = &self.version;
        match self.op {
            Op::Exact => v == c,
            Op::NotEqual => v != c,
            Op::Greater => v > c,
            Op::GreaterEq => v >= c,
            Op::Less => v < c,
            Op::LessEq => v <= c,
            Op::Below => (v.major, v.minor, v.patch) < (c.major, c.minor, c.patch),
        }
    }
}

/// An operand that may omit trailing components (`1`, `1.12`)
#[derive(Debug)]
enum Operand {
    Full(Version),
    Partial { major: u64, minor: Option<u64> },
}

/// A parsed version requirement: any alternative whose comparators all hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    source: String,
    alternatives: Vec<Vec<Comparator>>,
}

impl Requirement {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: String| ReleaseIndexError::InvalidRequirement {
            requirement: input.to_string(),
            reason,
        };

        let spaced = input.replace("||", " or ").replace(',', " and ");
        let mut tokens = spaced.split_whitespace().peekable();

        if tokens.peek().is_none() {
            return Err(invalid("requirement is empty".to_string()));
        }

        let mut alternatives = Vec::new();
        let mut current: Vec<Comparator> = Vec::new();
        let mut expect_comparator = true;

        while let Some(token) = tokens.next() {
            match token {
                "and" | "or" if expect_comparator => {
                    return Err(invalid(format!("unexpected `{}`", token)));
                }
                "and" => expect_comparator = true,
                "or" => {
                    alternatives.push(std::mem::take(&mut current));
                    expect_comparator = true;
                }
                _ if !expect_comparator => {
                    return Err(invalid(format!(
                        "expected `and` or `or` before `{}`",
                        token
                    )));
                }
                _ => {
                    let split = token
                        .find(|c: char| !OPERATOR_CHARS.contains(&c))
                        .unwrap_or(token.len());
                    let (op, operand) = token.split_at(split);
                    let operand = if operand.is_empty() {
                        tokens
                            .next()
                            .ok_or_else(|| invalid(format!("`{}` is missing a version", op)))?
                    } else {
                        operand
                    };

                    let comparators = lower(op, operand).map_err(invalid)?;
                    current.extend(comparators);
                    expect_comparator = false;
                }
            }
        }

        if expect_comparator {
            return Err(invalid("requirement ends with a dangling operator".to_string()));
        }
        alternatives.push(current);

        Ok(Self {
            source: input.trim().to_string(),
            alternatives,
        })
    }

    /// Whether `version` satisfies the requirement. With `allow_pre` false,
    /// a pre-release only matches an alternative that mentions a pre-release
    /// operand, whatever its numeric position.
    pub fn matches(&self, version: &Version, allow_pre: bool) -> bool {
        let gated = !allow_pre && !version.pre.is_empty();

        self.alternatives.iter().any(|all| {
            (!gated || all.iter().any(|c| !c.version.pre.is_empty()))
                && all.iter().all(|c| c.matches(version))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Requirement {
    type Err = ReleaseIndexError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Translate one `op operand` pair into plain comparators
fn lower(op: &str, operand: &str) -> std::result::Result<Vec<Comparator>, String> {
    let simple = |op: Op| -> std::result::Result<Vec<Comparator>, String> {
        match parse_operand(operand)? {
            Operand::Full(v) => Ok(vec![Comparator::new(op, v)]),
            Operand::Partial { .. } => Err(format!(
                "`{}` needs a full major.minor.patch version",
                operand
            )),
        }
    };

    match op {
        "" | "==" | "=" => simple(Op::Exact),
        "!=" => simple(Op::NotEqual),
        ">" => simple(Op::Greater),
        ">=" => simple(Op::GreaterEq),
        "<" => simple(Op::Less),
        "<=" => simple(Op::LessEq),
        "~>" => pessimistic(parse_operand(operand)?),
        "^" => caret(parse_operand(operand)?),
        "~" => tilde(parse_operand(operand)?),
        other => Err(format!("unknown operator `{}`", other)),
    }
}

fn parse_operand(operand: &str) -> std::result::Result<Operand, String> {
    if let Ok(version) = Version::parse(operand) {
        return Ok(Operand::Full(version));
    }

    let parts: Vec<&str> = operand.split('.').collect();
    let number = |s: &str| {
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            s.parse::<u64>().map_err(|e| e.to_string())
        } else {
            Err(format!("`{}` is not a version", operand))
        }
    };

    match parts.as_slice() {
        [major] => Ok(Operand::Partial {
            major: number(*major)?,
            minor: None,
        }),
        [major, minor] => Ok(Operand::Partial {
            major: number(*major)?,
            minor: Some(number(*minor)?),
        }),
        _ => Err(format!("`{}` is not a version", operand)),
    }
}

fn below(major: u64, minor: u64, patch: u64) -> Comparator {
    Comparator::new(Op::Below, Version::new(major, minor, patch))
}

/// The next value of a version component, if it has one
fn bump(n: u64) -> std::result::Result<u64, String> {
    n.checked_add(1)
        .ok_or_else(|| format!("version component {} has no upper bound", n))
}

/// `~> M.m` allows minor bumps, `~> M.m.p` allows patch bumps
fn pessimistic(operand: Operand) -> std::result::Result<Vec<Comparator>, String> {
    match operand {
        Operand::Full(v) => {
            let upper = below(v.major, bump(v.minor)?, 0);
            Ok(vec![Comparator::new(Op::GreaterEq, v), upper])
        }
        Operand::Partial {
            major,
            minor: Some(minor),
        } => Ok(vec![
            Comparator::new(Op::GreaterEq, Version::new(major, minor, 0)),
            below(bump(major)?, 0, 0),
        ]),
        Operand::Partial { minor: None, .. } => {
            Err("`~>` needs at least major.minor".to_string())
        }
    }
}

fn caret(operand: Operand) -> std::result::Result<Vec<Comparator>, String> {
    let (lower, upper) = match operand {
        Operand::Full(v) => {
            let upper = match (v.major, v.minor) {
                (0, 0) => below(0, 0, bump(v.patch)?),
                (0, minor) => below(0, bump(minor)?, 0),
                (major, _) => below(bump(major)?, 0, 0),
            };
            (v, upper)
        }
        Operand::Partial { major, minor } => {
            let minor_or_zero = minor.unwrap_or(0);
            let upper = match (major, minor) {
                (0, Some(minor)) => below(0, bump(minor)?, 0),
                _ => below(bump(major)?, 0, 0),
            };
            (Version::new(major, minor_or_zero, 0), upper)
        }
    };
    Ok(vec![Comparator::new(Op::GreaterEq, lower), upper])
}

fn tilde(operand: Operand) -> std::result::Result<Vec<Comparator>, String> {
    let (lower, upper) = match operand {
        Operand::Full(v) => {
            let upper = below(v.major, bump(v.minor)?, 0);
            (v, upper)
        }
        Operand::Partial {
            major,
            minor: Some(minor),
        } => (Version::new(major, minor, 0), below(major, bump(minor)?, 0)),
        Operand::Partial { major, minor: None } => {
            (Version::new(major, 0, 0), below(bump(major)?, 0, 0))
        }
    };
    Ok(vec![Comparator::new(Op::GreaterEq, lower), upper])
}
