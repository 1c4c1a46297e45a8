//! Line-oriented binding scripts.
//!
//! One command per line. `#` starts a comment and blank lines are skipped.
//!
//! ```text
//! scalar <name> <value>
//! vector <name> <v1> <v2> ...
//! matrix <name> <rows> <cols> <v1> ... <vn>
//! alias  <existing> <new>
//! remove <name>
//! show   <name>
//! list
//! ```

use std::str::FromStr;

use anyhow::{bail, Context};

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Scalar { name: String, value: f64 },
    Vector { name: String, values: Vec<f64> },
    Matrix {
        name: String,
        rows: usize,
        cols: usize,
        values: Vec<f64>,
    },
    Alias { existing: String, alias: String },
    Remove { name: String },
    Show { name: String },
    List,
}

impl Op {
    /// The command keyword, for reports.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Vector { .. } => "vector",
            Self::Matrix { .. } => "matrix",
            Self::Alias { .. } => "alias",
            Self::Remove { .. } => "remove",
            Self::Show { .. } => "show",
            Self::List => "list",
        }
    }
}

/// Parse one script line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<Op>> {
    let code = line.split('#').next().unwrap_or_default();
    let mut words = code.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let op = match keyword {
        "scalar" => {
            let [name, value] = exact::<2>(keyword, &args)?;
            Op::Scalar {
                name: name.to_string(),
                value: number(value)?,
            }
        }
        "vector" => {
            let Some((name, rest)) = args.split_first() else {
                bail!("vector needs a name");
            };
            Op::Vector {
                name: name.to_string(),
                values: numbers(rest)?,
            }
        }
        "matrix" => {
            let [name, rows, cols, rest @ ..] = args.as_slice() else {
                bail!("matrix needs a name, a row count, and a column count");
            };
            Op::Matrix {
                name: name.to_string(),
                rows: number(rows)?,
                cols: number(cols)?,
                values: numbers(rest)?,
            }
        }
        "alias" => {
            let [existing, alias] = exact::<2>(keyword, &args)?;
            Op::Alias {
                existing: existing.to_string(),
                alias: alias.to_string(),
            }
        }
        "remove" => {
            let [name] = exact::<1>(keyword, &args)?;
            Op::Remove {
                name: name.to_string(),
            }
        }
        "show" => {
            let [name] = exact::<1>(keyword, &args)?;
            Op::Show {
                name: name.to_string(),
            }
        }
        "list" => {
            exact::<0>(keyword, &args)?;
            Op::List
        }
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(op))
}

fn exact<'a, const N: usize>(keyword: &str, args: &[&'a str]) -> anyhow::Result<[&'a str; N]> {
    match <[&str; N]>::try_from(args) {
        Ok(array) => Ok(array),
        Err(_) => bail!("{keyword} takes {N} argument(s), got {}", args.len()),
    }
}

fn number<T>(word: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse()
        .with_context(|| format!("{word:?} is not a valid number"))
}

fn numbers(words: &[&str]) -> anyhow::Result<Vec<f64>> {
    words.iter().map(|w| number(w)).collect()
}
