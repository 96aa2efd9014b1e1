//! Position list command implementation.

use clap::ValueEnum;
use std::num::ParseIntError;
use steno_base::positions;

/// Set operation to apply to two position lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetOp {
    /// Every position in either list.
    Union,
    /// Positions present in both lists.
    Intersect,
}

/// Runs the positions command.
pub fn run(op: SetOp, a: &str, b: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = apply(op, a, b)?;
    let rendered: Vec<String> = result.iter().map(i64::to_string).collect();
    println!("{}", rendered.join(","));
    Ok(())
}

/// Parses both lists, sorts them and applies `op`.
pub fn apply(op: SetOp, a: &str, b: &str) -> Result<Vec<i64>, ParseIntError> {
    let mut a = parse_list(a)?;
    let mut b = parse_list(b)?;
    positions::sort(&mut a);
    positions::sort(&mut b);

    Ok(match op {
        SetOp::Union => positions::union(&a, &b),
        SetOp::Intersect => positions::intersect(&a, &b),
    })
}

/// Parses a comma-separated list of positions. An empty string is an empty list.
pub fn parse_list(list: &str) -> Result<Vec<i64>, ParseIntError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lists() {
        assert_eq!(parse_list("1, 3,5").unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_list("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_list("-4,").unwrap(), vec![-4]);
        assert!(parse_list("1,x").is_err());
    }

    #[test]
    fn applies_operations() {
        assert_eq!(apply(SetOp::Union, "1,3,5", "2,3,4").unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(apply(SetOp::Intersect, "1,3,5", "2,3,4").unwrap(), vec![3]);
    }

    #[test]
    fn sorts_before_combining() {
        assert_eq!(apply(SetOp::Union, "5,1,3", "4,2,3").unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(apply(SetOp::Intersect, "9,3", "3,9,1").unwrap(), vec![3, 9]);
    }
}
