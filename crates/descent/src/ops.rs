//! Operator-precedence expression builder.
//!
//! Collects `(operator parser, precedence, associativity)` registrations and
//! assembles them around an operand parser, tightest binding first. The
//! result is iterative `operand (op operand)*` / `op* operand` shapes, so no
//! left recursion ever reaches the grammar.

use crate::parser::{or, Binary, Parser, Unary};

enum Shape<T> {
    Prefix(Parser<Unary<T>>),
    Postfix(Parser<Unary<T>>),
    Infixl(Parser<Binary<T>>),
    Infixn(Parser<Binary<T>>),
    Infixr(Parser<Binary<T>>),
}

impl<T> Shape<T> {
    /// Tie-break order for operators of equal precedence: prefix, postfix,
    /// left-associative, non-associative, right-associative.
    fn rank(&self) -> u8 {
        match self {
            Self::Prefix(_) => 0,
            Self::Postfix(_) => 1,
            Self::Infixl(_) => 2,
            Self::Infixn(_) => 3,
            Self::Infixr(_) => 4,
        }
    }
}

struct Operator<T> {
    precedence: i32,
    shape: Shape<T>,
}

/// A registry of operators to fold around an operand parser.
///
/// ```
/// use std::sync::Arc;
/// use descent::ops::OperatorTable;
/// use descent::parser::Binary;
/// use descent::scan;
///
/// let operand = scan::integer().map(|s| s.parse::<i64>().unwrap_or(0));
/// let add: Binary<i64> = Arc::new(|a, b| a + b);
/// let mul: Binary<i64> = Arc::new(|a, b| a * b);
/// let expr = OperatorTable::new()
///     .infixl(scan::is_char('+').to(add), 10)
///     .infixl(scan::is_char('*').to(mul), 20)
///     .build(operand);
/// assert_eq!(expr.parse("1+2*3").unwrap(), 7);
/// ```
pub struct OperatorTable<T> {
    operators: Vec<Operator<T>>,
}

impl<T: 'static> OperatorTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { operators: Vec::new() }
    }

    #[must_use]
    pub fn prefix(mut self, op: Parser<Unary<T>>, precedence: i32) -> Self {
        self.operators.push(Operator { precedence, shape: Shape::Prefix(op) });
        self
    }

    #[must_use]
    pub fn postfix(mut self, op: Parser<Unary<T>>, precedence: i32) -> Self {
        self.operators.push(Operator { precedence, shape: Shape::Postfix(op) });
        self
    }

    #[must_use]
    pub fn infixl(mut self, op: Parser<Binary<T>>, precedence: i32) -> Self {
        self.operators.push(Operator { precedence, shape: Shape::Infixl(op) });
        self
    }

    #[must_use]
    pub fn infixn(mut self, op: Parser<Binary<T>>, precedence: i32) -> Self {
        self.operators.push(Operator { precedence, shape: Shape::Infixn(op) });
        self
    }

    #[must_use]
    pub fn infixr(mut self, op: Parser<Binary<T>>, precedence: i32) -> Self {
        self.operators.push(Operator { precedence, shape: Shape::Infixr(op) });
        self
    }

    /// Folds the registered operators around `operand`, highest precedence
    /// binding tightest. Operators with equal precedence and associativity
    /// are merged into one alternation band.
    #[must_use]
    pub fn build(mut self, operand: Parser<T>) -> Parser<T> {
        self.operators
            .sort_by(|a, b| b.precedence.cmp(&a.precedence).then(a.shape.rank().cmp(&b.shape.rank())));

        let mut parser = operand;
        let mut ops = self.operators.into_iter().peekable();
        while let Some(first) = ops.next() {
            let (precedence, rank) = (first.precedence, first.shape.rank());
            let mut band = vec![first.shape];
            while let Some(op) =
                ops.next_if(|op| op.precedence == precedence && op.shape.rank() == rank)
            {
                band.push(op.shape);
            }
            parser = apply_band(parser, band);
        }
        parser
    }
}

impl<T: 'static> Default for OperatorTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_band<T: 'static>(operand: Parser<T>, band: Vec<Shape<T>>) -> Parser<T> {
    // Bands are sliced on (precedence, rank), so every shape in the band is
    // the same variant.
    match band.first() {
        Some(Shape::Prefix(_)) => operand.prefix(&or(unary(band))),
        Some(Shape::Postfix(_)) => operand.postfix(&or(unary(band))),
        Some(Shape::Infixl(_)) => operand.infixl(&or(binary(band))),
        Some(Shape::Infixn(_)) => operand.infixn(&or(binary(band))),
        Some(Shape::Infixr(_)) => operand.infixr(&or(binary(band))),
        None => operand,
    }
}

fn unary<T>(band: Vec<Shape<T>>) -> Vec<Parser<Unary<T>>> {
    band.into_iter()
        .filter_map(|shape| match shape {
            Shape::Prefix(p) | Shape::Postfix(p) => Some(p),
            _ => None,
        })
        .collect()
}

fn binary<T>(band: Vec<Shape<T>>) -> Vec<Parser<Binary<T>>> {
    band.into_iter()
        .filter_map(|shape| match shape {
            Shape::Infixl(p) | Shape::Infixn(p) | Shape::Infixr(p) => Some(p),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::scan;

    fn number() -> Parser<i64> {
        scan::integer().map(|s| s.parse::<i64>().unwrap_or(0))
    }

    fn add() -> Parser<Binary<i64>> {
        let f: Binary<i64> = Arc::new(|a, b| a + b);
        scan::is_char('+').to(f)
    }

    fn sub() -> Parser<Binary<i64>> {
        let f: Binary<i64> = Arc::new(|a, b| a - b);
        scan::is_char('-').to(f)
    }

    fn mul() -> Parser<Binary<i64>> {
        let f: Binary<i64> = Arc::new(|a, b| a * b);
        scan::is_char('*').to(f)
    }

    fn neg() -> Parser<Unary<i64>> {
        let f: Unary<i64> = Arc::new(|a: i64| -a);
        scan::is_char('-').to(f)
    }

    #[test]
    fn precedence_binds_tighter_first() {
        let expr = OperatorTable::new()
            .infixl(add(), 10)
            .infixl(mul(), 20)
            .build(number());
        assert_eq!(expr.parse("1+2*3").unwrap(), 7);
        assert_eq!(expr.parse("2*3+1").unwrap(), 7);
    }

    #[test]
    fn equal_precedence_same_class_merges_into_one_band() {
        let expr = OperatorTable::new()
            .infixl(add(), 10)
            .infixl(sub(), 10)
            .build(number());
        // Left-associative within the band: 10 - 3 + 2 - 1 = ((10-3)+2)-1.
        assert_eq!(expr.parse("10-3+2-1").unwrap(), 8);
    }

    #[test]
    fn prefix_applies_inside_out() {
        let expr = OperatorTable::new()
            .prefix(neg(), 30)
            .infixl(sub(), 10)
            .build(number());
        assert_eq!(expr.parse("--3").unwrap(), 3);
        assert_eq!(expr.parse("-3-4").unwrap(), -7);
    }

    #[test]
    fn non_associative_stops_after_one() {
        let cmp: Binary<i64> = Arc::new(|a, b| i64::from(a < b));
        let expr = OperatorTable::new()
            .infixn(scan::is_char('<').to(cmp), 5)
            .build(number());
        assert_eq!(expr.parse("1<2").unwrap(), 1);
        // The second `<` is not consumed, leaving trailing input.
        assert!(expr.parse("1<2<3").is_err());
    }
}
