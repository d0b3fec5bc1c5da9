use crate::expr::Expr;

pub fn bit_and<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$bitAnd", operands)
}

pub fn bit_or<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$bitOr", operands)
}

pub fn bit_xor<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$bitXor", operands)
}

pub fn bit_not(input: impl Into<Expr>) -> Expr {
    Expr::unary("$bitNot", input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_bitwise() {
        assert_eq!(
            bit_and([Expr::from(field("flags")), 4.into()]).to_value(),
            json!({"$bitAnd": ["$flags", 4]})
        );
        assert_eq!(bit_or([field("a"), field("b")]).operator_name(), Some("$bitOr"));
        assert_eq!(bit_xor([field("a"), field("b")]).operator_name(), Some("$bitXor"));
        assert_eq!(bit_not(field("a")).to_value(), json!({"$bitNot": "$a"}));
    }
}
