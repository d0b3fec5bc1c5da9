//! Set expressions over arrays.

use crate::expr::Expr;

pub fn set_union<I, E>(arrays: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$setUnion", arrays)
}

pub fn set_intersection<I, E>(arrays: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$setIntersection", arrays)
}

pub fn set_equals<I, E>(arrays: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$setEquals", arrays)
}

pub fn set_difference(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$setDifference", left, right)
}

pub fn set_is_subset(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$setIsSubset", left, right)
}

pub fn any_element_true(array: impl Into<Expr>) -> Expr {
    Expr::unary("$anyElementTrue", array)
}

pub fn all_elements_true(array: impl Into<Expr>) -> Expr {
    Expr::unary("$allElementsTrue", array)
}
