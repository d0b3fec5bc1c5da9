//! Trigonometry expressions. Angles are in radians.

use crate::expr::Expr;

unary_ops!(
    sin => "$sin",
    cos => "$cos",
    tan => "$tan",
    asin => "$asin",
    acos => "$acos",
    atan => "$atan",
    sinh => "$sinh",
    cosh => "$cosh",
    tanh => "$tanh",
    asinh => "$asinh",
    acosh => "$acosh",
    atanh => "$atanh",
    degrees_to_radians => "$degreesToRadians",
    radians_to_degrees => "$radiansToDegrees",
);

/// `{"$atan2": [y, x]}`
pub fn atan2(y: impl Into<Expr>, x: impl Into<Expr>) -> Expr {
    Expr::binary("$atan2", y, x)
}
