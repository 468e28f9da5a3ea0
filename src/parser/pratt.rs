//! Pratt expression parser for operator precedence.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Returns the prefix binding power for a token.
///
/// Returns `None` if the token cannot start an expression.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot => Some(19),
        TokenKind::Keyword(Keyword::Not) => Some(3),
        TokenKind::Integer(_)
        | TokenKind::Float(_)
        | TokenKind::String(_)
        | TokenKind::DollarString { .. }
        | TokenKind::Identifier(_)
        | TokenKind::QuotedIdentifier(_)
        | TokenKind::Star
        | TokenKind::LeftParen
        | TokenKind::LeftBracket
        | TokenKind::AnonymousParameter
        | TokenKind::NamedParameter(_)
        | TokenKind::AtParameter(_)
        | TokenKind::PositionalParameter(_) => Some(0),
        TokenKind::Keyword(
            Keyword::Null
            | Keyword::True
            | Keyword::False
            | Keyword::Case
            | Keyword::Cast
            | Keyword::Exists
            | Keyword::Array
            | Keyword::Row
            | Keyword::Not,
        ) => Some(0),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)`; left-associative operators have
/// `left_bp < right_bp`, right-associative ones have `left_bp > right_bp`.
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((5, 6)),
        TokenKind::Keyword(
            Keyword::Is | Keyword::In | Keyword::Between | Keyword::Like | Keyword::Ilike,
        ) => Some((5, 6)),
        TokenKind::BitOr => Some((7, 8)),
        TokenKind::BitAnd => Some((9, 10)),
        TokenKind::LeftShift | TokenKind::RightShift => Some((11, 12)),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((13, 14)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((15, 16)),
        TokenKind::Arrow | TokenKind::LongArrow | TokenKind::HashArrow | TokenKind::HashLongArrow => {
            Some((17, 18))
        }
        // `^` (exponentiation) is right-associative: right_bp < left_bp.
        TokenKind::Caret => Some((20, 19)),
        _ => None,
    }
}

/// Returns the postfix binding power for a token (`::` cast has the
/// highest precedence of any operator in the table).
#[must_use]
pub const fn postfix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::DoubleColon => Some(23),
        TokenKind::Keyword(Keyword::Is) => Some(17),
        _ => None,
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Caret => Some(BinaryOp::Pow),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
        TokenKind::Keyword(Keyword::Ilike) => Some(BinaryOp::ILike),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::LeftShift => Some(BinaryOp::LeftShift),
        TokenKind::RightShift => Some(BinaryOp::RightShift),
        TokenKind::Arrow => Some(BinaryOp::JsonArrow),
        TokenKind::LongArrow => Some(BinaryOp::JsonLongArrow),
        TokenKind::HashArrow => Some(BinaryOp::JsonHashArrow),
        TokenKind::HashLongArrow => Some(BinaryOp::JsonHashLongArrow),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        TokenKind::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_ordering() {
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let or_bp = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        assert!(and_bp.0 > or_bp.0);

        let eq_bp = infix_binding_power(&TokenKind::Eq).unwrap();
        assert!(eq_bp.0 > and_bp.0);

        let pow_bp = infix_binding_power(&TokenKind::Caret).unwrap();
        assert!(pow_bp.0 > mul_bp.0);
    }

    #[test]
    fn left_associativity_for_additive() {
        let (left, right) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn right_associativity_for_exponent() {
        let (left, right) = infix_binding_power(&TokenKind::Caret).unwrap();
        assert!(left > right);
    }

    #[test]
    fn unary_sign_binds_looser_than_exponentiation() {
        // Exponentiation must bind tighter than a leading unary sign so
        // `-2^2` parses as `-(2^2)`: the prefix bp used to parse the
        // operand has to be strictly below `^`'s left bp, or the operand
        // parse stops before consuming the `^2`.
        let minus_bp = prefix_binding_power(&TokenKind::Minus).unwrap();
        let (pow_left, _) = infix_binding_power(&TokenKind::Caret).unwrap();
        assert!(minus_bp < pow_left);
    }

    #[test]
    fn unary_sign_binds_tighter_than_multiplication() {
        let minus_bp = prefix_binding_power(&TokenKind::Minus).unwrap();
        let (mul_left, _) = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(minus_bp > mul_left);
    }

    #[test]
    fn cast_postfix_outranks_everything() {
        let cast_bp = postfix_binding_power(&TokenKind::DoubleColon).unwrap();
        let (_, pow_right) = infix_binding_power(&TokenKind::Caret).unwrap();
        assert!(cast_bp > pow_right);
    }

    #[test]
    fn token_to_binary_op_mapping() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::Eq), Some(BinaryOp::Eq));
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }

    #[test]
    fn token_to_unary_op_mapping() {
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(
            token_to_unary_op(&TokenKind::Keyword(Keyword::Not)),
            Some(UnaryOp::Not)
        );
        assert_eq!(token_to_unary_op(&TokenKind::Star), None);
    }
}
