// src/math/expression/parser.rs

use super::token::{Operator, RpnToken, Token};
use crate::math::error::{MathError, MathResult};
use std::fmt;
use std::str::FromStr;

/// Token mit Byte-Offset in der Quelle (für Fehlermeldungen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Zeichen, an denen ein unbekannter Abschnitt endet.
fn is_boundary(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || Operator::from_char(c).is_some()
}

/// Zerlegt die Eingabe in Tokens. Whitespace zwischen Tokens wird übersprungen.
pub fn tokenize(input: &str) -> MathResult<Vec<SpannedToken>> {
    let mut tokens = Vec::new();
    // Endet das letzte Token einen Operanden? Dann darf kein `!` folgen.
    let mut after_operand = false;
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = if is_ident_start(c) {
            let mut end = offset;
            while let Some(&(i, next)) = chars.peek() {
                if !is_ident_continue(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            Token::Identifier(input[offset..end].to_string())
        } else if c == '(' {
            chars.next();
            Token::LeftParen
        } else if c == ')' {
            chars.next();
            Token::RightParen
        } else if let Some(op) = Operator::from_char(c) {
            if op.is_unary() && after_operand {
                return Err(MathError::syntax(
                    offset,
                    format!("'{}' is a prefix operator and cannot follow an operand", op),
                ));
            }
            chars.next();
            Token::Operator(op)
        } else {
            let mut end = offset;
            while let Some(&(i, next)) = chars.peek() {
                if end > offset && is_boundary(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            return Err(MathError::syntax(
                offset,
                format!("unrecognized input '{}'", &input[offset..end]),
            ));
        };

        after_operand = matches!(token, Token::Identifier(_) | Token::RightParen);
        tokens.push(SpannedToken { token, offset });
    }

    if tokens.is_empty() {
        return Err(MathError::syntax(0, "empty expression"));
    }
    Ok(tokens)
}

enum StackEntry {
    Operator(Operator),
    LeftParen(usize),
}

/// Shunting-Yard: Infix-Tokens in Postfix-Reihenfolge (RPN).
pub fn to_rpn(tokens: &[SpannedToken]) -> MathResult<Vec<RpnToken>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackEntry> = Vec::new();

    for spanned in tokens {
        match &spanned.token {
            Token::Identifier(name) => output.push(RpnToken::Identifier(name.clone())),
            Token::Operator(op) => {
                while let Some(StackEntry::Operator(top)) = stack.last() {
                    let pops = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && op.is_left_associative());
                    if !pops {
                        break;
                    }
                    output.push(RpnToken::Operator(*top));
                    stack.pop();
                }
                stack.push(StackEntry::Operator(*op));
            }
            Token::LeftParen => stack.push(StackEntry::LeftParen(spanned.offset)),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(StackEntry::Operator(op)) => output.push(RpnToken::Operator(op)),
                    Some(StackEntry::LeftParen(_)) => break,
                    None => return Err(MathError::syntax(spanned.offset, "unmatched ')'")),
                }
            },
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Operator(op) => output.push(RpnToken::Operator(op)),
            StackEntry::LeftParen(offset) => {
                return Err(MathError::syntax(offset, "unmatched '('"));
            }
        }
    }

    Ok(output)
}

/// Geparster Domain-Ausdruck: Quelltext plus RPN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    source: String,
    rpn: Vec<RpnToken>,
}

impl Expression {
    pub fn parse(source: &str) -> MathResult<Self> {
        let tokens = tokenize(source)?;
        let rpn = to_rpn(&tokens)?;
        Ok(Self {
            source: source.trim().to_string(),
            rpn,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rpn(&self) -> &[RpnToken] {
        &self.rpn
    }

    /// Referenzierte Tags, ohne Duplikate, in Reihenfolge des ersten Auftretens.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.rpn {
            if let RpnToken::Identifier(name) = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl FromStr for Expression {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.rpn.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpn(source: &str) -> String {
        Expression::parse(source).unwrap().to_string()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("  P1 +(A_2&b)  ").unwrap();
        let kinds: Vec<Token> = tokens.iter().map(|t| t.token.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Identifier("P1".to_string()),
                Token::Operator(Operator::Union),
                Token::LeftParen,
                Token::Identifier("A_2".to_string()),
                Token::Operator(Operator::Intersection),
                Token::Identifier("b".to_string()),
                Token::RightParen,
            ]
        );
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[3].offset, 7);
    }

    #[test]
    fn test_intersection_binds_tighter_than_union() {
        assert_eq!(rpn("A + B & C"), "A B C & +");
        assert_eq!(rpn("A + B * C"), "A B C & +");
        assert_eq!(rpn("A & B + C"), "A B & C +");
    }

    #[test]
    fn test_complement_binds_tightest() {
        assert_eq!(rpn("!A + B"), "A ! B +");
        assert_eq!(rpn("A & !B"), "A B ! &");
        assert_eq!(rpn("!!A"), "A ! !");
        assert_eq!(rpn("!(A + B)"), "A B + !");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(rpn("A - B - C"), "A B - C -");
        assert_eq!(rpn("A - B + C"), "A B - C +");
        assert_eq!(rpn("A - (B + C)"), "A B C + -");
    }

    #[test]
    fn test_examples_from_domain_dialog() {
        assert_eq!(rpn("P1 + P2 - P3"), "P1 P2 + P3 -");
        assert_eq!(rpn("(A & B) - !C"), "A B & C ! -");
    }

    #[test]
    fn test_unmatched_parentheses() {
        assert!(matches!(
            Expression::parse("(A + B"),
            Err(MathError::Syntax { offset: 0, .. })
        ));
        assert!(matches!(
            Expression::parse("A + B)"),
            Err(MathError::Syntax { offset: 5, .. })
        ));
    }

    #[test]
    fn test_unrecognized_character() {
        match Expression::parse("A $ B") {
            Err(MathError::Syntax { offset, message }) => {
                assert_eq!(offset, 2);
                assert!(message.contains("'$'"), "message was: {message}");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }

        match Expression::parse("A + 1abc") {
            Err(MathError::Syntax { message, .. }) => assert!(message.contains("'1abc'")),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            Expression::parse(""),
            Err(MathError::Syntax { .. })
        ));
        assert!(matches!(
            Expression::parse("   \t"),
            Err(MathError::Syntax { .. })
        ));
    }

    #[test]
    fn test_complement_only_in_prefix_position() {
        assert!(matches!(
            Expression::parse("A ! B"),
            Err(MathError::Syntax { offset: 2, .. })
        ));
        assert!(matches!(
            Expression::parse("(A)!"),
            Err(MathError::Syntax { .. })
        ));
        assert!(Expression::parse("A - !B").is_ok());
    }

    #[test]
    fn test_identifiers_are_deduplicated() {
        let expr: Expression = "A + B - A & C".parse().unwrap();
        assert_eq!(expr.identifiers(), vec!["A", "B", "C"]);
        assert_eq!(expr.source(), "A + B - A & C");
    }
}
