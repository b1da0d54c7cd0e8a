// src/math/expression/token.rs

use std::fmt;

/// Mengenoperatoren der Domain-Ausdrücke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+` Vereinigung (A ∪ B)
    Union,
    /// `-` Differenz (A - B)
    Difference,
    /// `*` oder `&` Schnittmenge (A ∩ B)
    Intersection,
    /// `!` Komplement relativ zum Universum, nur in Präfix-Position
    Complement,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Union),
            '-' => Some(Operator::Difference),
            '*' | '&' => Some(Operator::Intersection),
            '!' => Some(Operator::Complement),
            _ => None,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Union | Operator::Difference => 1,
            Operator::Intersection => 2,
            Operator::Complement => 3,
        }
    }

    /// Alle Operatoren außer `!` sind linksassoziativ.
    pub fn is_left_associative(&self) -> bool {
        !self.is_unary()
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Complement)
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Union => '+',
            Operator::Difference => '-',
            Operator::Intersection => '&',
            Operator::Complement => '!',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Token der Infix-Eingabe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{name}"),
            Token::Operator(op) => write!(f, "{op}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// Token der Postfix-Form (RPN), direkt per Stack auswertbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpnToken {
    Identifier(String),
    Operator(Operator),
}

impl fmt::Display for RpnToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpnToken::Identifier(name) => write!(f, "{name}"),
            RpnToken::Operator(op) => write!(f, "{op}"),
        }
    }
}
