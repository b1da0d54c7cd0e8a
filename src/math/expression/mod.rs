// src/math/expression/mod.rs

// Mengenalgebra über benannte Regionen: Tokenizer, Shunting-Yard, Stack-Auswertung
pub mod calculator;
pub mod evaluator;
pub mod parser;
pub mod token;

pub use self::calculator::{DomainCalculator, DomainResult, RESULT_TAG_PREFIX};
pub use self::evaluator::{RegionLookup, evaluate};
pub use self::parser::{Expression, SpannedToken, to_rpn, tokenize};
pub use self::token::{Operator, RpnToken, Token};
