// src/math/expression/evaluator.rs

use super::token::{Operator, RpnToken};
use crate::math::{
    algorithms::boolean::{BooleanOpType, RegionBooleanOps},
    error::{MathError, MathResult},
    geometry::RegionRegistry,
    types::*,
};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Lesender Zugriff auf benannte Geometrien.
pub trait RegionLookup {
    fn lookup(&self, tag: &str) -> Option<&MultiPolygon<f64>>;
}

impl RegionLookup for RegionRegistry {
    fn lookup(&self, tag: &str) -> Option<&MultiPolygon<f64>> {
        self.get(tag)
    }
}

impl RegionLookup for HashMap<String, MultiPolygon<f64>> {
    fn lookup(&self, tag: &str) -> Option<&MultiPolygon<f64>> {
        self.get(tag)
    }
}

/// Binäre Operatoren und ihre Boolean-Operation. `!` hat keine.
impl TryFrom<Operator> for BooleanOpType {
    type Error = MathError;

    fn try_from(op: Operator) -> Result<Self, Self::Error> {
        match op {
            Operator::Union => Ok(BooleanOpType::Union),
            Operator::Difference => Ok(BooleanOpType::Difference),
            Operator::Intersection => Ok(BooleanOpType::Intersection),
            Operator::Complement => Err(MathError::InvalidExpression {
                message: format!("operator '{}' is unary", op),
            }),
        }
    }
}

/// Wertet eine RPN-Sequenz mit einem expliziten Stack aus.
///
/// Bezeichner werden nachgeschlagen und ungeklont auf den Stack gelegt; erst
/// Operatoren erzeugen neue Geometrie. `!` bildet `universe - operand`.
pub fn evaluate<L: RegionLookup + ?Sized>(
    rpn: &[RpnToken],
    regions: &L,
    universe: &Bounds2D,
) -> MathResult<MultiPolygon<f64>> {
    let ops = RegionBooleanOps::default();
    let mut stack: Vec<Cow<'_, MultiPolygon<f64>>> = Vec::with_capacity(rpn.len());

    for token in rpn {
        match token {
            RpnToken::Identifier(tag) => {
                let geometry = regions
                    .lookup(tag)
                    .ok_or_else(|| MathError::UnknownTag { tag: tag.clone() })?;
                stack.push(Cow::Borrowed(geometry));
            }
            RpnToken::Operator(Operator::Complement) => {
                let operand = pop_operand(&mut stack, Operator::Complement)?;
                stack.push(Cow::Owned(ops.complement(universe, &operand)));
            }
            RpnToken::Operator(op) => {
                let kind = BooleanOpType::try_from(*op)?;
                let b = pop_operand(&mut stack, *op)?;
                let a = pop_operand(&mut stack, *op)?;
                stack.push(Cow::Owned(ops.execute(&a, &b, kind)));
            }
        }
    }

    let depth = stack.len();
    let result = match stack.pop() {
        Some(geometry) if depth == 1 => geometry.into_owned(),
        _ => {
            return Err(MathError::InvalidExpression {
                message: format!(
                    "expected exactly one operand after evaluation, found {}",
                    depth
                ),
            });
        }
    };
    debug!("Ausdruck ausgewertet: {} Komponenten", result.0.len());
    Ok(result)
}

fn pop_operand<'a>(
    stack: &mut Vec<Cow<'a, MultiPolygon<f64>>>,
    op: Operator,
) -> MathResult<Cow<'a, MultiPolygon<f64>>> {
    let depth = stack.len();
    stack.pop().ok_or_else(|| MathError::InvalidExpression {
        message: format!("operator '{}' is missing an operand (stack depth {})", op, depth),
    })
}
