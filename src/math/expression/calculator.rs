// src/math/expression/calculator.rs

use super::{evaluator::evaluate, parser::Expression};
use crate::math::{
    error::{MathError, MathResult},
    geometry::{RegionRegistry, is_valid_tag},
    types::*,
    utils::constants,
};
use geo::Area;
use tracing::{debug, info};

/// Präfix für automatisch vergebene Ergebnis-Tags.
pub const RESULT_TAG_PREFIX: &str = "D";

/// Ergebnis einer Domain-Berechnung, noch nicht in der Registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainResult {
    pub expression: Expression,
    pub geometry: MultiPolygon<f64>,
    /// Komponenten mit ihren Tags: `tag`, `tag_1`, `tag_2`, ...
    pub components: Vec<(String, Polygon<f64>)>,
}

impl DomainResult {
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.components.iter().map(|(tag, _)| tag.as_str())
    }
}

/// Parst und wertet Ausdrücke gegen eine Registry aus, ohne sie zu verändern.
pub struct DomainCalculator<'a> {
    registry: &'a RegionRegistry,
}

impl<'a> DomainCalculator<'a> {
    pub fn new(registry: &'a RegionRegistry) -> Self {
        Self { registry }
    }

    /// Berechnet `expression` und benennt die Komponenten.
    ///
    /// Ohne `result_tag` wird der nächste freie `D`-Tag verwendet. Ein Ergebnis
    /// ohne Fläche ist ein `EmptyResult`-Fehler.
    pub fn compute(
        &self,
        expression: &str,
        result_tag: Option<&str>,
        universe: &Bounds2D,
    ) -> MathResult<DomainResult> {
        let tag = match result_tag.map(str::trim).filter(|tag| !tag.is_empty()) {
            Some(tag) if is_valid_tag(tag) => tag.to_string(),
            Some(tag) => {
                return Err(MathError::InvalidTag {
                    tag: tag.to_string(),
                });
            }
            None => self.registry.next_free_tag(RESULT_TAG_PREFIX),
        };

        let universe = Bounds2D::new(universe.min, universe.max)?;
        let expression = Expression::parse(expression)?;
        debug!(
            "RPN für '{}': {} (Universum {})",
            expression.source(),
            expression,
            universe
        );

        let geometry = evaluate(expression.rpn(), self.registry, &universe)?;
        let polygons: Vec<Polygon<f64>> = geometry
            .0
            .iter()
            .filter(|polygon| polygon.unsigned_area() > constants::AREA_EPSILON)
            .cloned()
            .collect();
        if polygons.is_empty() {
            return Err(MathError::EmptyResult {
                expression: expression.source().to_string(),
            });
        }

        let components: Vec<(String, Polygon<f64>)> = polygons
            .iter()
            .enumerate()
            .map(|(i, polygon)| {
                let name = if i == 0 {
                    tag.clone()
                } else {
                    format!("{tag}_{i}")
                };
                (name, polygon.clone())
            })
            .collect();

        info!(
            "Domain '{}' = {} ({} Komponenten)",
            tag,
            expression.source(),
            components.len()
        );
        Ok(DomainResult {
            expression,
            geometry: MultiPolygon::new(polygons),
            components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{
        algorithms::boolean::nearly_equal,
        geometry::{CommitMode, Shape},
    };
    use approx::assert_relative_eq;
    use geo::coord;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn universe() -> Bounds2D {
        Bounds2D::from_points(coord! { x: -10.0, y: -10.0 }, coord! { x: 10.0, y: 10.0 })
    }

    fn registry_ab() -> RegionRegistry {
        let mut registry = RegionRegistry::new();
        registry
            .insert_shape(
                "A",
                &Shape::rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 2.0 }),
            )
            .unwrap();
        registry
            .insert_shape("B", &Shape::circle(coord! { x: 2.0, y: 2.0 }, 1.0, 32))
            .unwrap();
        registry
    }

    #[test]
    fn test_union_is_idempotent() {
        let registry = registry_ab();
        let result = DomainCalculator::new(&registry)
            .compute("A + A", Some("AA"), &universe())
            .unwrap();
        assert!(nearly_equal(
            &result.geometry,
            registry.get("A").unwrap(),
            1e-9
        ));
        assert_eq!(result.tags().collect::<Vec<_>>(), vec!["AA"]);
    }

    #[test]
    fn test_self_difference_is_empty() {
        let registry = registry_ab();
        let result = DomainCalculator::new(&registry).compute("A - A", None, &universe());
        assert!(matches!(result, Err(MathError::EmptyResult { .. })));
    }

    #[test]
    fn test_de_morgan_on_random_rectangles() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mut registry = RegionRegistry::new();
            for tag in ["A", "B"] {
                let x: f64 = rng.random_range(-8.0..6.0);
                let y: f64 = rng.random_range(-8.0..6.0);
                let w: f64 = rng.random_range(0.5..2.0);
                let h: f64 = rng.random_range(0.5..2.0);
                registry
                    .insert_shape(
                        tag,
                        &Shape::rectangle(coord! { x: x, y: y }, coord! { x: x + w, y: y + h }),
                    )
                    .unwrap();
            }

            let calculator = DomainCalculator::new(&registry);
            let lhs = calculator.compute("!(A + B)", None, &universe()).unwrap();
            let rhs = calculator.compute("!A & !B", None, &universe()).unwrap();
            assert!(nearly_equal(&lhs.geometry, &rhs.geometry, 1e-6));
            assert_relative_eq!(lhs.area(), rhs.area(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_multi_component_naming() {
        let mut registry = registry_ab();
        registry
            .insert_shape(
                "F",
                &Shape::rectangle(coord! { x: 6.0, y: 6.0 }, coord! { x: 7.0, y: 7.0 }),
            )
            .unwrap();
        let result = DomainCalculator::new(&registry)
            .compute("A + F", None, &universe())
            .unwrap();

        assert_eq!(result.tags().collect::<Vec<_>>(), vec!["D1", "D1_1"]);
        assert_relative_eq!(result.area(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_explicit_tag_must_be_valid() {
        let registry = registry_ab();
        let result = DomainCalculator::new(&registry).compute("A", Some("1bad"), &universe());
        assert!(matches!(result, Err(MathError::InvalidTag { .. })));
    }

    #[test]
    fn test_inverted_universe_is_rejected() {
        let registry = registry_ab();
        let inverted = Bounds2D {
            min: coord! { x: 10.0, y: 10.0 },
            max: coord! { x: -10.0, y: -10.0 },
        };
        let result = DomainCalculator::new(&registry).compute("!A", None, &inverted);
        assert!(matches!(
            result,
            Err(MathError::InvalidConfiguration { .. })
        ));

        let unbounded = Bounds2D {
            min: coord! { x: f64::NEG_INFINITY, y: 0.0 },
            max: coord! { x: 1.0, y: 1.0 },
        };
        assert!(DomainCalculator::new(&registry).compute("A", None, &unbounded).is_err());
    }

    #[test]
    fn test_registry_is_not_mutated() {
        let registry = registry_ab();
        let before: Vec<String> = registry.tags().map(str::to_string).collect();
        let _ = DomainCalculator::new(&registry).compute("A - B", None, &universe());
        let _ = DomainCalculator::new(&registry).compute("A - Z", None, &universe());
        let after: Vec<String> = registry.tags().map(str::to_string).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_commit_keeps_operands() {
        let mut registry = registry_ab();
        let result = DomainCalculator::new(&registry)
            .compute("A - B", None, &universe())
            .unwrap();
        let ids = registry.commit(&result, CommitMode::KeepOperands).unwrap();

        assert_eq!(ids.len(), 1);
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec!["A", "B", "D1"]);
        assert_relative_eq!(
            registry.get("D1").unwrap().unsigned_area(),
            result.area(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_commit_replaces_operands() {
        let mut registry = registry_ab();
        let result = DomainCalculator::new(&registry)
            .compute("A + B", Some("A"), &universe())
            .unwrap();
        registry.commit(&result, CommitMode::ReplaceOperands).unwrap();

        assert_eq!(registry.tags().collect::<Vec<_>>(), vec!["A"]);
        assert!(registry.get("A").unwrap().unsigned_area() > 4.0);
    }

    #[test]
    fn test_commit_is_atomic() {
        let mut registry = registry_ab();
        let mut result = DomainCalculator::new(&registry)
            .compute("A + B", None, &universe())
            .unwrap();
        result.components.push((
            "bad tag".to_string(),
            result.components[0].1.clone(),
        ));

        let outcome = registry.commit(&result, CommitMode::ReplaceOperands);
        assert!(matches!(outcome, Err(MathError::InvalidTag { .. })));
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
