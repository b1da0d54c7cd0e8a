// src/math/geometry/region.rs

use crate::math::{
    error::{MathError, MathResult},
    expression::DomainResult,
    geometry::shapes::Shape,
    types::*,
};
use geo::BooleanOps;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Stabiler Handle einer Region. Wird nie wiederverwendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

impl RegionId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Benannte Geometrie in der Registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub tag: String,
    pub geometry: MultiPolygon<f64>,
}

/// Wie ein Ergebnis des Domain-Calculators eingetragen wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Operanden bleiben erhalten, nur gleichnamige Regionen werden ersetzt.
    #[default]
    KeepOperands,
    /// Alle im Ausdruck referenzierten Regionen werden durch das Ergebnis ersetzt.
    ReplaceOperands,
}

/// Prüft ein Tag gegen `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn validate_tag(tag: &str) -> MathResult<()> {
    if is_valid_tag(tag) {
        Ok(())
    } else {
        Err(MathError::InvalidTag {
            tag: tag.to_string(),
        })
    }
}

/// Eine finalisierte Geometrie braucht mindestens eine Komponente mit >= 3 Außenpunkten.
fn validate_geometry(geometry: &MultiPolygon<f64>) -> MathResult<()> {
    let max_points = geometry
        .0
        .iter()
        .map(|polygon| {
            let ring = &polygon.exterior().0;
            // geo-Ringe sind geschlossen, der Schlusspunkt zählt nicht
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.len() - 1
            } else {
                ring.len()
            }
        })
        .max()
        .unwrap_or(0);

    if max_points < 3 {
        return Err(MathError::InsufficientPoints {
            expected: 3,
            actual: max_points,
        });
    }
    Ok(())
}

/// Arena aller benannten Regionen: Handle -> Geometrie plus Tag-Index.
///
/// Einzige Quelle der Wahrheit für benannte Formen. Die Auswertung von
/// Ausdrücken liest nur; Änderungen laufen ausschließlich über diese API.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    regions: BTreeMap<RegionId, Region>,
    tags: BTreeMap<String, RegionId>,
    next_id: u32,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Registriert eine Geometrie unter einem neuen Tag.
    pub fn insert(
        &mut self,
        tag: impl Into<String>,
        geometry: impl Into<MultiPolygon<f64>>,
    ) -> MathResult<RegionId> {
        let tag = tag.into();
        let geometry = geometry.into();
        validate_tag(&tag)?;
        if self.contains(&tag) {
            return Err(MathError::DuplicateTag { tag });
        }
        validate_geometry(&geometry)?;
        Ok(self.insert_unchecked(tag, geometry))
    }

    fn insert_unchecked(&mut self, tag: String, geometry: MultiPolygon<f64>) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        debug!("Region '{}' registriert als {:?}", tag, id);
        self.tags.insert(tag.clone(), id);
        self.regions.insert(id, Region { id, tag, geometry });
        id
    }

    pub fn insert_shape(&mut self, tag: impl Into<String>, shape: &Shape) -> MathResult<RegionId> {
        let polygon = shape.to_polygon()?;
        self.insert(tag, polygon)
    }

    /// Registriert eine Form unter dem nächsten freien Tag ihres Präfixes.
    pub fn insert_auto(&mut self, shape: &Shape) -> MathResult<(String, RegionId)> {
        let tag = self.next_free_tag(shape.tag_prefix());
        let id = self.insert_shape(tag.clone(), shape)?;
        Ok((tag, id))
    }

    /// Erster freier Tag der Form `<prefix><n>` mit n >= 1.
    pub fn next_free_tag(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{prefix}{n}"))
            .find(|tag| !self.contains(tag))
            .unwrap_or_else(|| prefix.to_string())
    }

    pub fn get(&self, tag: &str) -> Option<&MultiPolygon<f64>> {
        self.id_of(tag).and_then(|id| self.get_by_id(id))
    }

    pub fn get_by_id(&self, id: RegionId) -> Option<&MultiPolygon<f64>> {
        self.regions.get(&id).map(|region| &region.geometry)
    }

    pub fn region(&self, tag: &str) -> Option<&Region> {
        self.id_of(tag).and_then(|id| self.regions.get(&id))
    }

    pub fn id_of(&self, tag: &str) -> Option<RegionId> {
        self.tags.get(tag).copied()
    }

    pub fn remove(&mut self, tag: &str) -> Option<Region> {
        let id = self.tags.remove(tag)?;
        debug!("Region '{}' entfernt", tag);
        self.regions.remove(&id)
    }

    /// Alle Tags in sortierter Reihenfolge.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.keys().map(String::as_str)
    }

    /// Regionen in Erstellungsreihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.values()
    }

    /// Bounding Box aller Regionen, nutzbar als Ersatz-Universum.
    pub fn bounds(&self) -> Option<Bounds2D> {
        self.regions
            .values()
            .filter_map(|region| Bounds2D::from_geometry(&region.geometry))
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Vereinigung aller registrierten Regionen.
    pub fn union_all(&self) -> MultiPolygon<f64> {
        self.regions
            .values()
            .fold(MultiPolygon::new(vec![]), |acc, region| {
                acc.union(&region.geometry)
            })
    }

    /// Trägt ein Ergebnis des Domain-Calculators atomar ein.
    ///
    /// Erst wird alles geprüft, dann werden verdrängte Regionen entfernt und die
    /// Komponenten eingefügt. Bei einem Fehler bleibt die Registry unverändert.
    pub fn commit(&mut self, result: &DomainResult, mode: CommitMode) -> MathResult<Vec<RegionId>> {
        let mut superseded: BTreeSet<String> = result
            .components
            .iter()
            .map(|(tag, _)| tag.clone())
            .filter(|tag| self.contains(tag))
            .collect();
        if mode == CommitMode::ReplaceOperands {
            superseded.extend(
                result
                    .expression
                    .identifiers()
                    .into_iter()
                    .filter(|tag| self.contains(tag))
                    .map(str::to_string),
            );
        }

        let mut seen = BTreeSet::new();
        for (tag, polygon) in &result.components {
            validate_tag(tag)?;
            if !seen.insert(tag.as_str()) {
                return Err(MathError::DuplicateTag { tag: tag.clone() });
            }
            validate_geometry(&MultiPolygon::new(vec![polygon.clone()]))?;
        }

        for tag in &superseded {
            self.remove(tag);
        }
        Ok(result
            .components
            .iter()
            .map(|(tag, polygon)| {
                self.insert_unchecked(tag.clone(), MultiPolygon::new(vec![polygon.clone()]))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, coord};

    fn unit_square() -> Shape {
        Shape::rectangle(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 })
    }

    #[test]
    fn test_tag_grammar() {
        assert!(is_valid_tag("P1"));
        assert!(is_valid_tag("_tmp"));
        assert!(is_valid_tag("a_B_9"));
        assert!(!is_valid_tag(""));
        assert!(!is_valid_tag("1P"));
        assert!(!is_valid_tag("P-1"));
        assert!(!is_valid_tag("Ä"));
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = RegionRegistry::new();
        let id = registry.insert_shape("A", &unit_square()).unwrap();
        assert_eq!(registry.id_of("A"), Some(id));
        assert_relative_eq!(registry.get("A").unwrap().unsigned_area(), 1.0);
        assert!(registry.get("a").is_none(), "tags are case-sensitive");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_rejects_bad_input() {
        let mut registry = RegionRegistry::new();
        registry.insert_shape("A", &unit_square()).unwrap();

        assert!(matches!(
            registry.insert_shape("A", &unit_square()),
            Err(MathError::DuplicateTag { .. })
        ));
        assert!(matches!(
            registry.insert_shape("9x", &unit_square()),
            Err(MathError::InvalidTag { .. })
        ));
        assert!(matches!(
            registry.insert("B", MultiPolygon::<f64>::new(vec![])),
            Err(MathError::InsufficientPoints { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut registry = RegionRegistry::new();
        let first = registry.insert_shape("A", &unit_square()).unwrap();
        registry.remove("A").unwrap();
        let second = registry.insert_shape("A", &unit_square()).unwrap();
        assert_ne!(first, second);
        assert!(registry.get_by_id(first).is_none());
    }

    #[test]
    fn test_auto_tags() {
        let mut registry = RegionRegistry::new();
        let (tag1, _) = registry.insert_auto(&unit_square()).unwrap();
        let (tag2, _) = registry.insert_auto(&unit_square()).unwrap();
        let (tag3, _) = registry
            .insert_auto(&Shape::circle(coord! { x: 0.0, y: 0.0 }, 1.0, 16))
            .unwrap();
        assert_eq!((tag1.as_str(), tag2.as_str(), tag3.as_str()), ("R1", "R2", "C1"));
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec!["C1", "R1", "R2"]);
    }

    #[test]
    fn test_bounds_and_union_all() {
        let mut registry = RegionRegistry::new();
        assert!(registry.bounds().is_none());
        registry.insert_shape("A", &unit_square()).unwrap();
        registry
            .insert_shape(
                "B",
                &Shape::rectangle(coord! { x: 0.5, y: 0.0 }, coord! { x: 2.0, y: 1.0 }),
            )
            .unwrap();

        let bounds = registry.bounds().unwrap();
        assert_eq!(bounds.max, coord! { x: 2.0, y: 1.0 });
        assert_relative_eq!(registry.union_all().unsigned_area(), 2.0, epsilon = 1e-9);
    }
}
