// src/math/algorithms/triangulation.rs

use crate::math::{
    algorithms::smoothing::{LaplacianSmoother, MeshSmoothing},
    error::{MathError, MathResult},
    geometry::{Mesh, Pslg, PslgBuilder},
    types::*,
    utils::constants,
};
use serde::{Deserialize, Serialize};
use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, PositionInTriangulation, RefinementParameters,
    Triangulation,
};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint>;

/// Optionen der Netzerzeugung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    /// Qualitätsverfeinerung mit Mindestwinkel.
    pub quality: bool,
    /// Mindestwinkel in Grad, gültig in (0, 33].
    pub min_angle: f64,
    /// Maximale Dreiecksfläche.
    pub max_area: Option<f64>,
    /// Randsegmente dürfen für die Delaunay-Eigenschaft geteilt werden.
    pub conforming_delaunay: bool,
    /// Zusammenfassung nur auf Debug-Level loggen.
    pub quiet: bool,
    /// Obergrenze für zusätzliche Steiner-Punkte.
    pub max_steiner: Option<usize>,
    /// Laplace-Glättungsschritte nach der Triangulation.
    pub smoothing_iterations: usize,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            quality: true,
            min_angle: constants::DEFAULT_MIN_ANGLE_DEG,
            max_area: None,
            conforming_delaunay: true,
            quiet: true,
            max_steiner: None,
            smoothing_iterations: 0,
        }
    }
}

impl MeshOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality(mut self, quality: bool) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_min_angle(mut self, degrees: f64) -> Self {
        self.min_angle = degrees;
        self
    }

    pub fn with_max_area(mut self, max_area: f64) -> Self {
        self.max_area = Some(max_area);
        self
    }

    pub fn with_conforming_delaunay(mut self, conforming: bool) -> Self {
        self.conforming_delaunay = conforming;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_max_steiner(mut self, max_steiner: usize) -> Self {
        self.max_steiner = Some(max_steiner);
        self
    }

    pub fn with_smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.min_angle.is_finite()
            || self.min_angle <= 0.0
            || self.min_angle > constants::MAX_MIN_ANGLE_DEG
        {
            return Err(MathError::configuration(format!(
                "min_angle must be in (0, {}], got {}",
                constants::MAX_MIN_ANGLE_DEG,
                self.min_angle
            )));
        }
        if let Some(max_area) = self.max_area {
            if !max_area.is_finite() || max_area <= 0.0 {
                return Err(MathError::configuration(format!(
                    "max_area must be positive and finite, got {}",
                    max_area
                )));
            }
        }
        Ok(())
    }

    pub fn flags(&self) -> TriangulationFlags {
        TriangulationFlags::from(self)
    }
}

/// Aufgelöste Schalter für die Triangulation.
///
/// `Display` erzeugt die klassische Schalterkette (`pq25a0.1DQ`), praktisch fürs Logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulationFlags {
    pub min_angle: Option<f64>,
    pub max_area: Option<f64>,
    pub conforming_delaunay: bool,
    pub max_steiner: Option<usize>,
    pub quiet: bool,
}

impl From<&MeshOptions> for TriangulationFlags {
    fn from(options: &MeshOptions) -> Self {
        Self {
            min_angle: options.quality.then_some(options.min_angle),
            max_area: options.max_area,
            conforming_delaunay: options.conforming_delaunay,
            max_steiner: options.max_steiner,
            quiet: options.quiet,
        }
    }
}

impl TriangulationFlags {
    /// Ohne Winkel- und Flächenvorgabe bleibt es bei der reinen CDT.
    pub fn needs_refinement(&self) -> bool {
        self.min_angle.is_some() || self.max_area.is_some()
    }

    pub fn vertex_budget(&self) -> usize {
        if self.needs_refinement() {
            self.max_steiner.unwrap_or(constants::DEFAULT_MAX_STEINER)
        } else {
            0
        }
    }

    pub fn to_refinement_parameters(&self) -> RefinementParameters<f64> {
        let angle_limit = match self.min_angle {
            Some(degrees) => AngleLimit::from_deg(degrees),
            // 0° schaltet die Winkelverfeinerung ab
            None => AngleLimit::from_deg(0.0),
        };
        let mut parameters = RefinementParameters::new()
            .with_angle_limit(angle_limit)
            .exclude_outer_faces(true)
            .with_max_additional_vertices(self.vertex_budget());
        if let Some(max_area) = self.max_area {
            parameters = parameters.with_max_allowed_area(max_area);
        }
        if !self.conforming_delaunay {
            parameters = parameters.keep_constraint_edges();
        }
        parameters
    }
}

impl fmt::Display for TriangulationFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p")?;
        if let Some(angle) = self.min_angle {
            write!(f, "q{}", angle)?;
        }
        if let Some(area) = self.max_area {
            write!(f, "a{}", area)?;
        }
        if self.conforming_delaunay {
            write!(f, "D")?;
        }
        if let Some(steiner) = self.max_steiner {
            write!(f, "S{}", steiner)?;
        }
        if self.quiet {
            write!(f, "Q")?;
        }
        Ok(())
    }
}

/// Constrained-Delaunay-Triangulation eines PSLG mit Qualitätsverfeinerung.
#[derive(Debug, Clone)]
pub struct TriangulationDriver {
    options: MeshOptions,
    flags: TriangulationFlags,
}

impl TriangulationDriver {
    pub fn new(options: MeshOptions) -> MathResult<Self> {
        options.validate()?;
        let flags = options.flags();
        Ok(Self { options, flags })
    }

    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    pub fn flags(&self) -> TriangulationFlags {
        self.flags
    }

    pub fn triangulate(&self, pslg: &Pslg) -> MathResult<Mesh> {
        if pslg.is_empty() {
            return Err(MathError::EmptyDomain {
                reason: "PSLG has no vertices or segments".to_string(),
            });
        }
        pslg.validate()?;
        debug!("Trianguliere mit Schaltern '{}'", self.flags);

        let mut cdt = Cdt::new();
        let handles = insert_vertices(&mut cdt, &pslg.vertices)?;
        insert_segments(&mut cdt, pslg, &handles)?;
        let input_vertices = cdt.num_vertices();

        let result = cdt.refine(self.flags.to_refinement_parameters());
        if !result.refinement_complete && self.flags.needs_refinement() {
            warn!(
                "Steiner-Limit von {} Punkten erreicht, Netz ist evtl. gröber als gefordert",
                self.flags.vertex_budget()
            );
        }

        let mut removed: HashSet<FixedFaceHandle<InnerTag>> =
            result.excluded_faces.into_iter().collect();
        let from_seeds = hole_faces(&cdt, &pslg.holes, &removed);
        removed.extend(from_seeds);

        let mesh = extract_mesh(&cdt, &removed);
        if mesh.is_empty() {
            return Err(MathError::triangulation(
                "no triangles left inside the domain",
            ));
        }
        mesh.validate()?;

        let steiner = cdt.num_vertices().saturating_sub(input_vertices);
        if self.options.quiet {
            debug!(
                "Netz: {} Vertices, {} Dreiecke, {} Steiner-Punkte",
                mesh.vertices.len(),
                mesh.triangles.len(),
                steiner
            );
        } else {
            info!(
                "Netz: {} Vertices, {} Dreiecke, {} Steiner-Punkte",
                mesh.vertices.len(),
                mesh.triangles.len(),
                steiner
            );
        }
        Ok(mesh)
    }
}

fn insert_vertices(cdt: &mut Cdt, vertices: &[Point2D]) -> MathResult<Vec<FixedVertexHandle>> {
    vertices
        .iter()
        .map(|&vertex| {
            cdt.insert(to_spade_point(vertex)).map_err(|err| {
                MathError::triangulation(format!(
                    "vertex ({}, {}) rejected: {:?}",
                    vertex.x, vertex.y, err
                ))
            })
        })
        .collect()
}

fn insert_segments(cdt: &mut Cdt, pslg: &Pslg, handles: &[FixedVertexHandle]) -> MathResult<()> {
    for &[a, b] in &pslg.segments {
        let (from, to) = (handles[a], handles[b]);
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(MathError::triangulation(format!(
                "segment ({}, {}) crosses another boundary segment",
                a, b
            )));
        }
        cdt.add_constraint(from, to);
    }
    Ok(())
}

/// Alle Dreiecke, die von einem Loch-Seed aus ohne Überqueren eines Randsegments erreichbar sind.
///
/// Ein Seed zählt nur, wenn sein Dreieck schon von der Paritätsregel
/// ausgeschlossen wurde. Liegt er in einem behaltenen Dreieck (etwa in einer
/// Insel), würde die Flutfüllung gültige Fläche löschen.
fn hole_faces(
    cdt: &Cdt,
    holes: &[Point2D],
    excluded: &HashSet<FixedFaceHandle<InnerTag>>,
) -> HashSet<FixedFaceHandle<InnerTag>> {
    let mut queue: Vec<FixedFaceHandle<InnerTag>> = Vec::new();
    for &seed in holes {
        let candidates: Vec<FixedFaceHandle<InnerTag>> = match cdt.locate(to_spade_point(seed)) {
            PositionInTriangulation::OnFace(face) => vec![face],
            PositionInTriangulation::OnEdge(edge) => {
                let edge = cdt.directed_edge(edge);
                [edge.face(), edge.rev().face()]
                    .into_iter()
                    .filter_map(|face| face.as_inner().map(|inner| inner.fix()))
                    .collect()
            }
            PositionInTriangulation::OnVertex(vertex) => cdt
                .vertex(vertex)
                .out_edges()
                .filter_map(|edge| edge.face().as_inner().map(|inner| inner.fix()))
                .collect(),
            _ => Vec::new(),
        };

        let before = queue.len();
        queue.extend(candidates.into_iter().filter(|face| excluded.contains(face)));
        if queue.len() == before {
            warn!(
                "Loch-Seed ({}, {}) liegt in keinem Loch-Dreieck, ignoriert",
                seed.x, seed.y
            );
        }
    }

    let mut visited = HashSet::new();
    while let Some(fixed) = queue.pop() {
        if !visited.insert(fixed) {
            continue;
        }
        for edge in cdt.face(fixed).adjacent_edges() {
            if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            if let Some(neighbor) = edge.rev().face().as_inner() {
                queue.push(neighbor.fix());
            }
        }
    }
    visited
}

/// Übrige Dreiecke plus die von ihnen benutzten Vertices (Reihenfolge bleibt erhalten).
fn extract_mesh(cdt: &Cdt, removed: &HashSet<FixedFaceHandle<InnerTag>>) -> Mesh {
    let triangles: Vec<[usize; 3]> = cdt
        .inner_faces()
        .filter(|face| !removed.contains(&face.fix()))
        .map(|face| face.vertices().map(|vertex| vertex.fix().index()))
        .collect();

    let mut used = vec![false; cdt.num_vertices()];
    for &index in triangles.iter().flatten() {
        used[index] = true;
    }

    let mut remap = vec![usize::MAX; used.len()];
    let mut vertices = Vec::new();
    for (vertex, is_used) in cdt.vertices().zip(&used) {
        if *is_used {
            remap[vertex.fix().index()] = vertices.len();
            vertices.push(from_spade_point(vertex.position()));
        }
    }

    let triangles = triangles
        .into_iter()
        .map(|triangle| triangle.map(|index| remap[index]))
        .collect();
    Mesh::new(vertices, triangles)
}

/// Geometrie -> PSLG -> Triangulation -> optionale Glättung.
pub fn generate_mesh(geometry: &MultiPolygon<f64>, options: &MeshOptions) -> MathResult<Mesh> {
    let driver = TriangulationDriver::new(options.clone())?;
    let pslg = PslgBuilder::new().build(geometry)?;
    let mesh = driver.triangulate(&pslg)?;

    if options.smoothing_iterations == 0 {
        return Ok(mesh);
    }
    Ok(LaplacianSmoother::new(options.smoothing_iterations).smooth(&mesh))
}
