// src/debug/visualization/svg.rs
use crate::math::{
    error::{MathError, MathResult},
    geometry::{Mesh, RegionRegistry},
    types::*,
};
use std::path::Path;
use svg::Document;
use svg::node::element::{Group, Path as SvgPath, Rectangle};
use tracing::info;

const REGION_COLORS: [&str; 6] = [
    "rgba(200, 150, 255, 0.5)",
    "rgba(150, 255, 150, 0.5)",
    "rgba(255, 220, 150, 0.5)",
    "rgba(150, 200, 255, 0.5)",
    "rgba(255, 150, 150, 0.5)",
    "rgba(220, 220, 120, 0.5)",
];

/// Strichstärken relativ zur Bildgröße.
struct Strokes {
    normal: f64,
    thin: f64,
}

impl Strokes {
    fn for_bounds(bounds: &Bounds2D) -> Self {
        let extent = (bounds.width() + bounds.height()) / 2.0;
        Self {
            normal: extent * 0.004,
            thin: extent * 0.0015,
        }
    }
}

/// Leeres Dokument mit Hintergrund. +y zeigt nach oben, daher beginnt die
/// ViewBox bei `-max.y`; Geometrie kommt in die Gruppe aus `flipped_group`.
fn document(bounds: &Bounds2D, pixel_size: f64) -> Document {
    let bounds = bounds.expand((bounds.width() + bounds.height()) * 0.02);
    Document::new()
        .set("width", pixel_size)
        .set("height", pixel_size)
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                bounds.min.x,
                -bounds.max.y,
                bounds.width(),
                bounds.height()
            ),
        )
        .add(
            Rectangle::new()
                .set("x", bounds.min.x)
                .set("y", -bounds.max.y)
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", "#f0f0f0"),
        )
}

fn flipped_group() -> Group {
    Group::new().set("transform", "scale(1,-1)")
}

/// Pfad-Daten eines Polygons inklusive Löcher (Füllregel evenodd).
fn polygon_path_data(polygon: &Polygon<f64>) -> String {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| {
            let points: Vec<String> = ring
                .0
                .iter()
                .map(|p| format!("{:.6},{:.6}", p.x, p.y))
                .collect();
            format!("M{}Z", points.join(" L"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn polygon_path(polygon: &Polygon<f64>, fill: &str, stroke: &str, width: f64) -> SvgPath {
    SvgPath::new()
        .set("d", polygon_path_data(polygon))
        .set("fill", fill)
        .set("fill-rule", "evenodd")
        .set("stroke", stroke)
        .set("stroke-width", width)
}

/// Alle Regionen der Registry, eine Gruppe je Region mit Tag als `id`.
pub fn regions_svg(registry: &RegionRegistry, pixel_size: f64) -> Document {
    let bounds = registry.bounds().unwrap_or_else(unit_bounds);
    let strokes = Strokes::for_bounds(&bounds);

    let mut shapes = flipped_group();
    for (i, region) in registry.iter().enumerate() {
        let fill = REGION_COLORS[i % REGION_COLORS.len()];
        let mut group = Group::new().set("id", region.tag.clone());
        for polygon in &region.geometry.0 {
            group = group.add(polygon_path(polygon, fill, "#333333", strokes.normal));
        }
        shapes = shapes.add(group);
    }

    document(&bounds, pixel_size).add(shapes)
}

/// Dreiecksnetz, optional über dem Umriss der vernetzten Geometrie.
pub fn mesh_svg(mesh: &Mesh, outline: Option<&MultiPolygon<f64>>, pixel_size: f64) -> Document {
    let bounds = Bounds2D::from_points_iter(mesh.vertices.iter().copied())
        .or_else(|| outline.and_then(Bounds2D::from_geometry))
        .unwrap_or_else(unit_bounds);
    let strokes = Strokes::for_bounds(&bounds);

    let mut group = flipped_group();
    if let Some(outline) = outline {
        for polygon in &outline.0 {
            group = group.add(polygon_path(
                polygon,
                "rgba(150, 200, 255, 0.3)",
                "none",
                0.0,
            ));
        }
    }

    let triangles: Vec<String> = mesh
        .elements()
        .iter()
        .map(|[a, b, c, _]| {
            format!(
                "M{:.6},{:.6} L{:.6},{:.6} L{:.6},{:.6}Z",
                a.x, a.y, b.x, b.y, c.x, c.y
            )
        })
        .collect();
    group = group.add(
        SvgPath::new()
            .set("d", triangles.join(" "))
            .set("fill", "none")
            .set("stroke", "#0000cc")
            .set("stroke-width", strokes.thin),
    );

    let boundary: Vec<String> = mesh
        .boundary_edges()
        .iter()
        .map(|&[a, b]| {
            let (p, q) = (mesh.vertices[a], mesh.vertices[b]);
            format!("M{:.6},{:.6} L{:.6},{:.6}", p.x, p.y, q.x, q.y)
        })
        .collect();
    group = group.add(
        SvgPath::new()
            .set("d", boundary.join(" "))
            .set("fill", "none")
            .set("stroke", "#cc0000")
            .set("stroke-width", strokes.normal),
    );

    document(&bounds, pixel_size).add(group)
}

/// Schreibt ein Dokument auf die Platte.
pub fn save_svg(path: impl AsRef<Path>, document: &Document) -> MathResult<()> {
    let path = path.as_ref();
    svg::save(path, document).map_err(|err| MathError::Export {
        message: format!("{}: {}", path.display(), err),
    })?;
    info!("Debug SVG '{}' wurde erstellt.", path.display());
    Ok(())
}

fn unit_bounds() -> Bounds2D {
    Bounds2D::from_points(Point2D { x: 0.0, y: 0.0 }, Point2D { x: 1.0, y: 1.0 })
}
