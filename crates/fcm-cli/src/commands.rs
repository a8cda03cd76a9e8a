//! CLI command implementations.

use std::path::Path;

use fcm_mesh::{FaceAdjacency, Surface};
use fcm_shape::{FcmConfig, FcmCoords, FlatCoords, FundamentalCoords};
use nalgebra::Vector3;
use tracing::info;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Encode a mesh against a reference.
pub fn encode(
    reference_path: &str,
    shape_path: &str,
    output_path: Option<&str>,
    config_path: Option<&str>,
) -> CliResult {
    let space = open_space(reference_path, config_path)?;
    let shape = read_shape(&space, shape_path)?;

    let coords = space.to_coords(&shape.vertices)?;
    info!(
        edges = coords.edge_count(),
        faces = coords.face_count(),
        "Encoded {shape_path}"
    );

    let record = FlatCoords::from(&coords);
    match output_path {
        Some(path) => {
            record.save(path)?;
            info!("Written to {path}");
        }
        None => println!("{}", record.to_json()?),
    }
    Ok(())
}

/// Decode coordinates into a mesh with the reference's faces.
pub fn decode(
    reference_path: &str,
    coords_path: &str,
    output_path: Option<&str>,
    config_path: Option<&str>,
) -> CliResult {
    let space = open_space(reference_path, config_path)?;
    let coords = FcmCoords::try_from(FlatCoords::load(coords_path)?)?;

    let vertices = space.from_coords(&coords)?;
    info!(vertices = vertices.len(), "Decoded {coords_path}");

    emit_mesh(&space, vertices, output_path)
}

/// Evaluate the geodesic between two meshes at `t` and decode it.
pub fn interpolate(
    reference_path: &str,
    from_path: &str,
    to_path: &str,
    t: f64,
    output_path: Option<&str>,
    config_path: Option<&str>,
) -> CliResult {
    let space = open_space(reference_path, config_path)?;

    let x = space.to_coords(&read_shape(&space, from_path)?.vertices)?;
    let y = space.to_coords(&read_shape(&space, to_path)?.vertices)?;
    info!(distance = space.dist(&x, &y), t, "Interpolating");

    let vertices = space.from_coords(&space.geopoint(&x, &y, t))?;
    emit_mesh(&space, vertices, output_path)
}

/// Project a mesh onto the geodesic between two meshes and decode the
/// closest point.
pub fn project(
    reference_path: &str,
    from_path: &str,
    to_path: &str,
    shape_path: &str,
    max_iter: usize,
    output_path: Option<&str>,
    config_path: Option<&str>,
) -> CliResult {
    let space = open_space(reference_path, config_path)?;

    let x = space.to_coords(&read_shape(&space, from_path)?.vertices)?;
    let y = space.to_coords(&read_shape(&space, to_path)?.vertices)?;
    let p = space.to_coords(&read_shape(&space, shape_path)?.vertices)?;

    let closest = space.proj_to_geodesic(&x, &y, &p, max_iter);
    info!(
        from_start = space.dist(&x, &closest),
        length = space.dist(&x, &y),
        residual = space.dist(&closest, &p),
        "Projected {shape_path}"
    );

    let vertices = space.from_coords(&closest)?;
    emit_mesh(&space, vertices, output_path)
}

/// Validate a mesh or a config file.
pub fn validate(path: &str, config_path: Option<&str>) -> CliResult {
    println!("FCM Validator");
    println!("─────────────");
    println!("File: {path}");
    println!();

    let is_toml = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        let config = FcmConfig::load(path)?;
        println!("  Type:              shape-space config");
        println!("  init_face:         {}", config.init_face);
        println!("  init_vert:         {}", config.init_vert);
        println!("  integration_iter:  {}", config.integration_iter);
        println!("  integration_tol:   {:e}", config.integration_tol);
        println!("  rotation_weight:   {}", config.rotation_weight);
        println!("  stretch_weight:    {}", config.stretch_weight);
        println!();

        // init_face and init_vert can only be checked against a mesh
        config.validate_settings()?;
        println!("✓ Config is valid");
        return Ok(());
    }

    let surface = Surface::load(path)?;
    let adjacency = FaceAdjacency::build(&surface)?;
    println!("  Type:              mesh");
    println!("  Vertices:          {}", surface.vertex_count());
    println!("  Faces:             {}", surface.face_count());
    println!("  Inner edges:       {}", adjacency.edge_count());
    println!("  Boundary edges:    {}", adjacency.boundary_edge_count());

    // Building the shape space checks connectivity, degeneracy and
    // factorizability
    let space = FundamentalCoords::new(surface, load_config(config_path)?)?;
    println!("  Shape-space dim:   {}", space.dim());
    println!();
    println!("✓ Mesh is valid");
    Ok(())
}

fn load_config(config_path: Option<&str>) -> CliResult<FcmConfig> {
    match config_path {
        Some(path) => Ok(FcmConfig::load(path)?),
        None => Ok(FcmConfig::from_env()?),
    }
}

fn open_space(reference_path: &str, config_path: Option<&str>) -> CliResult<FundamentalCoords> {
    let config = load_config(config_path)?;
    Ok(FundamentalCoords::new(Surface::load(reference_path)?, config)?)
}

/// Reads a mesh that must share the reference's faces.
fn read_shape(space: &FundamentalCoords, path: &str) -> CliResult<Surface> {
    let shape = Surface::load(path)?;
    if shape.faces != space.reference().surface().faces {
        return Err(format!("{path}: faces differ from the reference mesh").into());
    }
    Ok(shape)
}

fn emit_mesh(
    space: &FundamentalCoords,
    vertices: Vec<Vector3<f64>>,
    output_path: Option<&str>,
) -> CliResult {
    let mesh = space.reference().surface().with_vertices(vertices)?;
    match output_path {
        Some(path) => {
            mesh.save(path)?;
            info!("Written to {path}");
        }
        None => println!("{}", mesh.to_json()?),
    }
    Ok(())
}
