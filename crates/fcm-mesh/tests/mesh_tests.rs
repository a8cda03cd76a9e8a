//! Integration tests for fcm-mesh.

use approx::assert_relative_eq;
use nalgebra::{DMatrix, Matrix3, Vector3};

use fcm_mesh::generators::{icosahedron, octahedron, quad_grid, tetrahedron};
use fcm_mesh::operators::{face_block, stack_blocks, vertex_matrix, vertices_from_matrix};
use fcm_mesh::{DiscreteOperators, FaceAdjacency, Surface};
use fcm_types::{EdgeId, FaceId, FcmError, VertexId};

// ─── Surface Tests ────────────────────────────────────────────

fn single_triangle() -> Surface {
    Surface {
        vertices: vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
        faces: vec![[0, 1, 2]],
    }
}

#[test]
fn basic_counts() {
    let mesh = single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.vertex(VertexId(1)), Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(mesh.face(0), [0, 1, 2]);
}

#[test]
fn validate_ok() {
    assert!(single_triangle().validate().is_ok());
    assert!(tetrahedron().validate().is_ok());
    assert!(icosahedron(1.0).validate().is_ok());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = single_triangle();
    mesh.faces[0][2] = 99;
    assert!(matches!(mesh.validate(), Err(FcmError::InvalidMesh(_))));
}

#[test]
fn validate_catches_repeated_index() {
    let mut mesh = single_triangle();
    mesh.faces[0] = [0, 0, 1];
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_non_finite() {
    let mut mesh = single_triangle();
    mesh.vertices[1].y = f64::NAN;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_empty() {
    let mesh = Surface {
        vertices: vec![Vector3::zeros()],
        faces: vec![],
    };
    assert!(mesh.validate().is_err());
}

#[test]
fn from_interleaved() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = Surface::from_interleaved(&positions, &[0, 1, 2]).unwrap();
    assert_eq!(mesh, single_triangle());
}

#[test]
fn from_interleaved_rejects_bad_lengths() {
    assert!(Surface::from_interleaved(&[0.0, 1.0], &[0, 1, 2]).is_err());
    assert!(Surface::from_interleaved(&[0.0; 9], &[0, 1]).is_err());
}

#[test]
fn with_vertices_checks_count() {
    let mesh = tetrahedron();
    let moved: Vec<_> = mesh.vertices.iter().map(|p| p * 2.0).collect();
    let scaled = mesh.with_vertices(moved).unwrap();
    assert_eq!(scaled.faces, mesh.faces);
    assert_relative_eq!(scaled.vertices[1], Vector3::new(2.0, 0.0, 0.0));

    let err = mesh.with_vertices(vec![Vector3::zeros()]).unwrap_err();
    assert!(matches!(
        err,
        FcmError::DimensionMismatch {
            expected: 4,
            actual: 1
        }
    ));
}

#[test]
fn center_of_gravity() {
    let c = tetrahedron().center_of_gravity();
    assert_relative_eq!(c, Vector3::new(0.25, 0.25, 0.25), epsilon = 1e-15);
    assert_relative_eq!(octahedron().center_of_gravity(), Vector3::zeros(), epsilon = 1e-15);
}

#[test]
fn serde_roundtrip() {
    let mesh = tetrahedron();
    let json = serde_json::to_string(&mesh).unwrap();
    let back: Surface = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mesh);
}

#[test]
fn json_file_roundtrip() {
    let mesh = octahedron();
    let path = std::env::temp_dir().join(format!("fcm_mesh_{}.json", std::process::id()));
    mesh.save(&path).unwrap();
    let back = Surface::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back, mesh);
}

#[test]
fn json_errors_are_typed() {
    let err = Surface::from_json("{ \"vertices\": [[0, 0, 0]] ").unwrap_err();
    assert!(matches!(err, FcmError::Serialization(_)), "got {err:?}");

    // Well-formed JSON, but an index out of range
    let json = r#"{ "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "faces": [[0, 1, 3]] }"#;
    let err = Surface::from_json(json).unwrap_err();
    assert!(matches!(err, FcmError::InvalidMesh(_)), "got {err:?}");

    let missing = std::env::temp_dir().join("fcm_mesh_does_not_exist.json");
    let err = Surface::load(&missing).unwrap_err();
    assert!(matches!(err, FcmError::Io(_)), "got {err:?}");
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let mesh = quad_grid(3, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.face_count(), 12);
}

#[test]
fn quad_grid_faces_point_up() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    for f in 0..mesh.face_count() {
        let p = mesh.corners(&mesh.vertices, f);
        let n = (p[1] - p[0]).cross(&(p[2] - p[0]));
        assert!(n.z > 0.0, "face {f} normal {n:?}");
    }
}

#[test]
fn closed_solids_have_outward_normals() {
    for mesh in [tetrahedron(), octahedron(), icosahedron(1.0)] {
        let c = mesh.center_of_gravity();
        for f in 0..mesh.face_count() {
            let p = mesh.corners(&mesh.vertices, f);
            let n = (p[1] - p[0]).cross(&(p[2] - p[0]));
            let centroid = (p[0] + p[1] + p[2]) / 3.0;
            assert!(n.dot(&(centroid - c)) > 0.0, "face {f} points inward");
        }
    }
}

#[test]
fn icosahedron_radius() {
    let mesh = icosahedron(2.0);
    for p in &mesh.vertices {
        assert_relative_eq!(p.norm(), 2.0, epsilon = 1e-12);
    }
}

// ─── Adjacency Tests ──────────────────────────────────────────

#[test]
fn closed_mesh_edge_counts() {
    // Closed triangle meshes have 3F/2 edges, all inner
    for (mesh, expected) in [(tetrahedron(), 6), (octahedron(), 12), (icosahedron(1.0), 30)] {
        let adj = FaceAdjacency::build(&mesh).unwrap();
        assert_eq!(adj.edge_count(), expected);
        assert_eq!(adj.boundary_edge_count(), 0);
        assert_eq!(adj.face_count(), mesh.face_count());
        for f in 0..mesh.face_count() {
            assert_eq!(adj.neighbor_count(FaceId(f as u32)), 3);
        }
    }
}

#[test]
fn grid_edge_counts() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let adj = FaceAdjacency::build(&mesh).unwrap();
    // 16 edges in total, 8 on the boundary
    assert_eq!(adj.edge_count(), 8);
    assert_eq!(adj.boundary_edge_count(), 8);
}

#[test]
fn edge_ids_are_sequential_and_symmetric() {
    let mesh = octahedron();
    let adj = FaceAdjacency::build(&mesh).unwrap();

    for (i, edge) in adj.edges().iter().enumerate() {
        assert_eq!(edge.id, EdgeId(i as u32));
        assert!(edge.faces[0] < edge.faces[1]);
        assert!(edge.vertices[0] < edge.vertices[1]);

        let [lo, hi] = edge.faces;
        assert!(adj.neighbors(lo).any(|(g, id)| g == hi && id == edge.id));
        assert!(adj.neighbors(hi).any(|(g, id)| g == lo && id == edge.id));
    }
}

#[test]
fn edge_vertices_belong_to_both_faces() {
    let mesh = icosahedron(1.0);
    let adj = FaceAdjacency::build(&mesh).unwrap();
    for edge in adj.edges() {
        for face in edge.faces {
            let tri = mesh.faces[face.index()];
            for v in edge.vertices {
                assert!(tri.contains(&v.0));
            }
        }
    }
}

#[test]
fn neighbors_are_sorted() {
    let adj = FaceAdjacency::build(&icosahedron(1.0)).unwrap();
    for f in 0..20 {
        let ids: Vec<_> = adj.neighbors(FaceId(f)).map(|(g, _)| g).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}

#[test]
fn neighbors_across_a_single_inner_edge() {
    // Two triangles sharing the diagonal of one quad
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let adj = FaceAdjacency::build(&mesh).unwrap();
    assert_eq!(adj.edge_count(), 1);

    let n0: Vec<_> = adj.neighbors(FaceId(0)).collect();
    let n1: Vec<_> = adj.neighbors(FaceId(1)).collect();
    assert_eq!(n0, vec![(FaceId(1), EdgeId(0))]);
    assert_eq!(n1, vec![(FaceId(0), EdgeId(0))]);

    let grid = quad_grid(3, 2, 1.0, 1.0);
    let adj = FaceAdjacency::build(&grid).unwrap();
    for f in 0..grid.face_count() {
        let face = FaceId(f as u32);
        assert_eq!(adj.neighbors(face).count(), adj.neighbor_count(face));
    }
}

#[test]
fn adjacency_is_deterministic() {
    let mesh = icosahedron(1.0);
    let a = FaceAdjacency::build(&mesh).unwrap();
    let b = FaceAdjacency::build(&mesh).unwrap();
    assert_eq!(a.edges(), b.edges());
}

#[test]
fn non_manifold_edge_is_ignored() {
    // Three triangles sharing the edge (0, 1)
    let mesh = Surface::new(
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]],
    )
    .unwrap();
    let adj = FaceAdjacency::build(&mesh).unwrap();
    assert_eq!(adj.edge_count(), 0);
    assert_eq!(adj.boundary_edge_count(), 6);
}

// ─── Operator Tests ───────────────────────────────────────────

fn operators(mesh: &Surface) -> DiscreteOperators {
    let adj = FaceAdjacency::build(mesh).unwrap();
    DiscreteOperators::build(mesh, &adj).unwrap()
}

#[test]
fn operator_shapes() {
    let mesh = icosahedron(1.0);
    let ops = operators(&mesh);
    assert_eq!(ops.grad.nrows(), 60);
    assert_eq!(ops.grad.ncols(), 12);
    assert_eq!(ops.div.nrows(), 12);
    assert_eq!(ops.div.ncols(), 60);
    assert_eq!(ops.face_areas.len(), 20);
    assert_eq!(ops.edge_areas.len(), 30);
}

#[test]
fn face_areas_of_tetrahedron() {
    let ops = operators(&tetrahedron());
    let mut areas = ops.face_areas.clone();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_relative_eq!(areas[0], 0.5, epsilon = 1e-14);
    assert_relative_eq!(areas[2], 0.5, epsilon = 1e-14);
    assert_relative_eq!(areas[3], 3.0_f64.sqrt() / 2.0, epsilon = 1e-14);
}

#[test]
fn edge_areas_sum_to_total_area() {
    // On a closed mesh every face contributes a third to each of its 3 edges
    let mesh = octahedron();
    let ops = operators(&mesh);
    let total: f64 = ops.face_areas.iter().sum();
    let edges: f64 = ops.edge_areas.iter().sum();
    assert_relative_eq!(edges, total, epsilon = 1e-12);
}

#[test]
fn gradient_of_constant_is_zero() {
    let mesh = icosahedron(1.0);
    let ops = operators(&mesh);
    let ones = DMatrix::from_element(12, 1, 1.0);
    let g = &ops.grad * &ones;
    assert!(g.amax() < 1e-12);
}

#[test]
fn gradient_of_positions_is_tangent_projector() {
    let mesh = icosahedron(1.0);
    let ops = operators(&mesh);
    let blocks = ops.face_gradients(&vertex_matrix(&mesh.vertices));
    for f in 0..mesh.face_count() {
        let p = mesh.corners(&mesh.vertices, f);
        let n = (p[1] - p[0]).cross(&(p[2] - p[0])).normalize();
        let projector = Matrix3::identity() - n * n.transpose();
        assert_relative_eq!(face_block(&blocks, f), projector, epsilon = 1e-12);
    }
}

#[test]
fn laplacian_is_symmetric_with_zero_row_sums() {
    let mesh = icosahedron(1.0);
    let ops = operators(&mesh);
    let lap = &ops.div * &ops.grad;
    let dense = DMatrix::from(&lap);
    assert_relative_eq!(dense.clone(), dense.transpose(), epsilon = 1e-12);
    for i in 0..12 {
        assert!(dense.row(i).sum().abs() < 1e-12);
        assert!(dense[(i, i)] > 0.0);
    }
}

#[test]
fn degenerate_triangle_is_rejected() {
    let mesh = Surface::new(
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();
    let adj = FaceAdjacency::build(&mesh).unwrap();
    assert!(matches!(
        DiscreteOperators::build(&mesh, &adj),
        Err(FcmError::InvalidMesh(_))
    ));
}

#[test]
fn block_helpers() {
    let a = Matrix3::from_diagonal_element(2.0);
    let b = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
    let stacked = stack_blocks(&[a, b]);
    assert_eq!(stacked.nrows(), 6);
    assert_eq!(face_block(&stacked, 0), a);
    assert_eq!(face_block(&stacked, 1), b);

    let verts = tetrahedron().vertices;
    assert_eq!(vertices_from_matrix(&vertex_matrix(&verts)), verts);
}
