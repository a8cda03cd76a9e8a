//! Procedural meshes for tests and demos.
//!
//! All generators produce consistently oriented faces; closed meshes
//! have outward-facing normals.

use nalgebra::Vector3;

use crate::mesh::Surface;

/// The corner tetrahedron spanned by the origin and the unit axes.
///
/// ```
/// use fcm_mesh::generators::tetrahedron;
/// let mesh = tetrahedron();
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.face_count(), 4);
/// ```
pub fn tetrahedron() -> Surface {
    Surface {
        vertices: vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        faces: vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    }
}

/// Regular octahedron with vertices on the unit axes.
pub fn octahedron() -> Surface {
    Surface {
        vertices: vec![
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ],
        faces: vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    }
}

/// Regular icosahedron inscribed in the sphere of radius `radius`.
pub fn icosahedron(radius: f64) -> Surface {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let raw = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let vertices = raw
        .iter()
        .map(|&[x, y, z]| Vector3::new(x, y, z).normalize() * radius)
        .collect();

    Surface {
        vertices,
        faces: vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ],
    }
}

/// Generates a flat rectangular quad grid in the XY plane.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0, faces facing +Z.
///
/// # Arguments
/// - `cols`: Number of quads along X (vertex count = cols + 1).
/// - `rows`: Number of quads along Y (vertex count = rows + 1).
///
/// # Example
/// ```
/// use fcm_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.face_count(), 8);    // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: f64, height: f64) -> Surface {
    let verts_x = cols + 1;
    let verts_y = rows + 1;

    let half_w = width / 2.0;
    let half_h = height / 2.0;

    let mut vertices = Vec::with_capacity(verts_x * verts_y);
    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as f64 / cols as f64;
            let v = j as f64 / rows as f64;
            vertices.push(Vector3::new(-half_w + u * width, half_h - v * height, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(cols * rows * 2);
    for j in 0..rows {
        for i in 0..cols {
            let top_left = (j * verts_x + i) as u32;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x as u32;
            let bot_right = bot_left + 1;

            faces.push([top_left, bot_left, top_right]);
            faces.push([top_right, bot_left, bot_right]);
        }
    }

    Surface { vertices, faces }
}
