use super::*;
use crate::raster::Vertex;
use kurbo::Point;

fn assert_maps(tri: &RenderTriangle, m: Affine) {
    for v in tri.vertices {
        let p = m * Point::new(v.u, v.v);
        let tol = 1e-6 * (1.0 + v.x.abs().max(v.y.abs()));
        assert!((p.x - v.x).abs() <= tol, "x: {} vs {}", p.x, v.x);
        assert!((p.y - v.y).abs() <= tol, "y: {} vs {}", p.y, v.y);
    }
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit(state: &mut u64) -> f64 {
    *state = mix64(state.wrapping_add(0x9E37_79B9_7F4A_7C15));
    (*state >> 11) as f64 / (1u64 << 53) as f64
}

#[test]
fn identity_triangle_solves_to_identity() {
    let tri = RenderTriangle::new(
        Vertex::new(0.0, 0.0, 0.0, 0.0),
        Vertex::new(64.0, 0.0, 64.0, 0.0),
        Vertex::new(0.0, 64.0, 0.0, 64.0),
    );
    let m = solve_affine(&tri).unwrap();
    let c = m.as_coeffs();
    assert_eq!(c, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn scaled_and_translated_triangle() {
    let tri = RenderTriangle::new(
        Vertex::new(10.0, 20.0, 0.0, 0.0),
        Vertex::new(30.0, 20.0, 10.0, 0.0),
        Vertex::new(10.0, 60.0, 0.0, 10.0),
    );
    let m = solve_affine(&tri).unwrap();
    let c = m.as_coeffs();
    assert!((c[0] - 2.0).abs() < 1e-12);
    assert!((c[3] - 4.0).abs() < 1e-12);
    assert!((c[4] - 10.0).abs() < 1e-12);
    assert!((c[5] - 20.0).abs() < 1e-12);
    assert_maps(&tri, m);
}

#[test]
fn pseudo_random_triangles_reproduce_their_vertices() {
    let mut state = 7u64;
    let mut solved = 0;
    for _ in 0..500 {
        let mut vs = [Vertex::default(); 3];
        for v in &mut vs {
            *v = Vertex::new(
                unit(&mut state) * 800.0 - 100.0,
                unit(&mut state) * 600.0 - 100.0,
                unit(&mut state) * 512.0,
                unit(&mut state) * 512.0,
            );
        }
        let tri = RenderTriangle::new(vs[0], vs[1], vs[2]);
        let du1 = vs[1].u - vs[0].u;
        let dv1 = vs[1].v - vs[0].v;
        let du2 = vs[2].u - vs[0].u;
        let dv2 = vs[2].v - vs[0].v;
        if (du1 * dv2 - du2 * dv1).abs() < 1.0 {
            continue;
        }
        let m = solve_affine(&tri).expect("non-degenerate triangle must solve");
        assert_maps(&tri, m);
        solved += 1;
    }
    assert!(solved > 400);
}

#[test]
fn collinear_uvs_are_degenerate() {
    let tri = RenderTriangle::new(
        Vertex::new(0.0, 0.0, 0.0, 0.0),
        Vertex::new(10.0, 0.0, 5.0, 5.0),
        Vertex::new(0.0, 10.0, 10.0, 10.0),
    );
    assert!(solve_affine(&tri).is_none());
}

#[test]
fn coincident_uvs_are_degenerate() {
    let tri = RenderTriangle::new(
        Vertex::new(0.0, 0.0, 3.0, 3.0),
        Vertex::new(10.0, 0.0, 3.0, 3.0),
        Vertex::new(0.0, 10.0, 3.0, 3.0),
    );
    assert!(solve_affine(&tri).is_none());
}

#[test]
fn nearly_parallel_uv_edges_never_yield_non_finite_coefficients() {
    let tri = RenderTriangle::new(
        Vertex::new(0.0, 0.0, 0.1, 0.2),
        Vertex::new(10.0, 0.0, 0.3, 0.6),
        Vertex::new(0.0, 10.0, 0.7, 1.8),
    );
    if let Some(m) = solve_affine(&tri) {
        assert!(m.as_coeffs().iter().all(|k| k.is_finite()));
    }
}

#[test]
fn zero_area_screen_triangle_still_solves() {
    // A bone scaled to zero collapses positions, not UVs.
    let tri = RenderTriangle::new(
        Vertex::new(5.0, 5.0, 0.0, 0.0),
        Vertex::new(5.0, 5.0, 8.0, 0.0),
        Vertex::new(5.0, 5.0, 0.0, 8.0),
    );
    let m = solve_affine(&tri).unwrap();
    assert_eq!(m.as_coeffs(), [0.0, 0.0, 0.0, 0.0, 5.0, 5.0]);
}

#[test]
fn pixel_uv_scaling_uses_texture_size() {
    let tri = RenderTriangle::new(
        Vertex::new(0.0, 0.0, 0.5, 0.25),
        Vertex::new(1.0, 0.0, 1.0, 0.25),
        Vertex::new(0.0, 1.0, 0.5, 1.0),
    )
    .with_pixel_uvs(256.0, 128.0);
    assert_eq!(tri.vertices[0].u, 128.0);
    assert_eq!(tri.vertices[0].v, 32.0);
    assert_eq!(tri.vertices[2].v, 128.0);
    assert_eq!(tri.vertices[1].x, 1.0);
}
