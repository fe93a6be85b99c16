use karst_geom::{Color, Vec3};
use proptest::prelude::*;

fn small_f32() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0f32
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (small_f32(), small_f32(), small_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn add_sub_roundtrip(a in vec3(), b in vec3()) {
        let c = a + b - b;
        prop_assert!((c.x - a.x).abs() <= a.x.abs().max(b.x.abs()) * 1e-5 + 1e-4);
        prop_assert!((c.y - a.y).abs() <= a.y.abs().max(b.y.abs()) * 1e-5 + 1e-4);
        prop_assert!((c.z - a.z).abs() <= a.z.abs().max(b.z.abs()) * 1e-5 + 1e-4);
    }

    #[test]
    fn cross_is_orthogonal(a in vec3(), b in vec3()) {
        let c = a.cross(b);
        let scale = (a.dot(a) * b.dot(b)).sqrt().max(1.0);
        prop_assert!(c.dot(a).abs() <= scale * 1e-2);
        prop_assert!(c.dot(b).abs() <= scale * 1e-2);
    }

    #[test]
    fn distance_squared_is_symmetric(a in vec3(), b in vec3()) {
        prop_assert_eq!(a.distance_squared(b), b.distance_squared(a));
    }
}

#[test]
fn color_shade_leaves_alpha() {
    let c = Color::new(0.5, 0.25, 1.0, 0.75).shaded(0.5);
    assert_eq!(c, Color::new(0.25, 0.125, 0.5, 0.75));
}
