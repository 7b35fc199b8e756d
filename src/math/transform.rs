use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// OpenGL-style perspective projection, `fov_deg` is the vertical FoV.
#[inline]
pub fn perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_deg.to_radians(), aspect, near, far)
}

/// Right-handed view matrix looking from `eye` at `center`.
#[inline]
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, center, up)
}

/// Rotation from pitch (X), yaw (Z) and roll (Y) angles in radians.
#[inline]
pub fn quat_from_euler(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(EulerRot::ZXY, yaw, pitch, roll)
}

/// Rotate a 2-D vector counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(Vec2::X, FRAC_PI_2);
        assert!((r - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn yaw_quaternion_turns_x_into_y() {
        let q = quat_from_euler(0.0, FRAC_PI_2, 0.0);
        assert!((q * Vec3::X - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn view_projection_maps_target_to_screen_centre() {
        let view = look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), Vec3::Y);
        let proj = perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
        let ndc = (proj * view).project_point3(Vec3::new(0.0, 0.0, -5.0));
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((-1.0..=1.0).contains(&ndc.z));
    }
}
