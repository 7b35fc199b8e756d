use glam::IVec2;
use smallvec::SmallVec;

use crate::world::{Camera, WorldMap};

/// Velocity added per second of held movement key.
pub const MOVE_SPEED: f32 = 5.0;
pub const RUN_FACTOR: f32 = 1.5;
/// Keyboard turn rate, rad / second.
pub const TURN_RATE: f32 = std::f32::consts::PI;
/// Keyboard pitch rate, screen heights / second.
pub const LOOK_RATE: f32 = 1.0;
/// Radians (or pitch units) per pixel of mouse travel.
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// One frame's worth of player intent, decoupled from the window backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32,  // –1 … +1
    pub strafe: f32,   // –1 … +1  (left / right)
    pub turn: f32,     // –1 … +1  (right / left)
    pub look: f32,     // –1 … +1  (down / up)
    pub mouse_dx: f32, // pixels, + = right
    pub mouse_dy: f32, // pixels, + = down
    pub run: bool,
    pub crouch: bool,
    /// Toggle doors around the player (edge-triggered by the caller).
    pub use_act: bool,
}

/// Apply `cmd` to the camera; returns the door cells toggled this frame.
pub fn player_input(
    camera: &mut Camera,
    world: &mut WorldMap,
    cmd: &InputCmd,
    dt: f32,
) -> SmallVec<[IVec2; 4]> {
    /* 1. look */
    let turn = cmd.turn * TURN_RATE * dt - cmd.mouse_dx * MOUSE_SENSITIVITY;
    if turn != 0.0 {
        camera.rotate(turn);
    }
    let pitch = cmd.look * LOOK_RATE * dt - cmd.mouse_dy * MOUSE_SENSITIVITY;
    if pitch > 0.0 {
        camera.look_up(pitch);
    } else if pitch < 0.0 {
        camera.look_down(-pitch);
    }

    /* 2. move */
    let speed = if cmd.run { MOVE_SPEED * RUN_FACTOR } else { MOVE_SPEED } * dt;
    if cmd.forward > 0.0 {
        camera.move_forward(speed * cmd.forward);
    } else if cmd.forward < 0.0 {
        camera.move_backward(speed * -cmd.forward);
    }
    if cmd.strafe > 0.0 {
        camera.strafe_right(speed * cmd.strafe);
    } else if cmd.strafe < 0.0 {
        camera.strafe_left(speed * -cmd.strafe);
    }

    /* 3. stance & actions */
    camera.crouch(cmd.crouch);
    if cmd.use_act {
        let cell = camera.pos().floor().as_ivec2();
        world.toggle_doors_near(cell)
    } else {
        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::DoorAxis;
    use glam::Vec2;

    fn setup() -> (Camera, WorldMap) {
        let cam = Camera::new(Vec2::new(4.5, 4.5), Vec2::X, Vec2::new(0.0, -0.66));
        (cam, WorldMap::bordered(10, 10))
    }

    #[test]
    fn forward_adds_velocity_along_view() {
        let (mut cam, mut map) = setup();
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };
        player_input(&mut cam, &mut map, &cmd, 0.1);
        assert!((cam.vel().x - 0.5).abs() < 1e-6);
        assert_eq!(cam.vel().y, 0.0);
    }

    #[test]
    fn strafe_right_follows_camera_plane() {
        let (mut cam, mut map) = setup();
        let cmd = InputCmd {
            strafe: 1.0,
            ..Default::default()
        };
        player_input(&mut cam, &mut map, &cmd, 0.1);
        // plane points to -y
        assert!(cam.vel().y < 0.0);
    }

    #[test]
    fn mouse_turns_and_pitches() {
        let (mut cam, mut map) = setup();
        let cmd = InputCmd {
            mouse_dx: -100.0,
            mouse_dy: -50.0,
            ..Default::default()
        };
        player_input(&mut cam, &mut map, &cmd, 0.016);
        // mouse left turns left (counter-clockwise)
        assert!(cam.dir.y > 0.0);
        assert!((cam.pitch - 0.1).abs() < 1e-6);
    }

    #[test]
    fn crouch_follows_key() {
        let (mut cam, mut map) = setup();
        let mut cmd = InputCmd {
            crouch: true,
            ..Default::default()
        };
        player_input(&mut cam, &mut map, &cmd, 0.016);
        assert!(cam.crouching);
        cmd.crouch = false;
        player_input(&mut cam, &mut map, &cmd, 0.016);
        assert_eq!(cam.z, 0.5);
    }

    #[test]
    fn use_toggles_adjacent_doors_only() {
        let (mut cam, mut map) = setup();
        assert!(map.add_door(IVec2::new(5, 5), DoorAxis::Horizontal, 0));
        assert!(map.add_door(IVec2::new(7, 4), DoorAxis::Vertical, 0));
        let cmd = InputCmd {
            use_act: true,
            ..Default::default()
        };
        let toggled = player_input(&mut cam, &mut map, &cmd, 0.016);
        assert_eq!(toggled.as_slice(), &[IVec2::new(5, 5)]);
        assert!(map.door_at(5, 5).is_some_and(|d| d.opening));
        assert!(map.door_at(7, 4).is_some_and(|d| !d.opening));
    }
}
