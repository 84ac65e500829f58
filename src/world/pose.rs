use glam::{Vec2, vec2};

/// Position and heading of a camera or actor.
///
/// * Only **yaw** is simulated – no roll, no pitch.
/// * `pos` is in grid units: cell `(ix, iy)` spans `[ix, ix+1) × [iy, iy+1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub pos: Vec2,
    pub yaw: f32, // radians (0 = +x, towards +y positive)
    pub fov: f32, // horizontal FoV (radians)
}

impl Pose {
    /// Create a pose at `pos`, facing `yaw`, with horizontal FoV `fov`.
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        Self { pos, yaw, fov }
    }

    /// Transform a world point `p` into camera-local coords:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along forward axis
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos;
        // rotate by -yaw so forward lands on +depth
        let (s, c) = self.yaw.sin_cos();
        let depth = d.x * c + d.y * s;
        let lateral = -d.x * s + d.y * c;
        vec2(lateral, depth)
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the pose looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector pointing to the pose's right (+y is "down" the map).
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /// Cell currently containing `pos`.
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.pos.x.floor() as i32, self.pos.y.floor() as i32)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Displacement for `forward` units ahead and `side` units to the right.
    #[inline]
    pub fn displacement(&self, forward: f32, side: f32) -> Vec2 {
        self.forward() * forward + self.right() * side
    }

    /// Rotate in place (positive = towards +y, i.e. turn right on the map).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }

    /// Half-width of the view plane at depth 1.
    #[inline]
    pub fn plane_half_width(&self) -> f32 {
        (self.fov * 0.5).tan()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn forward_and_right_are_orthonormal() {
        let pose = Pose::new(Vec2::ZERO, 0.3, 1.57);
        let f = pose.forward();
        let r = pose.right();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((f.dot(r)).abs() < 1e-5);
    }

    #[test]
    fn right_points_down_the_map_when_facing_east() {
        let pose = Pose::new(Vec2::ZERO, 0.0, FRAC_PI_2);
        assert!((pose.right() - vec2(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn to_cam_axes_align() {
        let pose = Pose::new(Vec2::ZERO, 0.0, FRAC_PI_2);
        // Point straight ahead at (10, 0) → (lateral=0, depth=10)
        assert!((pose.to_cam(vec2(10.0, 0.0)) - vec2(0.0, 10.0)).length() < 1e-5);
        // Point to the right at (0, 5) → (lateral=5, depth=0)
        assert!((pose.to_cam(vec2(0.0, 5.0)) - vec2(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn to_cam_rotated_yaw() {
        let pose = Pose::new(vec2(1.0, 1.0), FRAC_PI_2, FRAC_PI_2);
        // Yaw = 90°: forward is +Y
        assert!((pose.to_cam(vec2(1.0, 11.0)) - vec2(0.0, 10.0)).length() < 1e-5);
        // behind the camera → negative depth
        assert!(pose.to_cam(vec2(1.0, -2.0)).y < 0.0);
    }

    #[test]
    fn turn_wraps_into_tau() {
        let mut pose = Pose::new(Vec2::ZERO, 0.1, 1.0);
        pose.turn(-0.2);
        assert!(pose.yaw > 6.0 && pose.yaw < std::f32::consts::TAU);
    }

    #[test]
    fn plane_half_width_at_90_deg() {
        let pose = Pose::new(Vec2::ZERO, 0.0, FRAC_PI_2);
        assert!((pose.plane_half_width() - 1.0).abs() < 1e-5);
    }
}
