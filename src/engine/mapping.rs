/// How screen columns spread across the field of view.
///
/// Both the wall scan and the sprite projector go through the same mapping,
/// so a sprite standing against a wall lands on the columns that wall
/// occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnMapping {
    /// Ray angle is linear in the column index across `[yaw - fov/2, yaw + fov/2]`.
    #[default]
    Angular,
    /// Rays cross a flat camera plane at even intervals.
    Planar,
}

impl ColumnMapping {
    /// Tangent of the angle between column `column`'s ray and the forward
    /// axis (+ = right). Rays go through column centres.
    #[inline]
    pub fn ray_slope(self, column: usize, columns: usize, fov: f32) -> f32 {
        let s = 2.0 * (column as f32 + 0.5) / columns as f32 - 1.0;
        match self {
            ColumnMapping::Angular => (s * fov * 0.5).tan(),
            ColumnMapping::Planar => s * (fov * 0.5).tan(),
        }
    }

    /// Continuous screen x (in columns, `0..columns`) of a camera-space point.
    ///
    /// `depth` must be positive.
    #[inline]
    pub fn screen_x(self, lateral: f32, depth: f32, columns: usize, fov: f32) -> f32 {
        let slope = lateral / depth;
        let s = match self {
            ColumnMapping::Angular => slope.atan() / (fov * 0.5),
            ColumnMapping::Planar => slope / (fov * 0.5).tan(),
        };
        (s + 1.0) * 0.5 * columns as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_column_looks_straight_ahead() {
        for m in [ColumnMapping::Angular, ColumnMapping::Planar] {
            assert!(m.ray_slope(5, 11, 1.2).abs() < 1e-6);
        }
    }

    #[test]
    fn outer_columns_are_symmetric() {
        for m in [ColumnMapping::Angular, ColumnMapping::Planar] {
            let l = m.ray_slope(0, 64, 1.2);
            let r = m.ray_slope(63, 64, 1.2);
            assert!(l < 0.0 && (l + r).abs() < 1e-5);
        }
    }

    #[test]
    fn screen_x_inverts_ray_slope() {
        for m in [ColumnMapping::Angular, ColumnMapping::Planar] {
            for col in [0, 7, 31, 63] {
                let slope = m.ray_slope(col, 64, 1.1);
                let x = m.screen_x(slope * 3.0, 3.0, 64, 1.1);
                assert!((x - (col as f32 + 0.5)).abs() < 1e-3, "{m:?} col {col} → {x}");
            }
        }
    }

    #[test]
    fn angular_edge_reaches_half_fov() {
        // Left edge of the screen sits exactly half a FoV off-axis.
        let x = ColumnMapping::Angular.screen_x(-(0.5_f32).tan(), 1.0, 100, 1.0);
        assert!(x.abs() < 1e-3);
    }
}
