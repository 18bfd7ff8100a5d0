#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub const fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub const fn from_array(v: [f32; 4]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
            w: v[3],
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Column-major 4x4 matrix; `m[4 * column + row]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4x4(pub [f32; 16]);

impl Matrix4x4 {
    #[rustfmt::skip]
    pub const IDENTITY: Matrix4x4 = Matrix4x4([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub const fn at(&self, row: usize, column: usize) -> f32 {
        self.0[4 * column + row]
    }

    /// Translation stored in the last column.
    pub const fn translation(&self) -> Vector3 {
        Vector3::new(self.0[12], self.0[13], self.0[14])
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vector3,
    pub orientation: Quaternion,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadPose {
    pub position: Vector3,
    pub forward: Vector3,
    pub up: Vector3,
}

/// Stereo view and projection matrices sampled at `timestamp`.
///
/// A frame rendered against this pose carries the same timestamp back so the
/// client can correlate frame and pose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XrPose {
    pub timestamp: i64,
    pub view_left: Matrix4x4,
    pub view_right: Matrix4x4,
    pub proj_left: Matrix4x4,
    pub proj_right: Matrix4x4,
}

impl XrPose {
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }
}
