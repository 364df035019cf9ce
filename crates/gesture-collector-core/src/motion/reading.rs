/// Standard gravity used to convert platform `g` units into m/s².
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Three-axis vector as reported by the motion platform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// X axis component.
    pub x: f64,
    /// Y axis component.
    pub y: f64,
    /// Z axis component.
    pub z: f64,
}

impl Vector3 {
    /// Creates a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One device-motion update.
///
/// `timestamp` is in seconds on the platform's monotonic clock. `gravity`
/// and `user_acceleration` are in g, `rotation_rate` in rad/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReading {
    /// Seconds since the platform clock origin.
    pub timestamp: f64,
    /// Gravity component of acceleration, in g.
    pub gravity: Vector3,
    /// Acceleration the user imparts on the device, in g.
    pub user_acceleration: Vector3,
    /// Angular rate, in rad/s.
    pub rotation_rate: Vector3,
}

impl MotionReading {
    /// Timestamp in whole nanoseconds.
    pub fn timestamp_ns(&self) -> u64 {
        (self.timestamp * 1_000_000_000.0) as u64
    }

    /// Gravity-compensated total acceleration in m/s².
    pub fn acceleration(&self) -> Sample {
        Sample {
            timestamp_ns: self.timestamp_ns(),
            x: (self.gravity.x + self.user_acceleration.x) * STANDARD_GRAVITY,
            y: (self.gravity.y + self.user_acceleration.y) * STANDARD_GRAVITY,
            z: (self.gravity.z + self.user_acceleration.z) * STANDARD_GRAVITY,
        }
    }

    /// Raw angular rate in rad/s.
    pub fn rotation(&self) -> Sample {
        Sample {
            timestamp_ns: self.timestamp_ns(),
            x: self.rotation_rate.x,
            y: self.rotation_rate.y,
            z: self.rotation_rate.z,
        }
    }

    /// Whether every field can be serialized as a plain decimal.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite()
            && self.timestamp >= 0.0
            && self.gravity.is_finite()
            && self.user_acceleration.is_finite()
            && self.rotation_rate.is_finite()
    }
}

/// A single timestamped three-axis sample of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Tick timestamp in nanoseconds.
    pub timestamp_ns: u64,
    /// X axis value.
    pub x: f64,
    /// Y axis value.
    pub y: f64,
    /// Z axis value.
    pub z: f64,
}

impl Sample {
    /// Formats the sample as one newline-terminated CSV row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.6}\n",
            self.timestamp_ns, self.x, self.y, self.z
        )
    }
}
