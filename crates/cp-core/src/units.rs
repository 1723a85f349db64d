// cp-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, AngularVelocity as UomAngularVelocity, Length as UomLength,
    Mass as UomMass,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;
pub type Length = UomLength;
pub type Mass = UomMass;

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}


/// Angle expressed in radians.
#[inline]
pub fn to_radians(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

/// Angle expressed in degrees.
#[inline]
pub fn to_degrees(a: Angle) -> f64 {
    use uom::si::angle::degree;
    a.get::<degree>()
}

/// Mass in kilograms.
#[inline]
pub fn to_kg(v: Mass) -> f64 {
    use uom::si::mass::kilogram;
    v.get::<kilogram>()
}

/// Length in meters.
#[inline]
pub fn to_m(v: Length) -> f64 {
    use uom::si::length::meter;
    v.get::<meter>()
}

/// Angular velocity in rad/s.
#[inline]
pub fn to_rad_per_s(v: AngularVelocity) -> f64 {
    use uom::si::angular_velocity::radian_per_second;
    v.get::<radian_per_second>()
}

pub mod constants {
    /// Gravitational acceleration used by the pendulum models (m/s²).
    pub const G_MPS2: f64 = 9.81;
}
