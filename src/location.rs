use serde::*;

/// Horizontal map position in game distance units.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Point2 {
    x: f32,
    y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    /// Centre-to-centre distance.
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;

        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn packed_repr(self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn from_packed(packed: (f32, f32)) -> Self {
        Point2 {
            x: packed.0,
            y: packed.1,
        }
    }
}

impl From<(f32, f32)> for Point2 {
    fn from(xy: (f32, f32)) -> Self {
        Point2::from_packed(xy)
    }
}

impl Serialize for Point2 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point2 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <(f32, f32)>::deserialize(deserializer).map(Point2::from_packed)
    }
}
