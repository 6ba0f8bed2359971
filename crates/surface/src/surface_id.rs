use std::fmt;

/// Identity of a surface node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(uuid::Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the full UUID string.
    pub fn to_uuid_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_display_short() {
        let (a, b) = (SurfaceId::new(), SurfaceId::new());
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 8);
        assert!(a.to_uuid_string().starts_with(&a.to_string()));
        assert_eq!(format!("{:?}", a), format!("SurfaceId({})", a));
    }
}
