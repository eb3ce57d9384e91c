pub struct RegionCode {}

impl RegionCode {
    /// Returns a region code string representing the "unknown" region.
    pub fn get_unknown() -> &'static str {
        Self::zz()
    }

    pub fn zz() -> &'static str {
        "ZZ"
    }

    /// The region code shared by all non-geographical calling codes.
    pub fn un001() -> &'static str {
        "001"
    }
}
