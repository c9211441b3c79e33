/// Named resource slot on a character sheet.
///
/// One of these, identified by its label, holds the spell point pool.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSlot {
    /// Opaque host key (`primary`, `secondary`, ...).
    pub key: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max: i64,
}

impl ResourceSlot {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: i64, max: i64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value,
            max,
        }
    }
}
