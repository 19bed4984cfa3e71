/// Identifies the end customer. Compared by full field equality.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PsuIdentity {
    pub psu_id: String,
    pub psu_id_type: Option<String>,
    pub psu_corporate_id: Option<String>,
    pub psu_corporate_id_type: Option<String>,
}

impl PsuIdentity {
    pub fn new(psu_id: impl Into<String>) -> Self {
        Self {
            psu_id: psu_id.into(),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.psu_id.trim().is_empty()
    }
}
