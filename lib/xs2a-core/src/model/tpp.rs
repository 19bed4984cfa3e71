/// Requesting third party, attached once on creation and never modified afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TppIdentity {
    pub authorisation_number: String,
    pub authority_id: String,
    pub redirect_uri: Option<String>,
    pub nok_redirect_uri: Option<String>,
    pub cancel_redirect_uri: Option<String>,
    pub cancel_nok_redirect_uri: Option<String>,
}

impl TppIdentity {
    pub fn is_complete(&self) -> bool {
        !self.authorisation_number.trim().is_empty() && !self.authority_id.trim().is_empty()
    }
}
