/// Runtime configuration describing how to reach the PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Base REST URL, e.g. `https://<project>.supabase.co/rest/v1`.
    pub base_url: String,
    /// Table holding the ranking rows.
    pub table: String,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: Option<String>,
}

impl PostgrestConfig {
    /// Construct a configuration from explicit base URL and table name.
    pub fn new(base_url: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            table: table.into(),
            api_key: None,
        }
    }

    /// Attach the API key used to authenticate requests.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}
