/// Identity and target settings shared by the fetch and the classifier.
/// The API token is handed to the provider separately and never kept here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Login the report is about.
    pub me: String,
    pub owner: String,
    pub repo: String,
    /// Team names standing in for review-request membership.
    pub teams: Vec<String>,
}
