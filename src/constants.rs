// Data source URLs
pub const RSS_FEED_URL: &str = "https://webgate.ec.europa.eu/fsd/fsf/public/rss";

// HTTP
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const USER_AGENT: &str = concat!("eu-sanctions-cli/", env!("CARGO_PKG_VERSION"));
pub const XML_ENCLOSURE_TYPE: &str = "application/xml";

// Session cache lifetime: 7 days
pub const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 3600;

// Export
pub const DEFAULT_EXPORT_PATH: &str = "eu_sanctions.csv";
pub const CSV_HEADERS: [&str; 7] = [
    "name",
    "type",
    "country",
    "publicationDate",
    "program",
    "remarks",
    "publicationUrl",
];

// Filtering
pub const MIN_NAME_QUERY_CHARS: usize = 3;

// Entry type aliases (user input for the type filter)
pub const PERSON_ALIASES: &[&str] = &["person", "p", "persons"];
pub const ENTITY_ALIASES: &[&str] = &["entity", "e", "entities", "enterprise"];
pub const ALL_TYPES_ALIASES: &[&str] = &["all", "any", "*"];
