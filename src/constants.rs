// Object store
pub const DEFAULT_BUCKET: &str = "divvy-tripdata";
pub const DEFAULT_REGION: &str = "us-east-1";

// Public download endpoint, `{bucket}` is substituted at runtime
pub const PUBLIC_URL_TEMPLATE: &str = "https://{bucket}.s3.amazonaws.com/";

// Local output
pub const DEFAULT_OUTPUT_DIR: &str = "data";

// Rolling window
pub const WINDOW_MONTHS: u32 = 12;
pub const MAX_WINDOW_MONTHS: u32 = 1200;
pub const MONTH_PREFIX_LEN: usize = 6;

// Credentials file
pub const CREDENTIALS_PROVIDER_NAME: &str = "credentials-csv";
pub const CREDENTIALS_HELP_TEXT: &str =
    "Path to the credentials CSV (header line, then `access key id,secret access key`)";
