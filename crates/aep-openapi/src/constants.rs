//! Wire names shared by the builder, the generator and the client.

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";

pub const GENERATED_OPENAPI_VERSION: &str = "3.1.0";
pub const GENERATED_INFO_VERSION: &str = "version not set";
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub const SUCCESS_DESCRIPTION: &str = "Successful response";

pub const OK_STATUS: &str = "200";
pub const NO_CONTENT_STATUS: &str = "204";

pub const FIELD_ID: &str = "id";
pub const FIELD_PATH: &str = "path";
pub const FIELD_FILTER: &str = "filter";
pub const FIELD_FORCE: &str = "force";
pub const FIELD_SKIP: &str = "skip";
pub const FIELD_UNREACHABLE: &str = "unreachable";
pub const FIELD_RESULTS: &str = "results";
pub const FIELD_ERROR: &str = "error";
pub const FIELD_MAX_PAGE_SIZE: &str = "maxPageSize";
pub const FIELD_PAGE_TOKEN: &str = "pageToken";
pub const FIELD_NEXT_PAGE_TOKEN: &str = "nextPageToken";
