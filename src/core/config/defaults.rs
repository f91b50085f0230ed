pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const COMPLETION_MODEL: &str = "gpt-4o";
pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";

pub const INDEX_NAME: &str = "mathindex";
pub const PINECONE_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
pub const PINECONE_API_VERSION: &str = "2024-07";

pub const TOP_K: usize = 3;

pub const EMBEDDING_TIMEOUT_SECS: u64 = 30;
pub const QUERY_TIMEOUT_SECS: u64 = 30;
pub const COMPLETION_TIMEOUT_SECS: u64 = 120;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

pub const SERVER_HOST: &str = "127.0.0.1";
pub const MAX_INPUT_LENGTH: usize = 4000;

pub fn openai_base_url() -> String {
    OPENAI_BASE_URL.to_string()
}

pub fn completion_model() -> String {
    COMPLETION_MODEL.to_string()
}

pub fn embedding_model() -> String {
    EMBEDDING_MODEL.to_string()
}

pub fn index_name() -> String {
    INDEX_NAME.to_string()
}

pub fn control_plane_url() -> String {
    PINECONE_CONTROL_PLANE_URL.to_string()
}

pub fn pinecone_api_version() -> String {
    PINECONE_API_VERSION.to_string()
}

pub fn top_k() -> usize {
    TOP_K
}

pub fn embedding_timeout_secs() -> u64 {
    EMBEDDING_TIMEOUT_SECS
}

pub fn query_timeout_secs() -> u64 {
    QUERY_TIMEOUT_SECS
}

pub fn completion_timeout_secs() -> u64 {
    COMPLETION_TIMEOUT_SECS
}

pub fn connect_timeout_secs() -> u64 {
    CONNECT_TIMEOUT_SECS
}

pub fn server_host() -> String {
    SERVER_HOST.to_string()
}

pub fn max_input_length() -> usize {
    MAX_INPUT_LENGTH
}
