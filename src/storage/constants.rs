// Buffer related constants
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

// Progress related constants
// Controls how often progress is printed (in multiples of buffer size)
pub const PROGRESS_UPDATE_INTERVAL: u64 = 100;

// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";

// Provider endpoint defaults
pub const DEFAULT_OSS_ENDPOINT: &str = "https://oss-cn-hangzhou.aliyuncs.com";
pub const DEFAULT_MINIO_ENDPOINT: &str = "http://localhost:9000";
pub const DEFAULT_AZURE_ENDPOINT_SUFFIX: &str = "core.windows.net";

// Directory mode for containers whose objects are publicly readable:
// others may open files by name but not list the directory.
pub const PUBLIC_BLOB_DIR_MODE: u32 = 0o711;
