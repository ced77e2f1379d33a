//! Shared constants for test infrastructure

// Versions
pub const VERSION_1_0_0: &str = "1.0.0";
pub const VERSION_1_0_5: &str = "1.0.5";
pub const VERSION_1_1_0: &str = "1.1.0";
pub const VERSION_BETA: &str = "1.1.0-beta.2";
pub const VERSION_ALPHA: &str = "1.1.0-alpha";
pub const VERSION_RC: &str = "1.1.0-rc.1";

// Tags as returned by the refs API, oldest first
pub const TAGS_UP_TO_1_0_5: &[&str] = &["1.0.0", "1.0.3", "1.0.5"];
pub const TAG_1_0_5: &str = "1.0.5";
pub const TAG_1_1_0: &str = "1.1.0";

// Commit hashes
pub const REMOTE_SHA: &str = "abc1234def5678901234567890abcdef12345678";
pub const REMOTE_SHORT: &str = "abc1234";
pub const LOCAL_SHORT_OTHER: &str = "0f0f0f0";

// Repository coordinates served by the mock server
pub const REPO_OWNER: &str = "lequanglam";
pub const REPO_NAME: &str = "c3c";
pub const DEFAULT_BRANCH: &str = "master";

// Installation files
pub const LOCK_FILE: &str = "package-lock.json";
pub const INDEX_JS_OLD: &str = "console.log('old');\n";
pub const INDEX_JS_NEW: &str = "console.log('new');\n";
pub const UTIL_JS: &str = "module.exports = {};\n";
pub const LOCAL_NOTES: &str = "kept across updates\n";
