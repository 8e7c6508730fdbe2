//! Source upload DTOs

use serde::{Deserialize, Serialize};

/// Upload slot for a source archive
///
/// `upload_url` is a pre-authorized destination for a single PUT;
/// `relative_path` is the opaque reference the service accepts back in a
/// run request's source location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUploadInfo {
    pub upload_url: String,
    pub relative_path: String,
}
