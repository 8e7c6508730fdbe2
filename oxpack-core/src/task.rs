//! Pack task template
//!
//! The build service accepts a base64-encoded task description in place of
//! a stored task definition. For buildpack builds that description is a
//! fixed two-step template: build-and-tag with the pack tool, then push.
//! Only the image name and the builder reference vary.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Builder image used when the caller does not name one
pub const DEFAULT_BUILDER: &str = "paketobuildpacks/builder-jammy-base";

/// Image carrying the buildpack CLI, run by the build agent
pub const PACK_TOOL_IMAGE: &str = "buildpacksio/pack:stable";

/// Upper time bound for the build-and-tag step, in seconds
pub const BUILD_STEP_TIMEOUT_SECS: u64 = 28_800;

/// Upper time bound for the push step, in seconds
pub const PUSH_STEP_TIMEOUT_SECS: u64 = 1_800;

/// Errors from decoding an encoded task back to text
#[derive(Debug, Error)]
pub enum TaskDecodeError {
    #[error("invalid base64 in encoded task: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("encoded task is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render the two-step pack task for an image and builder
///
/// `{{.Run.Registry}}` is a substitution token the build agent expands to
/// the target registry's login server at run time; it is emitted verbatim.
pub fn render_pack_task(image_name: &str, builder: &str) -> String {
    format!(
        "steps:\n  \
         - cmd: {pack} build {image} --builder {builder} --env REGISTRY_NAME={{{{.Run.Registry}}}} -p .\n    \
         timeout: {build_timeout}\n  \
         - push: [\"{image}\"]\n    \
         timeout: {push_timeout}\n",
        pack = PACK_TOOL_IMAGE,
        image = image_name,
        builder = builder,
        build_timeout = BUILD_STEP_TIMEOUT_SECS,
        push_timeout = PUSH_STEP_TIMEOUT_SECS,
    )
}

/// Encode a task description for transmission
pub fn encode_task(task: &str) -> String {
    STANDARD.encode(task.as_bytes())
}

/// Decode an encoded task back to its original text
pub fn decode_task(encoded: &str) -> Result<String, TaskDecodeError> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}
