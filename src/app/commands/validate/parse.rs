use sha2::{Digest, Sha256};

use crate::domain::{AppError, AppSpec};

/// Decode an app spec document. Structural only; no rule is checked here.
pub fn parse_app_spec(content: &str) -> Result<AppSpec, AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Parse {
            details: "document is empty".to_string(),
            line: None,
            column: None,
        });
    }

    let spec: AppSpec = serde_yaml::from_str(content).map_err(AppError::from_yaml)?;
    tracing::debug!(services = spec.services.len(), "parsed app spec");
    Ok(spec)
}

pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}
