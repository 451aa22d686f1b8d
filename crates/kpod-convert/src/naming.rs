use kpod_core::ConversionError;
use kpod_model::PodHandle;

/// Number of leading handle characters used to scope container names to their pod.
pub const SHORT_ID_LEN: usize = 12;

/// Leading [`SHORT_ID_LEN`] characters of a runtime id, or the whole id if shorter.
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Runtime-wide name of a workload container: `{short pod id}-{container}`.
///
/// Container names are global in the runtime, so two pods declaring a container with the
/// same name must not collide.
pub fn container_runtime_name(pod: &PodHandle, container: &str) -> String {
    format!("{}-{container}", short_id(pod.as_str()))
}

/// Check that `key` can address a pod: non-empty, no whitespace, no `/`.
pub fn validate_key(key: &str) -> Result<(), ConversionError> {
    if key.is_empty() {
        return Err(ConversionError::MissingField("pod name".into()));
    }
    if let Some(c) = key.chars().find(|c| c.is_whitespace() || *c == '/') {
        return Err(ConversionError::Invalid(format!(
            "pod key {key:?} contains {c:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_long_ids_only() {
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn runtime_name_is_scoped_by_pod() {
        let a = container_runtime_name(&PodHandle::new("aaaaaaaaaaaaffff"), "web");
        let b = container_runtime_name(&PodHandle::new("bbbbbbbbbbbbffff"), "web");
        assert_eq!(a, "aaaaaaaaaaaa-web");
        assert_ne!(a, b);
    }

    #[test]
    fn key_validation() {
        assert!(validate_key("test-pod-create").is_ok());
        assert!(matches!(validate_key(""), Err(ConversionError::MissingField(_))));
        assert!(matches!(validate_key("a b"), Err(ConversionError::Invalid(_))));
        assert!(matches!(validate_key("ns/pod"), Err(ConversionError::Invalid(_))));
    }
}
