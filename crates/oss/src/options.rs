/// A single directive attached to an object upload.
///
/// Directives mirror the provider's `x-oss-*` request headers. Values pass
/// through verbatim; the service is the only validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOption {
    ServerSideEncryption(String),
    ObjectAcl(String),
}

impl PutOption {
    pub fn server_side_encryption(algorithm: impl Into<String>) -> Self {
        Self::ServerSideEncryption(algorithm.into())
    }

    pub fn object_acl(acl: impl Into<String>) -> Self {
        Self::ObjectAcl(acl.into())
    }

    pub(crate) fn header(&self) -> (String, String) {
        match self {
            Self::ServerSideEncryption(algorithm) => (
                "x-oss-server-side-encryption".to_string(),
                algorithm.clone(),
            ),
            Self::ObjectAcl(acl) => ("x-oss-object-acl".to_string(), acl.clone()),
        }
    }
}
