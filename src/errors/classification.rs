use super::types::ReachError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub fatal: bool,
}

impl ReachError {
    /// Classify this error to determine its type and whether it may end a campaign.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Fatal: abort the project before any attempt starts
            ReachError::Config(_) => ErrorClassification {
                error_type: "ConfigurationError",
                fatal: true,
            },
            ReachError::ClasspathResolution(_) => ErrorClassification {
                error_type: "ClasspathResolutionError",
                fatal: true,
            },

            // Recovered at the narrowest scope
            ReachError::EngineInvocation(_) => ErrorClassification {
                error_type: "EngineInvocationError",
                fatal: false,
            },
            ReachError::Export(_) => ErrorClassification {
                error_type: "ExportError",
                fatal: false,
            },
            ReachError::Io(_) => ErrorClassification {
                error_type: "IoError",
                fatal: false,
            },
            ReachError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                fatal: false,
            },
            ReachError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                fatal: false,
            },
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.classify().fatal
    }

    /// Process exit code used by the CLI when this error escapes.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReachError::Config(_) | ReachError::Yaml(_) => 2,
            ReachError::ClasspathResolution(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_fatal() {
        let err = ReachError::Config("budget too small".into());
        let class = err.classify();
        assert!(class.fatal);
        assert_eq!(class.error_type, "ConfigurationError");
    }

    #[test]
    fn test_classpath_error_is_fatal() {
        let err = ReachError::ClasspathResolution("no classes".into());
        assert!(err.is_fatal());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_engine_error_not_fatal() {
        let err = ReachError::EngineInvocation("engine crashed".into());
        let class = err.classify();
        assert!(!class.fatal);
        assert_eq!(class.error_type, "EngineInvocationError");
    }

    #[test]
    fn test_export_error_not_fatal() {
        let err = ReachError::Export("disk full".into());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_not_fatal() {
        let err = ReachError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!err.is_fatal());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_exit_code() {
        assert_eq!(ReachError::Config("x".into()).exit_code(), 2);
    }
}
