use crate::types::{AppError, Result};
use crate::utils::toml_config::CorsConfig;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

/// Build the CORS layer for the configured origin allow-list.
///
/// Methods and headers are permissive. Browsers reject `*` when credentials
/// are allowed, so in that case the preflight's requested method and headers
/// are echoed back instead.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| {
                AppError::Configuration(format!("Invalid CORS origin '{}'", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let layer = CorsLayer::new().allow_origin(AllowOrigin::list(origins));

    let layer = if config.allow_credentials {
        layer
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
    } else {
        layer.allow_methods(Any).allow_headers(Any)
    };

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins_build() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = CorsConfig {
            allowed_origins: vec!["https://ok.example".to_string(), "bad\norigin".to_string()],
            allow_credentials: true,
        };
        assert!(matches!(cors_layer(&config), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_without_credentials() {
        let config = CorsConfig {
            allow_credentials: false,
            ..CorsConfig::default()
        };
        assert!(cors_layer(&config).is_ok());
    }
}
