use std::fmt;

use crate::inference::ProviderError;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Ocorreu um erro inesperado. Por favor, tente novamente mais tarde.";
pub const AUTH_FAILURE_MESSAGE: &str =
    "Sua chave de API é inválida ou não foi configurada. Verifique suas credenciais.";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Falha na rede. Verifique sua conexão com a internet e tente novamente.";
pub const PROVIDER_FAILURE_MESSAGE: &str =
    "O serviço do modelo encontrou um erro. Por favor, tente novamente mais tarde.";

/// Fixed message of the Início panel, whatever the cause.
pub const DAILY_FAILURE_MESSAGE: &str =
    "Não foi possível carregar a mensagem do dia. Por favor, tente novamente mais tarde.";
/// Fixed message of the Pesquisa panel, whatever the cause.
pub const SEARCH_FAILURE_MESSAGE: &str =
    "Ocorreu um erro ao realizar a busca. Por favor, tente novamente.";

/// Errors returned by a [`ScriptureProvider`](super::ScriptureProvider).
#[derive(Debug)]
pub enum ScriptureError {
    /// The completion provider failed.
    Provider {
        provider: String,
        source: ProviderError,
    },
    /// The model answered, but not in the shape that was asked for.
    Malformed(String),
}

impl fmt::Display for ScriptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptureError::Provider { provider, source } => write!(f, "{provider}: {source}"),
            ScriptureError::Malformed(msg) => write!(f, "malformed answer: {msg}"),
        }
    }
}

impl std::error::Error for ScriptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptureError::Provider { source, .. } => Some(source),
            ScriptureError::Malformed(_) => None,
        }
    }
}

/// Broad cause of a failure, used to pick what to tell the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Auth,
    Network,
    Provider,
    Generic,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Auth => AUTH_FAILURE_MESSAGE,
            FailureKind::Network => NETWORK_FAILURE_MESSAGE,
            FailureKind::Provider => PROVIDER_FAILURE_MESSAGE,
            FailureKind::Generic => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl ScriptureError {
    /// Classifies the failure. Checks run in order: auth, network, provider.
    ///
    /// Substring checks look at the underlying message only, not at the
    /// `"{provider}: "` prefix of `Display`, so naming the provider in the
    /// message itself is what marks a failure as provider-internal.
    pub fn kind(&self) -> FailureKind {
        let (source, detail) = match self {
            ScriptureError::Provider { source, .. } => (Some(source), source.to_string()),
            ScriptureError::Malformed(msg) => (None, msg.clone()),
        };
        let detail = detail.to_lowercase();

        let auth = matches!(source, Some(ProviderError::Config(_)))
            || matches!(source, Some(ProviderError::Api { status: 401 | 403, .. }))
            || detail.contains("api key not valid")
            || detail.contains("api_key");
        if auth {
            return FailureKind::Auth;
        }

        if matches!(source, Some(ProviderError::Network(_))) || detail.contains("failed to fetch") {
            return FailureKind::Network;
        }

        let provider_named = match self {
            ScriptureError::Provider { provider, .. } => detail.contains(&provider.to_lowercase()),
            ScriptureError::Malformed(_) => false,
        };
        if matches!(
            source,
            Some(ProviderError::Api { .. }) | Some(ProviderError::Provider(_))
        ) || provider_named
            || detail.contains("request failed")
        {
            return FailureKind::Provider;
        }

        FailureKind::Generic
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_err(source: ProviderError) -> ScriptureError {
        ScriptureError::Provider {
            provider: "OpenRouter".to_string(),
            source,
        }
    }

    #[test]
    fn test_auth_classification() {
        assert_eq!(
            provider_err(ProviderError::Config("OPENROUTER_API_KEY is not set".into())).kind(),
            FailureKind::Auth
        );
        assert_eq!(
            provider_err(ProviderError::Api {
                status: 401,
                message: "unauthorized".into()
            })
            .kind(),
            FailureKind::Auth
        );
        assert_eq!(
            provider_err(ProviderError::Api {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".into()
            })
            .kind(),
            FailureKind::Auth
        );
    }

    #[test]
    fn test_network_classification() {
        assert_eq!(
            provider_err(ProviderError::Network("connection refused".into())).kind(),
            FailureKind::Network
        );
        assert_eq!(
            ScriptureError::Malformed("TypeError: Failed to fetch".into()).kind(),
            FailureKind::Network
        );
    }

    #[test]
    fn test_provider_classification() {
        assert_eq!(
            provider_err(ProviderError::Api {
                status: 500,
                message: "internal".into()
            })
            .kind(),
            FailureKind::Provider
        );
        assert_eq!(
            provider_err(ProviderError::Provider("overloaded".into())).kind(),
            FailureKind::Provider
        );
        // A parse error counts only when its message names the provider.
        assert_eq!(
            provider_err(ProviderError::Parse("openrouter sent an invalid frame".into())).kind(),
            FailureKind::Provider
        );
    }

    #[test]
    fn test_provider_prefix_alone_does_not_classify() {
        assert_eq!(
            provider_err(ProviderError::Parse("bad".into())).kind(),
            FailureKind::Generic
        );
        assert_eq!(
            provider_err(ProviderError::ChannelClosed).kind(),
            FailureKind::Generic
        );
    }

    #[test]
    fn test_malformed_is_generic() {
        let err = ScriptureError::Malformed("missing field `text`".into());
        assert_eq!(err.kind(), FailureKind::Generic);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_auth_wins_over_network_text() {
        let err = provider_err(ProviderError::Network("bad api_key, failed to fetch".into()));
        assert_eq!(err.kind(), FailureKind::Auth);
    }
}
