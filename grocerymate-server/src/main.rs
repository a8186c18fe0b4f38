use grocerymate_ai::{AiError, LlmClient, RecipeAssistant};
use grocerymate_server::config::ServerConfig;
use grocerymate_server::{app, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let assistant: Option<Arc<dyn RecipeAssistant>> = match LlmClient::from_env() {
        Ok(client) => {
            info!("LLM provider configured: {}", provider_name(&client));
            Some(Arc::new(client.with_retry(config.retry_policy())))
        }
        Err(AiError::NotConfigured) => {
            warn!("No LLM API key set. AI endpoints will return 503.");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = Arc::new(AppState::new(&config.jwt_secret, assistant));

    let addr = config.bind_addr();
    info!("Starting GroceryMate server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn provider_name(client: &LlmClient) -> &'static str {
    match client.provider() {
        grocerymate_ai::LlmProvider::Gemini { .. } => "Gemini",
        grocerymate_ai::LlmProvider::OpenAI { .. } => "OpenAI",
        grocerymate_ai::LlmProvider::Anthropic { .. } => "Anthropic",
    }
}
