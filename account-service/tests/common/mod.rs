#![allow(dead_code)]

use std::sync::Arc;

use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserDirectory;
use auth::Authenticator;
use auth::JwtHandler;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub directory: Arc<InMemoryUserDirectory>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let directory = Arc::new(InMemoryUserDirectory::new());
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&directory),
            Arc::clone(&authenticator),
        ));

        let router = create_router(auth_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            directory,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with the token header
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).header("x-access-token", token)
    }

    /// Sign up and return the parsed response body
    pub async fn sign_up(&self, email: &str, password: &str) -> serde_json::Value {
        self.post("/api/signup")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response")
    }

    /// Log in and return the parsed response body
    pub async fn login(&self, email: &str, password: &str) -> serde_json::Value {
        self.post("/api/authenticate")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response")
    }

    /// Sign up and log in, returning the issued token
    pub async fn token_for(&self, email: &str, password: &str) -> String {
        self.sign_up(email, password).await;
        self.login(email, password).await["token"]
            .as_str()
            .expect("Login did not return a token")
            .to_string()
    }
}
