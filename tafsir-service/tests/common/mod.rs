use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tafsir_service::config::{DatasetConfig, LlmConfig, TafsirConfig};
use tafsir_service::services::providers::mock::MockCommentaryProvider;
use tafsir_service::startup::Application;
use tempfile::NamedTempFile;

pub const VERSES_CSV: &str = "id,verse_key,text_uthmani\n\
1,1:1,بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ\n\
2,1:2,ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَـٰلَمِينَ\n\
3,1:3,ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ\n";

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockCommentaryProvider>,
    pub client: reqwest::Client,
    // Keeps the dataset alive for the lifetime of the app
    _dataset: NamedTempFile,
}

/// Write `contents` to a fresh temporary CSV file.
pub fn write_dataset(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create dataset file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write dataset file");
    file
}

/// Configuration pointing at `dataset`, bound to a random local port.
pub fn test_config(dataset: &Path) -> TafsirConfig {
    TafsirConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        llm: LlmConfig {
            api_key: Secret::new("gsk_test".to_string()),
            model: "llama3-70b-8192".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(5),
        },
        dataset: DatasetConfig {
            path: dataset.to_path_buf(),
            key_column: "verse_key".to_string(),
            text_column: "text_uthmani".to_string(),
        },
    }
}

impl TestApp {
    pub async fn spawn(provider: MockCommentaryProvider) -> Self {
        Self::spawn_with_dataset(VERSES_CSV, provider).await
    }

    pub async fn spawn_with_dataset(csv: &str, provider: MockCommentaryProvider) -> Self {
        let dataset = write_dataset(csv);
        let provider = Arc::new(provider);

        let app = Application::build_with_provider(test_config(dataset.path()), provider.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            provider,
            client,
            _dataset: dataset,
        }
    }

    pub async fn post_tafsir(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/tafsir", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
