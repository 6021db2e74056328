//! Scrape the smartphone-penetration ranking table into a CSV file.
//!
//! One run is `fetch -> parse -> extract -> write`; any failure aborts the
//! run without producing an output file.

pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod schema;

use scraper::Html;
use std::path::PathBuf;
use tracing::{info, instrument};

pub use config::{Config, FetchConfig};
pub use error::{Error, FormatError, NetworkError, Result, StructureError};
pub use fetch::Fetcher;
pub use schema::RankingRecord;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub output: PathBuf,
}

/// Fetch the page, extract every ranking row and write the CSV.
#[instrument(level = "info", skip_all, fields(url = %cfg.url))]
pub async fn run(cfg: &Config) -> Result<RunSummary> {
    cfg.validate()?;
    let url = cfg.page_url()?;

    let fetcher = Fetcher::new(&cfg.fetch)?;
    let html = fetcher.fetch(&url).await?;

    let records = {
        let document = Html::parse_document(&html);
        process::collect_rankings(&document, &cfg.table_id)?
    };
    info!(rows = records.len(), "extracted rankings");

    schema::write_rankings(&cfg.output, &records)?;
    Ok(RunSummary {
        rows: records.len(),
        output: cfg.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<!doctype html>
<html><body>
<table id="ranking">
  <thead><tr><th></th><th>Country</th><th>Total Population</th><th>Smartphone Penetration</th><th>Smartphone Users</th></tr></thead>
  <tbody>
    <tr><td><img alt="flag"></td><td>United Kingdom</td><td>67.33m</td><td>82.9%</td><td>55.82m</td></tr>
    <tr><td><img alt="flag"></td><td>China</td><td>1.4b</td><td>68.4%</td><td>953.55m</td></tr>
  </tbody>
</table>
</body></html>"#;

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer, output: PathBuf) -> Config {
        Config {
            url: format!("{}/rankings/", server.uri()),
            output,
            fetch: FetchConfig {
                backoff_factor: 0.0,
                timeout_secs: 5.0,
                ..FetchConfig::default()
            },
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn writes_csv_for_well_formed_page() {
        let server = serve(PAGE).await;
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("rankings.csv");

        let summary = run(&config_for(&server, out.clone())).await.unwrap();
        assert_eq!(summary.rows, 2);

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "country,total_population,smartphone_penetration,smartphone_users\n\
             United Kingdom,67330000.00,0.829,55820000.00\n\
             China,1400000000.0,0.684,953550000.00\n"
        );
    }

    #[tokio::test]
    async fn bad_cell_leaves_no_output_file() {
        let page = PAGE.replace("67.33m", "n/a");
        let server = serve(&page).await;
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("rankings.csv");

        let err = run(&config_for(&server, out.clone())).await.unwrap_err();
        assert!(matches!(err, Error::Decode { row: 1, .. }), "{err}");
        assert!(err.to_string().contains("n/a"));
        assert!(!out.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_table_is_parse_error() {
        let server = serve("<html><body><table id=\"other\"></table></body></html>").await;
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("rankings.csv");

        let err = run(&config_for(&server, out.clone())).await.unwrap_err();
        assert!(matches!(err, Error::Parse(StructureError::MissingTable { .. })));
        assert!(err.to_string().starts_with("parse failed"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn http_failure_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("rankings.csv");

        let err = run(&config_for(&server, out.clone())).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Fetch(NetworkError::Status { status: 401, .. })
        ));
        assert!(!out.exists());
    }
}
