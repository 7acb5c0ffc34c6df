use gloo_net::http::Request;
use log::info;
use thiserror::Error;

/// Shown in place of the loading indicator when the CSV cannot be fetched.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Please check the CSV file.";

#[derive(Error, Debug)]
pub enum LoadError {
	#[error("request failed: {0}")]
	Network(#[from] gloo_net::Error),

	#[error("server answered {status} for {url}")]
	Status { status: u16, url: String },
}

/// Fetch the CSV text at `url`. No retry.
pub async fn fetch_csv(url: &str) -> Result<String, LoadError> {
	let response = Request::get(url).send().await?;
	if !response.ok() {
		return Err(LoadError::Status {
			status: response.status(),
			url: url.to_string(),
		});
	}
	let text = response.text().await?;
	info!("fetched {} ({} bytes)", url, text.len());
	Ok(text)
}
