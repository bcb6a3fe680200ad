use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::export::{ExportError, PageRasterizer};

/// Shells out to `wkhtmltoimage`, feeding HTML on stdin and reading PNG from stdout.
pub struct WkHtmlToImageRasterizer {
  binary: String,
  render_width_px: u32,
  timeout: Duration,
}

impl WkHtmlToImageRasterizer {
  pub fn new(binary: Option<String>, render_width_px: u32, timeout: Duration) -> Self {
    Self {
      binary: binary.unwrap_or_else(|| "wkhtmltoimage".to_string()),
      render_width_px,
      timeout,
    }
  }

  async fn run(&self, html: &str) -> Result<Vec<u8>, ExportError> {
    let width = self.render_width_px.to_string();
    let mut child = Command::new(&self.binary)
      .args([
        "--quiet",
        "--format",
        "png",
        "--width",
        &width,
        "--disable-smart-width",
        "--encoding",
        "utf-8",
        "-",
        "-",
      ])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| {
        ExportError::RasterizationFailed(format!("{} could not be started: {}", self.binary, e))
      })?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
      ExportError::RasterizationFailed("stdin of the rasterizer is unavailable".to_string())
    })?;
    let input = html.as_bytes().to_vec();
    let writer = tokio::spawn(async move {
      stdin.write_all(&input).await?;
      stdin.shutdown().await
    });

    let output = child
      .wait_with_output()
      .await
      .map_err(|e| ExportError::RasterizationFailed(format!("{} failed: {}", self.binary, e)))?;

    match writer.await {
      Ok(Ok(())) => {}
      Ok(Err(e)) => {
        tracing::warn!(error = %e, "Rasterizer closed its input early");
      }
      Err(e) => {
        return Err(ExportError::RasterizationFailed(format!(
          "writing HTML to the rasterizer failed: {}",
          e
        )));
      }
    }

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ExportError::RasterizationFailed(format!(
        "{} exited with {}: {}",
        self.binary,
        output.status,
        stderr.trim()
      )));
    }

    if output.stdout.is_empty() {
      return Err(ExportError::RasterizationFailed(
        "rasterizer produced no image".to_string(),
      ));
    }

    Ok(output.stdout)
  }
}

#[async_trait]
impl PageRasterizer for WkHtmlToImageRasterizer {
  async fn rasterize(&self, html: &str) -> Result<Vec<u8>, ExportError> {
    if html.trim().is_empty() {
      return Err(ExportError::NothingToExport(
        "rendered document is empty".to_string(),
      ));
    }

    tracing::debug!(
      binary = %self.binary,
      width = self.render_width_px,
      "Rasterizing invoice HTML"
    );

    match tokio::time::timeout(self.timeout, self.run(html)).await {
      Ok(result) => result,
      Err(_) => {
        tracing::error!(timeout_secs = self.timeout.as_secs(), "Rasterizer timed out");
        Err(ExportError::Timeout(self.timeout.as_secs()))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_empty_html_is_nothing_to_export() {
    let rasterizer = WkHtmlToImageRasterizer::new(None, 794, Duration::from_secs(1));
    assert!(matches!(
      rasterizer.rasterize("  \n").await,
      Err(ExportError::NothingToExport(_))
    ));
  }

  #[tokio::test]
  async fn test_missing_binary_is_reported() {
    let rasterizer = WkHtmlToImageRasterizer::new(
      Some("/nonexistent/wkhtmltoimage".to_string()),
      794,
      Duration::from_secs(5),
    );
    let result = rasterizer.rasterize("<p>hello</p>").await;
    assert!(matches!(result, Err(ExportError::RasterizationFailed(_))));
  }
}
