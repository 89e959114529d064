use std::path::{Path, PathBuf};

use super::{query_context, ConnectorError, DataConnector};
use crate::context::{DataContext, Metrics};

/// Connector over a `{results, process, support, longterm}` JSON file.
///
/// The file is read once on [`open`](Self::open); call
/// [`reload`](Self::reload) to pick up edits.
#[derive(Debug, Clone)]
pub struct JsonFileConnector {
    path: PathBuf,
    context: DataContext,
}

impl JsonFileConnector {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let path = path.as_ref().to_path_buf();
        let context = read_context(&path)?;
        Ok(Self { path, context })
    }

    /// Re-read the file, replacing the cached context only on success.
    pub fn reload(&mut self) -> Result<(), ConnectorError> {
        self.context = read_context(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_context(path: &Path) -> Result<DataContext, ConnectorError> {
    let contents = std::fs::read_to_string(path)?;
    let context: DataContext = serde_json::from_str(&contents)?;
    tracing::debug!(
        path = %path.display(),
        metrics = context.metric_count(),
        "Loaded data file"
    );
    Ok(context)
}

impl DataConnector for JsonFileConnector {
    fn name(&self) -> &str {
        "json-file"
    }

    fn results_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.results.clone())
    }

    fn process_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.process.clone())
    }

    fn support_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.support.clone())
    }

    fn longterm_metrics(&self) -> Result<Metrics, ConnectorError> {
        Ok(self.context.longterm.clone())
    }

    fn query(&self, query: &str) -> Result<serde_json::Value, ConnectorError> {
        query_context(&self.context, query)
    }
}
