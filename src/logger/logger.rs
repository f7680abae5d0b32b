use crate::settings::{Log, LogFormat};
use anyhow::{Result, anyhow};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, reload, util::SubscriberInitExt};

const BOOTSTRAP_FILTER: &str = "info";

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedFmtLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl From<&Log> for LogConfig {
    fn from(log: &Log) -> Self {
        LogConfig {
            filter: log.filter.clone(),
            format: log.format,
            ansi: log.ansi,
        }
    }
}

/// Tracing subscriber installed before settings are read, then reloaded from them.
pub struct Logger {
    filter_handle: reload::Handle<EnvFilter, Registry>,
    fmt_handle: reload::Handle<BoxedFmtLayer, FilteredRegistry>,
}

impl Logger {
    pub fn new_bootstrap() -> Self {
        let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_FILTER));
        let (output, fmt_handle) = reload::Layer::new(fmt_layer(LogFormat::Text, true));

        tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .init();

        Self {
            filter_handle,
            fmt_handle,
        }
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        let filter = EnvFilter::try_new(&config.filter).map_err(|e| anyhow!(e))?;
        self.filter_handle.reload(filter).map_err(|e| anyhow!(e))?;
        self.fmt_handle
            .reload(fmt_layer(config.format, config.ansi))
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }
}

fn fmt_layer(format: LogFormat, ansi: bool) -> BoxedFmtLayer {
    match format {
        LogFormat::Text => fmt::layer().with_ansi(ansi).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_ansi(ansi).boxed(),
    }
}
