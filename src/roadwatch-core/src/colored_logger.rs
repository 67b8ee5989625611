//! Colored logging with component prefixes
//!
//! Each event is tagged with the component that emitted it, picked from the
//! event's target crate, so gateway, client and capture output can be told
//! apart in one terminal.

use owo_colors::{OwoColorize, Style};
use std::fmt;
use std::io;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::{
    format::{FormatEvent, FormatFields, Writer},
    FmtContext,
};
use tracing_subscriber::registry::LookupSpan;

/// Component identifier for prefixing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Main,
    Gateway,
    Client,
    Capture,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Main => "MAIN",
            Component::Gateway => "GATEWAY",
            Component::Client => "CLIENT",
            Component::Capture => "CAPTURE",
        }
    }

    pub fn color_style(&self) -> Style {
        match self {
            Component::Main => Style::new().cyan().bold(),
            Component::Gateway => Style::new().green().bold(),
            Component::Client => Style::new().yellow().bold(),
            Component::Capture => Style::new().magenta().bold(),
        }
    }

    /// Component owning an event target, if any
    pub fn from_target(target: &str) -> Option<Self> {
        let krate = target.split("::").next().unwrap_or(target);
        match krate {
            "roadwatch_web" | "roadwatch_detect" | "tower_http" => Some(Component::Gateway),
            "roadwatch_session" => Some(Component::Client),
            "roadwatch_capture" => Some(Component::Capture),
            _ => None,
        }
    }
}

/// Formatter writing `HH:MM:SS [COMPONENT] LEVEL message`
pub struct ColoredFormatter {
    /// Used for events from crates without a component of their own
    pub fallback: Component,
}

impl<S, N> FormatEvent<S, N> for ColoredFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let now = chrono::Local::now();
        write!(writer, "{} ", now.format("%H:%M:%S").dimmed())?;

        let component = Component::from_target(metadata.target()).unwrap_or(self.fallback);
        let prefix = format!("[{:8}]", component.as_str());
        write!(writer, "{} ", prefix.style(component.color_style()))?;

        match *metadata.level() {
            Level::ERROR => write!(writer, "{} ", "ERROR".red().bold())?,
            Level::WARN => write!(writer, "{} ", "WARN ".yellow().bold())?,
            Level::INFO => write!(writer, "{} ", "INFO ".green().bold())?,
            Level::DEBUG => write!(writer, "{} ", "DEBUG".blue().bold())?,
            Level::TRACE => write!(writer, "{} ", "TRACE".dimmed().bold())?,
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Install the colored subscriber; call once per process
///
/// `RUST_LOG` is honored; the base level is `info`, or `debug` when verbose.
pub fn init_component_logger(fallback: Component, verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(ColoredFormatter { fallback })
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
